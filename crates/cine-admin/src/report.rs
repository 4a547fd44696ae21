//! Snapshot of the cross-table analytics

use cine_core::{ExclusiveActor, FanCritic, FranchiseRevenue, GenreAverageAge, StudioYearRevenue};
use cine_db::{Backend, Repository};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub franchise_revenue: Vec<FranchiseRevenue>,
    pub studio_revenue_by_year: Vec<StudioYearRevenue>,
    pub fan_critics: Vec<FanCritic>,
    pub average_age_by_genre: Vec<GenreAverageAge>,
    pub exclusive_actors: Vec<ExclusiveActor>,
}

impl Report {
    pub async fn collect<B: Backend>(repo: &Repository<B>) -> Self {
        Self {
            franchise_revenue: repo.franchise_revenue().await,
            studio_revenue_by_year: repo.studio_revenue_by_year().await,
            fan_critics: repo.get_fan_critics().await,
            average_age_by_genre: repo.average_age_by_genre().await,
            exclusive_actors: repo.get_exclusive_actors().await,
        }
    }
}
