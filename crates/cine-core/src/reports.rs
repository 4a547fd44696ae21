//! Rows returned by the analytics queries

use crate::types::{EntityId, Genre, Year};
use serde::{Deserialize, Serialize};

/// Total revenue of every movie sharing a name, across all years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FranchiseRevenue {
    pub movie_name: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioYearRevenue {
    pub studio_id: EntityId,
    pub year: Year,
    pub revenue: i64,
}

/// A critic who rated every movie a studio produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanCritic {
    pub critic_id: EntityId,
    pub studio_id: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenreAverageAge {
    pub genre: Genre,
    pub average_age: f64,
}

/// An actor whose produced movies all come from one studio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusiveActor {
    pub actor_id: EntityId,
    pub studio_id: EntityId,
}
