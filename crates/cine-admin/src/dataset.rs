//! JSON bulk-load format
//!
//! Entities are applied before the rows that reference them. Every item
//! goes through the same repository operation an application would call,
//! so rejected items are reported with their result code and skipped.

use anyhow::{Context, Result};
use cine_core::{Actor, Critic, EntityId, Movie, ReturnCode, Studio, Year};
use cine_db::{Backend, Repository};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub studios: Vec<Studio>,
    #[serde(default)]
    pub critics: Vec<Critic>,
    #[serde(default)]
    pub castings: Vec<Casting>,
    #[serde(default)]
    pub productions: Vec<Production>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Casting {
    pub actor_id: EntityId,
    pub movie_name: String,
    pub year: Year,
    pub salary: i64,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Production {
    pub studio_id: EntityId,
    pub movie_name: String,
    pub year: Year,
    pub budget: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub critic_id: EntityId,
    pub movie_name: String,
    pub year: Year,
    pub rating: i64,
}

/// An item the database refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub item: String,
    pub code: ReturnCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub applied: usize,
    pub rejected: Vec<Rejection>,
}

impl LoadSummary {
    fn record(&mut self, item: impl FnOnce() -> String, code: ReturnCode) {
        if code.is_ok() {
            self.applied += 1;
        } else {
            let item = item();
            warn!(%item, %code, "Item rejected");
            self.rejected.push(Rejection { item, code });
        }
    }
}

impl Dataset {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid dataset JSON")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
            + self.movies.len()
            + self.studios.len()
            + self.critics.len()
            + self.castings.len()
            + self.productions.len()
            + self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every item in dependency order
    pub async fn apply<B: Backend>(&self, repo: &Repository<B>) -> LoadSummary {
        let mut summary = LoadSummary::default();

        for actor in &self.actors {
            let code = repo.add_actor(actor).await;
            summary.record(|| format!("actor {}", actor.id), code);
        }
        for movie in &self.movies {
            let code = repo.add_movie(movie).await;
            summary.record(|| format!("movie {} ({})", movie.name, movie.year), code);
        }
        for studio in &self.studios {
            let code = repo.add_studio(studio).await;
            summary.record(|| format!("studio {}", studio.id), code);
        }
        for critic in &self.critics {
            let code = repo.add_critic(critic).await;
            summary.record(|| format!("critic {}", critic.id), code);
        }
        for c in &self.castings {
            let roles = c.roles.as_slice();
            let code = repo
                .actor_played_in_movie(&c.movie_name, c.year, c.actor_id, c.salary, roles)
                .await;
            summary.record(
                || format!("casting {} in {} ({})", c.actor_id, c.movie_name, c.year),
                code,
            );
        }
        for p in &self.productions {
            let code = repo
                .studio_produced_movie(p.studio_id, &p.movie_name, p.year, p.budget, p.revenue)
                .await;
            summary.record(
                || format!("production {} of {} ({})", p.studio_id, p.movie_name, p.year),
                code,
            );
        }
        for r in &self.ratings {
            let code = repo
                .critic_rated_movie(&r.movie_name, r.year, r.critic_id, r.rating)
                .await;
            summary.record(
                || format!("rating {} of {} ({})", r.critic_id, r.movie_name, r.year),
                code,
            );
        }

        info!(
            applied = summary.applied,
            rejected = summary.rejected.len(),
            "Dataset applied"
        );
        summary
    }
}
