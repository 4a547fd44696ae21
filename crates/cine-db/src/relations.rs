//! Association rows: ratings, castings with their roles, productions

use crate::backend::{Backend, Statement};
use crate::repository::{delete_outcome, insert_outcome, value_or, Repository};
use crate::DbResult;
use cine_core::{EntityId, ReturnCode, Year};
use std::collections::HashSet;
use tracing::{instrument, warn};

impl<B: Backend> Repository<B> {
    /// Record a critic's 1–5 rating of a movie
    #[instrument(skip(self))]
    pub async fn critic_rated_movie(
        &self,
        movie_name: &str,
        year: Year,
        critic_id: EntityId,
        rating: i64,
    ) -> ReturnCode {
        let stmt = Statement::new(
            "INSERT INTO rated (movie_name, year, critic_id, rating) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(movie_name)
        .bind(year)
        .bind(critic_id)
        .bind(rating);

        insert_outcome("critic_rated_movie", self.backend().execute(&stmt).await)
    }

    #[instrument(skip(self))]
    pub async fn critic_unrated_movie(
        &self,
        movie_name: &str,
        year: Year,
        critic_id: EntityId,
    ) -> ReturnCode {
        let stmt = Statement::new(
            "DELETE FROM rated WHERE movie_name = ?1 AND year = ?2 AND critic_id = ?3",
        )
        .bind(movie_name)
        .bind(year)
        .bind(critic_id);

        delete_outcome("critic_unrated_movie", self.backend().execute(&stmt).await)
    }

    /// Cast an actor in a movie with one or more distinct roles.
    ///
    /// The casting row and all of its role rows are written in one
    /// transaction: either every row lands or none does.
    #[instrument(skip(self, roles), fields(num_roles = roles.len()))]
    pub async fn actor_played_in_movie<S: AsRef<str>>(
        &self,
        movie_name: &str,
        year: Year,
        actor_id: EntityId,
        salary: i64,
        roles: &[S],
    ) -> ReturnCode {
        if roles.is_empty() {
            warn!("Rejected casting without roles");
            return ReturnCode::BadParameters;
        }
        let mut distinct = HashSet::with_capacity(roles.len());
        if !roles.iter().all(|role| distinct.insert(role.as_ref())) {
            warn!("Rejected casting with repeated roles");
            return ReturnCode::BadParameters;
        }

        let casting = Statement::new(
            "INSERT INTO played_in (actor_id, movie_name, year, salary, num_roles) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(actor_id)
        .bind(movie_name)
        .bind(year)
        .bind(salary)
        .bind(roles.len() as i64);

        let role_rows = roles.iter().map(|role| {
            Statement::new(
                "INSERT INTO played_in_role (actor_id, movie_name, year, role) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(actor_id)
            .bind(movie_name)
            .bind(year)
            .bind(role.as_ref())
        });

        let batch: Vec<Statement> = std::iter::once(casting).chain(role_rows).collect();
        insert_outcome(
            "actor_played_in_movie",
            self.backend().execute_atomic(&batch).await,
        )
    }

    /// Remove a casting; its roles go with it
    #[instrument(skip(self))]
    pub async fn actor_did_not_play_in_movie(
        &self,
        movie_name: &str,
        year: Year,
        actor_id: EntityId,
    ) -> ReturnCode {
        let stmt = Statement::new(
            "DELETE FROM played_in WHERE movie_name = ?1 AND year = ?2 AND actor_id = ?3",
        )
        .bind(movie_name)
        .bind(year)
        .bind(actor_id);

        delete_outcome(
            "actor_did_not_play_in_movie",
            self.backend().execute(&stmt).await,
        )
    }

    /// Roles of one casting, alphabetically; empty when there is no such casting
    #[instrument(skip(self))]
    pub async fn get_roles(&self, movie_name: &str, year: Year, actor_id: EntityId) -> Vec<String> {
        let stmt = Statement::new(
            "SELECT role FROM played_in_role \
             WHERE movie_name = ?1 AND year = ?2 AND actor_id = ?3 \
             ORDER BY role ASC",
        )
        .bind(movie_name)
        .bind(year)
        .bind(actor_id);

        let roles: DbResult<Vec<String>> = async {
            let rows = self.backend().fetch_all(&stmt).await?;
            rows.iter()
                .map(|row| row.get_str(0).map(str::to_string))
                .collect()
        }
        .await;
        value_or("get_roles", roles, Vec::new())
    }

    #[instrument(skip(self))]
    pub async fn studio_produced_movie(
        &self,
        studio_id: EntityId,
        movie_name: &str,
        year: Year,
        budget: i64,
        revenue: i64,
    ) -> ReturnCode {
        let stmt = Statement::new(
            "INSERT INTO produced (movie_name, year, studio_id, budget, revenue) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(movie_name)
        .bind(year)
        .bind(studio_id)
        .bind(budget)
        .bind(revenue);

        insert_outcome("studio_produced_movie", self.backend().execute(&stmt).await)
    }

    #[instrument(skip(self))]
    pub async fn studio_did_not_produce_movie(
        &self,
        studio_id: EntityId,
        movie_name: &str,
        year: Year,
    ) -> ReturnCode {
        let stmt = Statement::new(
            "DELETE FROM produced WHERE movie_name = ?1 AND year = ?2 AND studio_id = ?3",
        )
        .bind(movie_name)
        .bind(year)
        .bind(studio_id);

        delete_outcome(
            "studio_did_not_produce_movie",
            self.backend().execute(&stmt).await,
        )
    }
}
