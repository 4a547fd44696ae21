//! Read-only aggregate queries
//!
//! Nothing here is cached: every call re-reads the base tables, mostly
//! through the views defined in [`crate::schema`]. On a database failure
//! each query logs and returns its empty value.

use crate::backend::{Backend, Row, Statement};
use crate::repository::{lookup_or, value_or, Repository};
use crate::schema::movie_from_row;
use crate::{DbError, DbResult};
use cine_core::{
    EntityId, ExclusiveActor, FanCritic, FranchiseRevenue, Genre, GenreAverageAge, Movie,
    StudioYearRevenue, Year,
};
use tracing::{debug, instrument, warn};

/// Returned by [`Repository::stage_crew_budget`] for an unknown movie
pub const MISSING_MOVIE_BUDGET: i64 = -1;

impl<B: Backend> Repository<B> {
    /// Run a query whose single row holds one value in column 0
    async fn scalar<T, F>(&self, stmt: &Statement, get: F) -> DbResult<Option<T>>
    where
        F: Fn(&Row) -> DbResult<T>,
    {
        match self.backend().fetch_optional(stmt).await? {
            Some(row) => get(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn rows<T, F>(&self, stmt: &Statement, decode: F) -> DbResult<Vec<T>>
    where
        F: Fn(&Row) -> DbResult<T>,
    {
        let rows = self.backend().fetch_all(stmt).await?;
        rows.iter().map(|row| decode(row)).collect()
    }

    /// Mean rating of a movie; 0 when nobody rated it
    #[instrument(skip(self))]
    pub async fn average_rating(&self, movie_name: &str, year: Year) -> f64 {
        let stmt = Statement::new(
            "SELECT COALESCE(AVG(rating), 0.0) FROM rated WHERE movie_name = ?1 AND year = ?2",
        )
        .bind(movie_name)
        .bind(year);

        let average = self.scalar(&stmt, |row| row.get_f64(0)).await;
        value_or("average_rating", average, None).unwrap_or(0.0)
    }

    /// Mean of the average ratings of every movie the actor played in.
    ///
    /// Unrated movies count as 0; an actor with no movies scores 0.
    #[instrument(skip(self))]
    pub async fn average_actor_rating(&self, actor_id: EntityId) -> f64 {
        let stmt = Statement::new(
            "SELECT COALESCE(AVG(average), 0.0) FROM actor_movie_average_rating \
             WHERE actor_id = ?1",
        )
        .bind(actor_id);

        let average = self.scalar(&stmt, |row| row.get_f64(0)).await;
        value_or("average_actor_rating", average, None).unwrap_or(0.0)
    }

    /// The actor's best-rated movie.
    ///
    /// Ties go to the earliest year, then to the movie name that sorts
    /// last. [`Movie::bad`] when the actor played in nothing.
    #[instrument(skip(self))]
    pub async fn best_performance(&self, actor_id: EntityId) -> Movie {
        let stmt = Statement::new(
            "SELECT m.movie_name, m.year, m.genre \
             FROM actor_movie_average_rating a \
             JOIN movies m ON a.movie_name = m.movie_name AND a.year = m.year \
             WHERE a.actor_id = ?1 \
             ORDER BY a.average DESC, m.year ASC, m.movie_name DESC \
             LIMIT 1",
        )
        .bind(actor_id);

        lookup_or(
            "best_performance",
            self.backend().fetch_optional(&stmt).await,
            movie_from_row,
            Movie::bad,
        )
    }

    /// Production budget (0 if never produced) minus all actor salaries.
    ///
    /// [`MISSING_MOVIE_BUDGET`] when the movie does not exist. Summed in
    /// 128 bits and saturated, so large salaries never read as a missing movie.
    #[instrument(skip(self))]
    pub async fn stage_crew_budget(&self, movie_name: &str, year: Year) -> i64 {
        // One row per casting, or a single row with a NULL salary when uncast
        let stmt = Statement::new(
            "SELECT \
                 (SELECT budget FROM produced p \
                  WHERE p.movie_name = m.movie_name AND p.year = m.year), \
                 c.salary \
             FROM movies m \
             LEFT JOIN played_in c ON c.movie_name = m.movie_name AND c.year = m.year \
             WHERE m.movie_name = ?1 AND m.year = ?2",
        )
        .bind(movie_name)
        .bind(year);

        let rows = self
            .rows(&stmt, |row| Ok((row.get_opt_i64(0)?, row.get_opt_i64(1)?)))
            .await;
        let rows = value_or("stage_crew_budget", rows, Vec::new());
        let Some(&(budget, _)) = rows.first() else {
            debug!("No such movie");
            return MISSING_MOVIE_BUDGET;
        };

        let salaries: i128 = rows
            .iter()
            .map(|&(_, salary)| i128::from(salary.unwrap_or(0)))
            .sum();
        saturate("stage_crew_budget", i128::from(budget.unwrap_or(0)) - salaries)
    }

    /// Whether the actor holds at least half of the movie's roles
    #[instrument(skip(self))]
    pub async fn overly_invested_in_movie(
        &self,
        movie_name: &str,
        year: Year,
        actor_id: EntityId,
    ) -> bool {
        let stmt = Statement::new(
            "SELECT EXISTS ( \
                 SELECT 1 FROM played_in p \
                 WHERE p.movie_name = ?1 AND p.year = ?2 AND p.actor_id = ?3 \
                   AND 2 * p.num_roles >= ( \
                       SELECT SUM(q.num_roles) FROM played_in q \
                       WHERE q.movie_name = ?1 AND q.year = ?2))",
        )
        .bind(movie_name)
        .bind(year)
        .bind(actor_id);

        let invested = self.scalar(&stmt, |row| row.get_i64(0)).await;
        value_or("overly_invested_in_movie", invested, None) == Some(1)
    }

    /// Revenue per movie name summed over every year, name descending
    #[instrument(skip(self))]
    pub async fn franchise_revenue(&self) -> Vec<FranchiseRevenue> {
        let stmt = Statement::new(
            "SELECT m.movie_name, p.revenue \
             FROM movies m \
             LEFT JOIN produced p ON m.movie_name = p.movie_name AND m.year = p.year \
             ORDER BY m.movie_name DESC",
        );

        let rows = self
            .rows(&stmt, |row| {
                Ok((row.get_str(0)?.to_string(), row.get_opt_i64(1)?))
            })
            .await;
        let rows = value_or("franchise_revenue", rows, Vec::new());

        sum_runs("franchise_revenue", rows)
            .into_iter()
            .map(|(movie_name, revenue)| FranchiseRevenue {
                movie_name,
                revenue,
            })
            .collect()
    }

    /// Revenue per studio and year, both descending
    #[instrument(skip(self))]
    pub async fn studio_revenue_by_year(&self) -> Vec<StudioYearRevenue> {
        let stmt = Statement::new(
            "SELECT studio_id, year, revenue \
             FROM produced \
             ORDER BY studio_id DESC, year DESC",
        );

        let rows = self
            .rows(&stmt, |row| {
                Ok(((row.get_i64(0)?, row.get_i64(1)?), Some(row.get_i64(2)?)))
            })
            .await;
        let rows = value_or("studio_revenue_by_year", rows, Vec::new());

        sum_runs("studio_revenue_by_year", rows)
            .into_iter()
            .map(|((studio_id, year), revenue)| StudioYearRevenue {
                studio_id,
                year,
                revenue,
            })
            .collect()
    }

    /// Critics who rated every movie a studio produced.
    ///
    /// A studio with no productions has no fans.
    #[instrument(skip(self))]
    pub async fn get_fan_critics(&self) -> Vec<FanCritic> {
        let stmt = Statement::new(
            "SELECT r.critic_id, p.studio_id \
             FROM rated r \
             JOIN produced p ON r.movie_name = p.movie_name AND r.year = p.year \
             GROUP BY r.critic_id, p.studio_id \
             HAVING COUNT(*) = (SELECT COUNT(*) FROM produced q WHERE q.studio_id = p.studio_id) \
             ORDER BY r.critic_id DESC, p.studio_id DESC",
        );

        let rows = self
            .rows(&stmt, |row| {
                Ok(FanCritic {
                    critic_id: row.get_i64(0)?,
                    studio_id: row.get_i64(1)?,
                })
            })
            .await;
        value_or("get_fan_critics", rows, Vec::new())
    }

    /// Mean actor age per genre, counting each actor once per genre
    #[instrument(skip(self))]
    pub async fn average_age_by_genre(&self) -> Vec<GenreAverageAge> {
        let stmt = Statement::new(
            "SELECT genre, AVG(age) \
             FROM (SELECT DISTINCT a.actor_id, a.age, m.genre \
                   FROM actors a \
                   JOIN played_in p ON a.actor_id = p.actor_id \
                   JOIN movies m ON p.movie_name = m.movie_name AND p.year = m.year) \
             GROUP BY genre \
             ORDER BY genre ASC",
        );

        let rows = self
            .rows(&stmt, |row| {
                let genre = row
                    .get_str(0)?
                    .parse::<Genre>()
                    .map_err(|e| DbError::RowDecode(format!("{}", e)))?;
                Ok(GenreAverageAge {
                    genre,
                    average_age: row.get_f64(1)?,
                })
            })
            .await;
        value_or("average_age_by_genre", rows, Vec::new())
    }

    /// Actors whose produced movies all come from a single studio, actor descending.
    ///
    /// Castings in movies nobody produced do not count against exclusivity.
    #[instrument(skip(self))]
    pub async fn get_exclusive_actors(&self) -> Vec<ExclusiveActor> {
        let stmt = Statement::new(
            "SELECT actor_id, MIN(studio_id) \
             FROM actor_movie_studio \
             GROUP BY actor_id \
             HAVING COUNT(DISTINCT studio_id) = 1 \
             ORDER BY actor_id DESC",
        );

        let rows = self
            .rows(&stmt, |row| {
                Ok(ExclusiveActor {
                    actor_id: row.get_i64(0)?,
                    studio_id: row.get_i64(1)?,
                })
            })
            .await;
        value_or("get_exclusive_actors", rows, Vec::new())
    }
}

/// Sum amounts over consecutive rows sharing a key, keeping row order.
///
/// Rows must arrive grouped by key. A missing amount counts as 0.
fn sum_runs<K: PartialEq>(op: &str, rows: Vec<(K, Option<i64>)>) -> Vec<(K, i64)> {
    let mut runs: Vec<(K, i128)> = Vec::new();
    for (key, amount) in rows {
        let amount = i128::from(amount.unwrap_or(0));
        match runs.last_mut() {
            Some((last, total)) if *last == key => *total += amount,
            _ => runs.push((key, amount)),
        }
    }
    runs.into_iter()
        .map(|(key, total)| (key, saturate(op, total)))
        .collect()
}

/// Narrow a wide total to i64, clamping at the bounds
fn saturate(op: &str, total: i128) -> i64 {
    i64::try_from(total).unwrap_or_else(|_| {
        warn!(op, %total, "Total out of 64-bit range, saturating");
        if total > 0 {
            i64::MAX
        } else {
            i64::MIN
        }
    })
}
