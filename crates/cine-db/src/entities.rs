//! Single-row operations on actors, movies, studios and critics

use crate::backend::{Backend, Statement};
use crate::repository::{delete_outcome, insert_outcome, lookup_or, Repository};
use crate::schema::{actor_from_row, critic_from_row, movie_from_row, studio_from_row};
use cine_core::{Actor, Critic, EntityId, Movie, ReturnCode, Studio, Year};
use tracing::instrument;

impl<B: Backend> Repository<B> {
    #[instrument(skip(self, actor), fields(actor_id = actor.id))]
    pub async fn add_actor(&self, actor: &Actor) -> ReturnCode {
        let stmt = Statement::new(
            "INSERT INTO actors (actor_id, actor_name, age, height) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(actor.id)
        .bind(actor.name.as_str())
        .bind(actor.age)
        .bind(actor.height);

        insert_outcome("add_actor", self.backend().execute(&stmt).await)
    }

    #[instrument(skip(self))]
    pub async fn delete_actor(&self, actor_id: EntityId) -> ReturnCode {
        let stmt = Statement::new("DELETE FROM actors WHERE actor_id = ?1").bind(actor_id);

        delete_outcome("delete_actor", self.backend().execute(&stmt).await)
    }

    /// The actor, or [`Actor::bad`] if there is none
    #[instrument(skip(self))]
    pub async fn get_actor_profile(&self, actor_id: EntityId) -> Actor {
        let stmt = Statement::new(
            "SELECT actor_id, actor_name, age, height FROM actors WHERE actor_id = ?1",
        )
        .bind(actor_id);

        lookup_or(
            "get_actor_profile",
            self.backend().fetch_optional(&stmt).await,
            actor_from_row,
            Actor::bad,
        )
    }

    #[instrument(skip(self, movie), fields(movie = %movie.name, year = movie.year))]
    pub async fn add_movie(&self, movie: &Movie) -> ReturnCode {
        let stmt = Statement::new(
            "INSERT INTO movies (movie_name, year, genre) VALUES (?1, ?2, ?3)",
        )
        .bind(movie.name.as_str())
        .bind(movie.year)
        .bind(movie.genre.as_str());

        insert_outcome("add_movie", self.backend().execute(&stmt).await)
    }

    #[instrument(skip(self))]
    pub async fn delete_movie(&self, movie_name: &str, year: Year) -> ReturnCode {
        let stmt = Statement::new("DELETE FROM movies WHERE movie_name = ?1 AND year = ?2")
            .bind(movie_name)
            .bind(year);

        delete_outcome("delete_movie", self.backend().execute(&stmt).await)
    }

    /// The movie, or [`Movie::bad`] if there is none
    #[instrument(skip(self))]
    pub async fn get_movie_profile(&self, movie_name: &str, year: Year) -> Movie {
        let stmt = Statement::new(
            "SELECT movie_name, year, genre FROM movies WHERE movie_name = ?1 AND year = ?2",
        )
        .bind(movie_name)
        .bind(year);

        lookup_or(
            "get_movie_profile",
            self.backend().fetch_optional(&stmt).await,
            movie_from_row,
            Movie::bad,
        )
    }

    #[instrument(skip(self, studio), fields(studio_id = studio.id))]
    pub async fn add_studio(&self, studio: &Studio) -> ReturnCode {
        let stmt = Statement::new("INSERT INTO studios (studio_id, studio_name) VALUES (?1, ?2)")
            .bind(studio.id)
            .bind(studio.name.as_str());

        insert_outcome("add_studio", self.backend().execute(&stmt).await)
    }

    #[instrument(skip(self))]
    pub async fn delete_studio(&self, studio_id: EntityId) -> ReturnCode {
        let stmt = Statement::new("DELETE FROM studios WHERE studio_id = ?1").bind(studio_id);

        delete_outcome("delete_studio", self.backend().execute(&stmt).await)
    }

    #[instrument(skip(self))]
    pub async fn get_studio_profile(&self, studio_id: EntityId) -> Studio {
        let stmt = Statement::new("SELECT studio_id, studio_name FROM studios WHERE studio_id = ?1")
            .bind(studio_id);

        lookup_or(
            "get_studio_profile",
            self.backend().fetch_optional(&stmt).await,
            studio_from_row,
            Studio::bad,
        )
    }

    #[instrument(skip(self, critic), fields(critic_id = critic.id))]
    pub async fn add_critic(&self, critic: &Critic) -> ReturnCode {
        let stmt = Statement::new("INSERT INTO critics (critic_id, critic_name) VALUES (?1, ?2)")
            .bind(critic.id)
            .bind(critic.name.as_str());

        insert_outcome("add_critic", self.backend().execute(&stmt).await)
    }

    #[instrument(skip(self))]
    pub async fn delete_critic(&self, critic_id: EntityId) -> ReturnCode {
        let stmt = Statement::new("DELETE FROM critics WHERE critic_id = ?1").bind(critic_id);

        delete_outcome("delete_critic", self.backend().execute(&stmt).await)
    }

    #[instrument(skip(self))]
    pub async fn get_critic_profile(&self, critic_id: EntityId) -> Critic {
        let stmt = Statement::new("SELECT critic_id, critic_name FROM critics WHERE critic_id = ?1")
            .bind(critic_id);

        lookup_or(
            "get_critic_profile",
            self.backend().fetch_optional(&stmt).await,
            critic_from_row,
            Critic::bad,
        )
    }
}
