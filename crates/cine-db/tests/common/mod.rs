//! Shared fixtures for the integration tests

#![allow(dead_code)]

use cine_core::{Actor, Critic, Genre, Movie, ReturnCode, Studio};
use cine_db::{DbClient, Repository};

/// Fresh in-memory database with the schema installed
pub async fn fresh_repo() -> Repository {
    let client = DbClient::in_memory().await.expect("in-memory database");
    let repo = Repository::new(client);
    repo.create_schema().await;
    repo
}

pub fn keanu() -> Actor {
    Actor::new(1, "Keanu", 40, 180)
}

pub fn matrix() -> Movie {
    Movie::new("Matrix", 1999, Genre::Action)
}

/// Movies, studios, critics and actors used across the analytics tests
pub async fn seed_basics(repo: &Repository) {
    let movies = [
        Movie::new("Matrix", 1999, Genre::Action),
        Movie::new("Matrix", 2003, Genre::Action),
        Movie::new("Speed", 1994, Genre::Action),
        Movie::new("Alien", 1979, Genre::Horror),
        Movie::new("Amelie", 2001, Genre::Comedy),
    ];
    for movie in &movies {
        assert_eq!(repo.add_movie(movie).await, ReturnCode::Ok);
    }

    for studio in [Studio::new(1, "WB"), Studio::new(2, "Fox")] {
        assert_eq!(repo.add_studio(&studio).await, ReturnCode::Ok);
    }
    for critic in [Critic::new(1, "Ebert"), Critic::new(2, "Kael")] {
        assert_eq!(repo.add_critic(&critic).await, ReturnCode::Ok);
    }
    for actor in [
        Actor::new(1, "Keanu", 40, 180),
        Actor::new(2, "Sigourney", 30, 182),
        Actor::new(3, "Audrey", 25, 165),
    ] {
        assert_eq!(repo.add_actor(&actor).await, ReturnCode::Ok);
    }
}
