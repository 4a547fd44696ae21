mod common;

use cine_core::{Actor, Critic, Genre, Movie, ReturnCode, Studio, FIRST_MOVIE_YEAR};
use cine_db::schema;
use common::*;

#[tokio::test]
async fn actor_round_trip() {
    let repo = fresh_repo().await;

    assert_eq!(repo.add_actor(&keanu()).await, ReturnCode::Ok);
    assert_eq!(repo.get_actor_profile(1).await, keanu());

    assert_eq!(repo.delete_actor(1).await, ReturnCode::Ok);
    assert!(repo.get_actor_profile(1).await.is_bad());
    let counts = schema::table_counts(repo.backend()).await.unwrap();
    assert!(counts.iter().all(|(_, n)| *n == 0));
}

#[tokio::test]
async fn duplicate_key_keeps_original_row() {
    let repo = fresh_repo().await;
    repo.add_actor(&keanu()).await;

    let impostor = Actor::new(1, "Not Keanu", 50, 170);
    assert_eq!(repo.add_actor(&impostor).await, ReturnCode::AlreadyExists);
    assert_eq!(repo.get_actor_profile(1).await, keanu());

    repo.add_movie(&matrix()).await;
    let remake = Movie::new("Matrix", 1999, Genre::Drama);
    assert_eq!(repo.add_movie(&remake).await, ReturnCode::AlreadyExists);
    assert_eq!(repo.get_movie_profile("Matrix", 1999).await, matrix());
}

#[tokio::test]
async fn check_violations_are_bad_parameters() {
    let repo = fresh_repo().await;
    let too_early = Movie::new("Too Early", FIRST_MOVIE_YEAR - 1, Genre::Drama);
    let first_movie = Movie::new("Arrival of a Train", FIRST_MOVIE_YEAR, Genre::Drama);

    assert_eq!(
        repo.add_actor(&Actor::new(0, "Nobody", 40, 180)).await,
        ReturnCode::BadParameters
    );
    assert_eq!(
        repo.add_actor(&Actor::new(2, "Baby", 0, 50)).await,
        ReturnCode::BadParameters
    );
    assert_eq!(
        repo.add_actor(&Actor::new(3, "Flat", 30, -1)).await,
        ReturnCode::BadParameters
    );
    assert_eq!(
        repo.add_movie(&too_early).await,
        ReturnCode::BadParameters
    );
    assert_eq!(
        repo.add_studio(&Studio::new(-5, "Negative")).await,
        ReturnCode::BadParameters
    );
    assert_eq!(
        repo.add_critic(&Critic::new(0, "Zero")).await,
        ReturnCode::BadParameters
    );

    // The earliest accepted year is inclusive
    assert_eq!(
        repo.add_movie(&first_movie).await,
        ReturnCode::Ok
    );
}

#[tokio::test]
async fn deleting_missing_keys_is_not_exists() {
    let repo = fresh_repo().await;

    assert_eq!(repo.delete_actor(42).await, ReturnCode::NotExists);
    assert_eq!(repo.delete_movie("Nope", 2000).await, ReturnCode::NotExists);
    assert_eq!(repo.delete_studio(42).await, ReturnCode::NotExists);
    assert_eq!(repo.delete_critic(42).await, ReturnCode::NotExists);

    // Same name, other year is a different movie
    repo.add_movie(&matrix()).await;
    assert_eq!(
        repo.delete_movie("Matrix", 2003).await,
        ReturnCode::NotExists
    );
    assert_eq!(repo.delete_movie("Matrix", 1999).await, ReturnCode::Ok);
    assert_eq!(
        repo.delete_movie("Matrix", 1999).await,
        ReturnCode::NotExists
    );
}

#[tokio::test]
async fn missing_profiles_are_sentinels() {
    let repo = fresh_repo().await;

    assert_eq!(repo.get_actor_profile(7).await, Actor::bad());
    assert_eq!(repo.get_movie_profile("Nope", 2000).await, Movie::bad());
    assert_eq!(repo.get_studio_profile(7).await, Studio::bad());
    assert_eq!(repo.get_critic_profile(7).await, Critic::bad());
}

#[tokio::test]
async fn studio_and_critic_round_trip() {
    let repo = fresh_repo().await;
    let studio = Studio::new(1, "WB");
    let critic = Critic::new(9, "Ebert");

    assert_eq!(repo.add_studio(&studio).await, ReturnCode::Ok);
    assert_eq!(repo.add_critic(&critic).await, ReturnCode::Ok);
    assert_eq!(repo.get_studio_profile(1).await, studio);
    assert_eq!(repo.get_critic_profile(9).await, critic);

    assert_eq!(
        repo.add_studio(&Studio::new(1, "Other")).await,
        ReturnCode::AlreadyExists
    );
    assert_eq!(repo.delete_critic(9).await, ReturnCode::Ok);
    assert!(repo.get_critic_profile(9).await.is_bad());
}

#[tokio::test]
async fn names_are_bound_not_interpolated() {
    let repo = fresh_repo().await;
    let movie = Movie::new("Bobby'); DROP TABLE movies; --", 2000, Genre::Comedy);

    assert_eq!(repo.add_movie(&movie).await, ReturnCode::Ok);
    assert_eq!(repo.get_movie_profile(&movie.name, 2000).await, movie);
}
