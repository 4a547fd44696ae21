mod common;

use cine_core::{Critic, ReturnCode, Studio};
use cine_db::schema::{self, tables};
use cine_db::Repository;
use common::*;

async fn count(repo: &Repository, table: &str) -> i64 {
    schema::table_counts(repo.backend())
        .await
        .unwrap()
        .into_iter()
        .find(|(name, _)| *name == table)
        .map(|(_, n)| n)
        .unwrap()
}

async fn cast_ready_repo() -> Repository {
    let repo = fresh_repo().await;
    repo.add_actor(&keanu()).await;
    repo.add_movie(&matrix()).await;
    repo
}

#[tokio::test]
async fn critic_rating_codes() {
    let repo = fresh_repo().await;
    repo.add_movie(&matrix()).await;
    repo.add_critic(&Critic::new(1, "Ebert")).await;

    assert_eq!(
        repo.critic_rated_movie("Matrix", 1999, 1, 4).await,
        ReturnCode::Ok
    );
    assert_eq!(
        repo.critic_rated_movie("Matrix", 1999, 1, 2).await,
        ReturnCode::AlreadyExists
    );
    assert_eq!(
        repo.critic_rated_movie("Matrix", 1999, 2, 3).await,
        ReturnCode::NotExists
    );
    assert_eq!(
        repo.critic_rated_movie("Nope", 1999, 1, 3).await,
        ReturnCode::NotExists
    );
    assert_eq!(repo.average_rating("Matrix", 1999).await, 4.0);
}

#[tokio::test]
async fn rating_range_checked_before_references() {
    let repo = fresh_repo().await;
    repo.add_movie(&matrix()).await;
    repo.add_critic(&Critic::new(1, "Ebert")).await;

    assert_eq!(
        repo.critic_rated_movie("Matrix", 1999, 1, 0).await,
        ReturnCode::BadParameters
    );
    assert_eq!(
        repo.critic_rated_movie("Matrix", 1999, 1, 6).await,
        ReturnCode::BadParameters
    );
    // Out of range and unknown critic: the range wins
    assert_eq!(
        repo.critic_rated_movie("Matrix", 1999, 99, 6).await,
        ReturnCode::BadParameters
    );
    for rating in 1..=5 {
        repo.add_critic(&Critic::new(10 + rating, "Critic")).await;
        assert_eq!(
            repo.critic_rated_movie("Matrix", 1999, 10 + rating, rating)
                .await,
            ReturnCode::Ok
        );
    }
}

#[tokio::test]
async fn critic_unrated_movie() {
    let repo = fresh_repo().await;
    repo.add_movie(&matrix()).await;
    repo.add_critic(&Critic::new(1, "Ebert")).await;
    repo.critic_rated_movie("Matrix", 1999, 1, 5).await;

    assert_eq!(
        repo.critic_unrated_movie("Matrix", 1999, 1).await,
        ReturnCode::Ok
    );
    assert_eq!(
        repo.critic_unrated_movie("Matrix", 1999, 1).await,
        ReturnCode::NotExists
    );
    assert_eq!(repo.average_rating("Matrix", 1999).await, 0.0);
}

#[tokio::test]
async fn casting_stores_one_row_per_role() {
    let repo = cast_ready_repo().await;

    let code = repo
        .actor_played_in_movie("Matrix", 1999, 1, 500, &["Neo", "Thomas Anderson"])
        .await;

    assert_eq!(code, ReturnCode::Ok);
    assert_eq!(
        repo.get_roles("Matrix", 1999, 1).await,
        vec!["Neo".to_string(), "Thomas Anderson".to_string()]
    );
    assert_eq!(
        repo.actor_played_in_movie("Matrix", 1999, 1, 700, &["Agent"])
            .await,
        ReturnCode::AlreadyExists
    );
    assert_eq!(count(&repo, tables::PLAYED_IN_ROLE).await, 2);
}

#[tokio::test]
async fn failed_casting_leaves_nothing_behind() {
    let repo = cast_ready_repo().await;

    // Salary check fails on the first row of the batch
    assert_eq!(
        repo.actor_played_in_movie("Matrix", 1999, 1, 0, &["Neo"])
            .await,
        ReturnCode::BadParameters
    );
    // Unknown movie fails the casting row's foreign key
    assert_eq!(
        repo.actor_played_in_movie("Nope", 2000, 1, 500, &["Neo"])
            .await,
        ReturnCode::NotExists
    );
    // Unknown actor
    assert_eq!(
        repo.actor_played_in_movie("Matrix", 1999, 2, 500, &["Neo"])
            .await,
        ReturnCode::NotExists
    );
    // No roles at all
    let none: [&str; 0] = [];
    assert_eq!(
        repo.actor_played_in_movie("Matrix", 1999, 1, 500, &none)
            .await,
        ReturnCode::BadParameters
    );

    assert_eq!(count(&repo, tables::PLAYED_IN).await, 0);
    assert_eq!(count(&repo, tables::PLAYED_IN_ROLE).await, 0);
}

#[tokio::test]
async fn uncasting_removes_roles() {
    let repo = cast_ready_repo().await;
    repo.actor_played_in_movie("Matrix", 1999, 1, 500, &["Neo"])
        .await;

    assert_eq!(
        repo.actor_did_not_play_in_movie("Matrix", 1999, 1).await,
        ReturnCode::Ok
    );
    assert!(repo.get_roles("Matrix", 1999, 1).await.is_empty());
    assert_eq!(count(&repo, tables::PLAYED_IN_ROLE).await, 0);
    assert_eq!(
        repo.actor_did_not_play_in_movie("Matrix", 1999, 1).await,
        ReturnCode::NotExists
    );
}

#[tokio::test]
async fn deleting_actor_cascades_to_castings() {
    let repo = cast_ready_repo().await;
    repo.actor_played_in_movie("Matrix", 1999, 1, 500, &["Neo"])
        .await;

    assert_eq!(repo.delete_actor(1).await, ReturnCode::Ok);

    assert_eq!(count(&repo, tables::PLAYED_IN).await, 0);
    assert_eq!(count(&repo, tables::PLAYED_IN_ROLE).await, 0);
    assert_eq!(repo.get_movie_profile("Matrix", 1999).await, matrix());
}

#[tokio::test]
async fn production_codes() {
    let repo = fresh_repo().await;
    repo.add_movie(&matrix()).await;
    repo.add_studio(&Studio::new(1, "WB")).await;
    repo.add_studio(&Studio::new(2, "Fox")).await;

    assert_eq!(
        repo.studio_produced_movie(1, "Matrix", 1999, -1, 5000)
            .await,
        ReturnCode::BadParameters
    );
    assert_eq!(
        repo.studio_produced_movie(3, "Matrix", 1999, 1000, 5000)
            .await,
        ReturnCode::NotExists
    );
    // Zero budget and revenue are allowed
    assert_eq!(
        repo.studio_produced_movie(1, "Matrix", 1999, 0, 0).await,
        ReturnCode::Ok
    );
    // A movie has a single producing studio
    assert_eq!(
        repo.studio_produced_movie(2, "Matrix", 1999, 10, 10).await,
        ReturnCode::AlreadyExists
    );

    assert_eq!(
        repo.studio_did_not_produce_movie(2, "Matrix", 1999).await,
        ReturnCode::NotExists
    );
    assert_eq!(
        repo.studio_did_not_produce_movie(1, "Matrix", 1999).await,
        ReturnCode::Ok
    );
    assert_eq!(count(&repo, tables::PRODUCED).await, 0);
}

#[tokio::test]
async fn deleting_movie_cascades_everywhere() {
    let repo = cast_ready_repo().await;
    repo.add_studio(&Studio::new(1, "WB")).await;
    repo.add_critic(&Critic::new(1, "Ebert")).await;
    repo.actor_played_in_movie("Matrix", 1999, 1, 500, &["Neo"])
        .await;
    repo.studio_produced_movie(1, "Matrix", 1999, 1000, 5000)
        .await;
    repo.critic_rated_movie("Matrix", 1999, 1, 5).await;

    assert_eq!(repo.delete_movie("Matrix", 1999).await, ReturnCode::Ok);

    for table in [
        tables::PLAYED_IN,
        tables::PLAYED_IN_ROLE,
        tables::PRODUCED,
        tables::RATED,
    ] {
        assert_eq!(count(&repo, table).await, 0, "{} not empty", table);
    }
    assert_eq!(count(&repo, tables::ACTORS).await, 1);
    assert_eq!(count(&repo, tables::STUDIOS).await, 1);
    assert_eq!(count(&repo, tables::CRITICS).await, 1);
}
