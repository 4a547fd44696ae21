//! Schema DDL and row decoding for the movie-industry tables
//!
//! Table and column names are part of the external contract: other tools
//! read the same database, so do not rename them without a migration.

use crate::backend::{Backend, Row, Statement};
use crate::{DbError, DbResult};
use cine_core::{Actor, Critic, Genre, Movie, Studio};
use tracing::{debug, info, instrument};

/// Base table names
pub mod tables {
    pub const ACTORS: &str = "actors";
    pub const MOVIES: &str = "movies";
    pub const STUDIOS: &str = "studios";
    pub const CRITICS: &str = "critics";
    pub const PLAYED_IN: &str = "played_in";
    pub const PLAYED_IN_ROLE: &str = "played_in_role";
    pub const PRODUCED: &str = "produced";
    pub const RATED: &str = "rated";

    /// Parents before children
    pub const ALL: [&str; 8] = [
        ACTORS,
        MOVIES,
        STUDIOS,
        CRITICS,
        PLAYED_IN,
        PLAYED_IN_ROLE,
        PRODUCED,
        RATED,
    ];

    /// Deleting from these empties every association table through cascade
    pub const ENTITIES: [&str; 4] = [ACTORS, MOVIES, CRITICS, STUDIOS];
}

/// Derived views, evaluated on every read
pub mod views {
    pub const MOVIE_AVERAGE_RATING: &str = "movie_average_rating";
    pub const ACTOR_MOVIE_AVERAGE_RATING: &str = "actor_movie_average_rating";
    pub const ACTOR_MOVIE_STUDIO: &str = "actor_movie_studio";

    /// Dependents before the views they read
    pub const ALL: [&str; 3] = [
        ACTOR_MOVIE_AVERAGE_RATING,
        MOVIE_AVERAGE_RATING,
        ACTOR_MOVIE_STUDIO,
    ];
}

const CREATE_STATEMENTS: [&str; 11] = [
    r#"
    CREATE TABLE IF NOT EXISTS actors (
        actor_id INTEGER PRIMARY KEY CHECK (actor_id > 0),
        actor_name TEXT NOT NULL,
        age INTEGER NOT NULL CHECK (age > 0),
        height INTEGER NOT NULL CHECK (height > 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movies (
        movie_name TEXT NOT NULL,
        year INTEGER NOT NULL CHECK (year >= 1895),
        genre TEXT NOT NULL CHECK (genre IN ('Drama', 'Action', 'Comedy', 'Horror')),
        PRIMARY KEY (movie_name, year)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS studios (
        studio_id INTEGER PRIMARY KEY CHECK (studio_id > 0),
        studio_name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS critics (
        critic_id INTEGER PRIMARY KEY CHECK (critic_id > 0),
        critic_name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS played_in (
        actor_id INTEGER NOT NULL,
        movie_name TEXT NOT NULL,
        year INTEGER NOT NULL,
        salary INTEGER NOT NULL CHECK (salary > 0),
        num_roles INTEGER NOT NULL CHECK (num_roles > 0),
        PRIMARY KEY (actor_id, movie_name, year),
        FOREIGN KEY (actor_id) REFERENCES actors (actor_id) ON DELETE CASCADE,
        FOREIGN KEY (movie_name, year) REFERENCES movies (movie_name, year) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS played_in_role (
        actor_id INTEGER NOT NULL,
        movie_name TEXT NOT NULL,
        year INTEGER NOT NULL,
        role TEXT NOT NULL,
        PRIMARY KEY (actor_id, movie_name, year, role),
        FOREIGN KEY (actor_id, movie_name, year)
            REFERENCES played_in (actor_id, movie_name, year) ON DELETE CASCADE
    )
    "#,
    // One producing studio per movie
    r#"
    CREATE TABLE IF NOT EXISTS produced (
        movie_name TEXT NOT NULL,
        year INTEGER NOT NULL,
        studio_id INTEGER NOT NULL,
        budget INTEGER NOT NULL CHECK (budget >= 0),
        revenue INTEGER NOT NULL CHECK (revenue >= 0),
        PRIMARY KEY (movie_name, year),
        FOREIGN KEY (movie_name, year) REFERENCES movies (movie_name, year) ON DELETE CASCADE,
        FOREIGN KEY (studio_id) REFERENCES studios (studio_id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rated (
        movie_name TEXT NOT NULL,
        year INTEGER NOT NULL,
        critic_id INTEGER NOT NULL,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        PRIMARY KEY (movie_name, year, critic_id),
        FOREIGN KEY (movie_name, year) REFERENCES movies (movie_name, year) ON DELETE CASCADE,
        FOREIGN KEY (critic_id) REFERENCES critics (critic_id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE VIEW IF NOT EXISTS movie_average_rating AS
    SELECT movie_name, year, AVG(rating) AS average
    FROM rated
    GROUP BY movie_name, year
    "#,
    // Unrated movies average 0
    r#"
    CREATE VIEW IF NOT EXISTS actor_movie_average_rating AS
    SELECT p.actor_id, p.movie_name, p.year, COALESCE(m.average, 0.0) AS average
    FROM played_in p
    LEFT JOIN movie_average_rating m ON p.movie_name = m.movie_name AND p.year = m.year
    "#,
    r#"
    CREATE VIEW IF NOT EXISTS actor_movie_studio AS
    SELECT p.actor_id, p.movie_name, p.year, pr.studio_id
    FROM played_in p
    JOIN produced pr ON p.movie_name = pr.movie_name AND p.year = pr.year
    "#,
];

/// Create every table and view that does not exist yet
#[instrument(skip(backend))]
pub async fn create_all<B: Backend + ?Sized>(backend: &B) -> DbResult<()> {
    let stmts: Vec<Statement> = CREATE_STATEMENTS
        .iter()
        .map(|sql| Statement::new(*sql))
        .collect();
    backend.execute_atomic(&stmts).await?;

    info!("Schema ready ({} tables, {} views)", tables::ALL.len(), views::ALL.len());
    Ok(())
}

/// Delete every entity row; association rows go with them
#[instrument(skip(backend))]
pub async fn clear_all<B: Backend + ?Sized>(backend: &B) -> DbResult<()> {
    let stmts: Vec<Statement> = tables::ENTITIES
        .iter()
        .map(|table| Statement::new(format!("DELETE FROM {}", table)))
        .collect();
    let deleted = backend.execute_atomic(&stmts).await?;

    debug!("Cleared {} entity rows", deleted);
    Ok(())
}

/// Drop views, then tables children-first
#[instrument(skip(backend))]
pub async fn drop_all<B: Backend + ?Sized>(backend: &B) -> DbResult<()> {
    let view_drops = views::ALL.iter().map(|name| drop_stmt("VIEW", name));
    let table_drops = tables::ALL
        .iter()
        .rev()
        .map(|name| drop_stmt("TABLE", name));
    let stmts: Vec<Statement> = view_drops.chain(table_drops).collect();
    backend.execute_atomic(&stmts).await?;

    info!("Schema dropped");
    Ok(())
}

fn drop_stmt(kind: &str, name: &str) -> Statement {
    Statement::new(format!("DROP {kind} IF EXISTS {name}"))
}

/// Row count of every base table, in [`tables::ALL`] order
#[instrument(skip(backend))]
pub async fn table_counts<B: Backend + ?Sized>(backend: &B) -> DbResult<Vec<(&'static str, i64)>> {
    let mut counts = Vec::with_capacity(tables::ALL.len());
    for table in tables::ALL {
        let row = backend
            .fetch_optional(&Statement::new(format!("SELECT COUNT(*) FROM {table}")))
            .await?
            .ok_or(DbError::NotFound)?;
        counts.push((table, row.get_i64(0)?));
    }
    Ok(counts)
}

/// Columns: actor_id, actor_name, age, height
pub(crate) fn actor_from_row(row: &Row) -> DbResult<Actor> {
    Ok(Actor {
        id: row.get_i64(0)?,
        name: row.get_str(1)?.to_string(),
        age: row.get_i64(2)?,
        height: row.get_i64(3)?,
    })
}

/// Columns: movie_name, year, genre
pub(crate) fn movie_from_row(row: &Row) -> DbResult<Movie> {
    let genre = row
        .get_str(2)?
        .parse::<Genre>()
        .map_err(|e| DbError::RowDecode(format!("{}", e)))?;
    Ok(Movie {
        name: row.get_str(0)?.to_string(),
        year: row.get_i64(1)?,
        genre,
    })
}

/// Columns: studio_id, studio_name
pub(crate) fn studio_from_row(row: &Row) -> DbResult<Studio> {
    Ok(Studio {
        id: row.get_i64(0)?,
        name: row.get_str(1)?.to_string(),
    })
}

/// Columns: critic_id, critic_name
pub(crate) fn critic_from_row(row: &Row) -> DbResult<Critic> {
    Ok(Critic {
        id: row.get_i64(0)?,
        name: row.get_str(1)?.to_string(),
    })
}
