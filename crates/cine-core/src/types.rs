//! Entity records and result codes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Caller-supplied identifier for actors, studios and critics
pub type EntityId = i64;

/// Release year of a movie (part of the movie key)
pub type Year = i64;

/// Id carried by every "not found" sentinel record
pub const BAD_ID: EntityId = -1;

/// Earliest accepted release year
pub const FIRST_MOVIE_YEAR: Year = 1895;

/// Outcome of a mutating operation
///
/// Callers branch on this instead of handling driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnCode {
    Ok,
    NotExists,
    AlreadyExists,
    BadParameters,
    Error,
}

impl ReturnCode {
    pub fn is_ok(self) -> bool {
        matches!(self, ReturnCode::Ok)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReturnCode::Ok => "OK",
            ReturnCode::NotExists => "NOT_EXISTS",
            ReturnCode::AlreadyExists => "ALREADY_EXISTS",
            ReturnCode::BadParameters => "BAD_PARAMETERS",
            ReturnCode::Error => "ERROR",
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Movie genre (stored as its display name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Comedy,
    Drama,
    Horror,
}

impl Genre {
    pub const ALL: [Genre; 4] = [Genre::Action, Genre::Comedy, Genre::Drama, Genre::Horror];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown genre: {0}")]
pub struct GenreParseError(pub String);

impl FromStr for Genre {
    type Err = GenreParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| GenreParseError(s.to_string()))
    }
}

/// Actor record (`actors` row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: EntityId,
    pub name: String,
    pub age: i64,
    pub height: i64,
}

impl Actor {
    pub fn new(id: EntityId, name: impl Into<String>, age: i64, height: i64) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            height,
        }
    }

    /// Sentinel returned by lookups that find nothing
    pub fn bad() -> Self {
        Self::new(BAD_ID, "", BAD_ID, BAD_ID)
    }

    pub fn is_bad(&self) -> bool {
        self.id == BAD_ID
    }
}

/// Movie record, keyed by `(name, year)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub name: String,
    pub year: Year,
    pub genre: Genre,
}

impl Movie {
    pub fn new(name: impl Into<String>, year: Year, genre: Genre) -> Self {
        Self {
            name: name.into(),
            year,
            genre,
        }
    }

    /// Sentinel returned by lookups that find nothing.
    ///
    /// Recognised by its year; the genre carries no meaning.
    pub fn bad() -> Self {
        Self::new("", BAD_ID, Genre::Drama)
    }

    pub fn is_bad(&self) -> bool {
        self.year == BAD_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studio {
    pub id: EntityId,
    pub name: String,
}

impl Studio {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn bad() -> Self {
        Self::new(BAD_ID, "")
    }

    pub fn is_bad(&self) -> bool {
        self.id == BAD_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critic {
    pub id: EntityId,
    pub name: String,
}

impl Critic {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn bad() -> Self {
        Self::new(BAD_ID, "")
    }

    pub fn is_bad(&self) -> bool {
        self.id == BAD_ID
    }
}
