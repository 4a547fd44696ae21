//! Core records and result codes for the movie-industry schema
//!
//! This crate holds the plain data shared by the database layer and its
//! callers: entity records, their "not found" sentinels, analytics rows,
//! and the closed set of result codes mutating operations return.

pub mod reports;
pub mod types;

pub use reports::*;
pub use types::*;
