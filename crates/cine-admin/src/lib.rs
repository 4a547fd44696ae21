//! cinedb administration
//!
//! Schema lifecycle, bulk loading and reporting over a movie-industry
//! database. The binary only parses arguments and wires up config,
//! logging and the connection; everything else lives here so it can be
//! driven against an in-memory database.

pub mod dataset;
pub mod report;

use anyhow::{Context, Result};
use cine_db::{schema, Backend, Repository};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

pub use dataset::{Dataset, LoadSummary, Rejection};
pub use report::Report;

#[derive(Parser, Debug)]
#[command(name = "cinedb")]
#[command(about = "Manage a movie-industry database", long_about = None)]
pub struct Cli {
    /// Database URL (overrides config file and DATABASE_URL)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create tables and views that do not exist yet
    Init,

    /// Delete every row, keeping the schema
    Clear,

    /// Drop all tables and views
    Drop,

    /// Show row counts per table
    Status,

    /// Load entities and relations from a JSON file
    Load {
        /// Path to the dataset
        file: PathBuf,
    },

    /// Print the analytics report as JSON
    Report,
}

/// Execute one command, writing human output to `out`
pub async fn run<B: Backend>(
    repo: &Repository<B>,
    command: &Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Init => {
            schema::create_all(repo.backend())
                .await
                .context("Failed to create schema")?;
            writeln!(out, "Schema ready")?;
        }
        Command::Clear => {
            schema::clear_all(repo.backend())
                .await
                .context("Failed to clear data")?;
            writeln!(out, "Data cleared")?;
        }
        Command::Drop => {
            schema::drop_all(repo.backend())
                .await
                .context("Failed to drop schema")?;
            writeln!(out, "Schema dropped")?;
        }
        Command::Status => {
            let counts = schema::table_counts(repo.backend())
                .await
                .context("Failed to count rows (is the schema initialized?)")?;
            for (table, count) in counts {
                writeln!(out, "{}: {}", table, count)?;
            }
        }
        Command::Load { file } => {
            let dataset = Dataset::from_file(file)?;
            let summary = dataset.apply(repo).await;
            write_summary(out, dataset.len(), &summary)?;
        }
        Command::Report => {
            let report = Report::collect(repo).await;
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, total: usize, summary: &LoadSummary) -> Result<()> {
    writeln!(out, "Loaded {} of {} items", summary.applied, total)?;
    for rejection in &summary.rejected {
        writeln!(out, "rejected {}: {}", rejection.item, rejection.code)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["cinedb", "-d", "sqlite::memory:", "status"]).unwrap();
        assert_eq!(cli.database.as_deref(), Some("sqlite::memory:"));
        assert_eq!(cli.command, Command::Status);

        let cli = Cli::try_parse_from(["cinedb", "load", "data.json"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Load {
                file: PathBuf::from("data.json")
            }
        );

        assert!(Cli::try_parse_from(["cinedb"]).is_err());
        assert!(Cli::try_parse_from(["cinedb", "load"]).is_err());
    }
}
