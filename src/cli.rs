use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "episweep")]
#[command(author, version, about = "Repair and reconcile episode-metadata CSV exports")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an export, report diagnostics, optionally write it back normalized
    Check {
        /// Export file to check
        #[arg(required = true)]
        file: PathBuf,

        /// Write the normalized export to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which columns resolved to the episode-number and title roles
    Columns {
        /// Export file to inspect
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete or keep rows matching a set of episode numbers
    Reconcile {
        /// Export file to reconcile
        #[arg(required = true)]
        file: PathBuf,

        /// Episode numbers, comma separated (e.g. 2,4,7)
        #[arg(short, long, required = true, value_delimiter = ',')]
        episodes: Vec<i64>,

        /// What to do with matching rows: delete or keep
        #[arg(short, long, default_value = "delete")]
        mode: String,

        /// Write the result back to the export file
        #[arg(long)]
        write: bool,

        /// Skip the .bak backup when writing
        #[arg(long)]
        no_backup: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}
