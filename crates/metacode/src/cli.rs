//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metacode")]
#[command(version, about = "Expand #metacode macro blocks embedded in source comments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to metacode.toml (default: ./metacode.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate the code between #metagen and #metaend
    Expand {
        /// Source files to expand in place
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print expanded files instead of writing them
        #[arg(long, conflicts_with = "watch")]
        stdout: bool,

        /// Keep running and re-expand files when they change
        #[arg(short, long, env = "WATCH")]
        watch: bool,
    },

    /// Fail if any generated region is out of date
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the tables, macros and invocations of a file
    Inspect {
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
