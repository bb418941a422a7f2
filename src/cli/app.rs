//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::output::{Output, OutputFormat};
use super::schedule;
use crate::storage::TaskStore;

#[derive(Parser)]
#[command(name = "taskplan")]
#[command(author, version, about = "Dependency-aware schedule checking for project task lists")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Task file (JSONL, one task per line)
    #[arg(long, global = true, default_value = "tasks.jsonl", env = "TASKPLAN_FILE")]
    pub file: PathBuf,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show tasks with their dates and predecessor counts
    List,

    /// Check stored schedules against predecessor constraints
    Validate {
        /// Task to check (checks every task when omitted)
        id: Option<String>,
    },

    /// Compute the corrected dates for one task
    Reschedule {
        /// Task to reschedule
        id: String,

        /// Persist the corrected dates to the task file
        #[arg(long)]
        write: bool,
    },

    /// Propagate corrections across the whole file in dependency order
    Cascade {
        /// Persist every correction to the task file
        #[arg(long)]
        write: bool,
    },

    /// Print tasks in dependency order (predecessors first)
    Order,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);
    let store = TaskStore::new(&cli.file);

    output.verbose(&format!("Task file: {}", cli.file.display()));

    match cli.command {
        Commands::List => schedule::list(&output, &store),
        Commands::Validate { id } => schedule::validate(&output, &store, id.as_deref()),
        Commands::Reschedule { id, write } => schedule::reschedule(&output, &store, &id, write),
        Commands::Cascade { write } => schedule::cascade(&output, &store, write),
        Commands::Order => schedule::order(&output, &store),
    }
}
