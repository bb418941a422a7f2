//! # Command-Line Interface
//!
//! Commands over a JSONL task file:
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `list` | Show tasks with dates and predecessor counts |
//! | `validate [ID]` | Check stored schedules against predecessor constraints |
//! | `reschedule <ID>` | Compute (or persist) the corrected dates for one task |
//! | `cascade` | Propagate corrections across the whole file in dependency order |
//! | `order` | Print tasks in dependency order |
//!
//! All commands support `--format text|json` and `--verbose`. The task
//! file defaults to `tasks.jsonl` and can be overridden with `--file`.
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod schedule;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
