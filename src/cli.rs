//! CLI argument definitions for dbport.
//!
//! Separated from `main.rs` so that library code
//! (e.g. [`RunOptions::from_cli`](crate::executor::RunOptions::from_cli))
//! can reference these types.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dbport")]
#[command(about = "Port MySQL schema and selected data from a source database into one or more destinations")]
#[command(version)]
pub struct Cli {
    /// YAML-formatted configuration file
    pub config: PathBuf,

    /// Run with no output
    #[arg(short, long)]
    pub quiet: bool,

    /// Show parsed config and all commands, and keep temp files
    #[arg(short = 'X', long)]
    pub debug: bool,

    /// Show commands without running them
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}
