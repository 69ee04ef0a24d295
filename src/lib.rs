//! dbport - port MySQL schema and data between hosts.
//!
//! Reads a declarative YAML configuration describing one or more "portages"
//! (a source database replicated into one or more destinations) and turns
//! each into an ordered sequence of `mysqldump`/`mysql` invocations: create
//! destination databases, provision test users, dump and load schema and/or
//! data, and apply update scripts.
//!
//! The work is split the same way the code is:
//!
//! - [`config`] models the YAML document
//! - [`planner`] decides what to run, in what order
//! - [`engine`] renders each step for a concrete engine's clients
//! - [`executor`] runs the steps, captures per-step errors, and cleans up
//!   the temp spool files

pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod output;
pub mod planner;

pub use cli::Cli;
