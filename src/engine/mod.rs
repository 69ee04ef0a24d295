//! Engine adapters.
//!
//! An [`Engine`] translates abstract plan steps (dump, load, create, grant,
//! apply) into concrete client invocations for one database engine family.
//! The planner only speaks in these capabilities; adding an engine means
//! adding an implementation, not touching the planner.

pub mod mysql;

pub use mysql::MySqlEngine;

use std::path::Path;

use crate::command::ShellCommand;
use crate::config::{Connection, TestUser};
use crate::error::PortError;

/// What a dump should contain.
///
/// Schema-only and data-only are mutually exclusive client flags, which is
/// why a selective transfer needs two dump/load cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpMode {
    /// Table definitions only, no rows.
    SchemaOnly,
    /// Rows only, in an insert form safe for pre-existing tables.
    DataOnly,
    /// Table definitions and rows in one pass.
    Full,
}

/// Renders abstract plan steps as (description, command) pairs for one
/// engine's command-line clients.
pub trait Engine {
    /// Dump schema and/or data from the source into `output`.
    fn render_dump(
        &self,
        source: &Connection,
        mode: DumpMode,
        ignore_tables: &[String],
        output: &Path,
    ) -> (String, ShellCommand);

    /// Load a previously dumped file into a destination.
    fn render_load(&self, dest: &Connection, input: &Path) -> (String, ShellCommand);

    /// Drop and recreate a destination database.
    fn render_create_database(&self, dest: &Connection) -> (String, ShellCommand);

    /// Provision a test user on a destination with its bounded permissions.
    fn render_grant(&self, dest: &Connection, user: &TestUser) -> (String, ShellCommand);

    /// Apply an update script to a destination.
    fn render_apply_script(&self, dest: &Connection, script: &Path) -> (String, ShellCommand);
}

/// Check a job's declared engine type before constructing an adapter.
pub fn ensure_supported(db_type: &str) -> Result<(), PortError> {
    if db_type == "mysql" {
        Ok(())
    } else {
        Err(PortError::UnsupportedEngine {
            db_type: db_type.to_string(),
        })
    }
}
