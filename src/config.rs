//! YAML configuration model.
//!
//! The configuration document has a top-level `portages` sequence; each
//! entry describes one source database, one or more destinations, and the
//! options controlling what gets copied.
//!
//! ```yaml
//! portages:
//!   - source:
//!       host: prod-db.example.com
//!       user: reader
//!       password: hunter2
//!       name: appdb
//!     dest:
//!       host: qa-db.example.com
//!       user: root
//!       password: root
//!       name: appdb_qa
//!     create_dest_db: true
//!     fetch_data: true
//!     ignore_tables: [audit_log]
//!     test_users:
//!       - user: qa_reader
//!         password: s3cret
//!         permissions: read
//!     update:
//!       - sql/qa_fixtures.sql
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PortError;

/// Top-level configuration document.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub portages: Vec<PortageJob>,
}

impl Config {
    /// Load and parse a configuration file.
    ///
    /// An empty `portages` sequence is rejected: a config that declares no
    /// work is a config shape mistake, not a no-op.
    pub fn load(path: &Path) -> Result<Self, PortError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        if config.portages.is_empty() {
            return Err(PortError::NoPortages);
        }
        for job in &config.portages {
            if job.destinations().is_empty() {
                return Err(PortError::NoDestinations {
                    source_name: job.source.name.clone(),
                });
            }
        }
        Ok(config)
    }
}

/// One source-to-destination(s) replication task.
#[derive(Debug, Clone, Deserialize)]
pub struct PortageJob {
    /// Database engine for this job. Only the MySQL family is supported.
    #[serde(default = "default_db_type")]
    pub db_type: String,

    pub source: Connection,

    /// A single destination mapping or a sequence of them.
    dest: OneOrMany<Connection>,

    /// Drop and recreate each destination database before loading.
    #[serde(default)]
    pub create_dest_db: bool,

    /// Test users to provision on every destination.
    #[serde(default)]
    pub test_users: Vec<TestUser>,

    /// Copy row data as well as schema.
    #[serde(default = "default_true")]
    pub fetch_data: bool,

    /// Tables excluded from the bulk data copy. Their schema is still
    /// copied; only meaningful when `fetch_data` is true.
    #[serde(default)]
    pub ignore_tables: Vec<String>,

    /// SQL scripts applied to every destination after the load completes.
    #[serde(default)]
    pub update: Vec<PathBuf>,
}

impl PortageJob {
    /// The destinations as a slice, whether the config gave one or many.
    pub fn destinations(&self) -> &[Connection] {
        match &self.dest {
            OneOrMany::One(dest) => std::slice::from_ref(dest),
            OneOrMany::Many(dests) => dests,
        }
    }
}

fn default_db_type() -> String {
    "mysql".to_string()
}

fn default_true() -> bool {
    true
}

/// Connection descriptor for a source or destination database.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    pub host: String,
    pub user: String,
    pub password: String,
    /// Database name.
    pub name: String,
}

/// A credential provisioned on destination databases.
#[derive(Debug, Clone, Deserialize)]
pub struct TestUser {
    pub user: String,
    pub password: String,
    #[serde(default)]
    pub permissions: PermissionLevel,
}

/// Bounded permission level for a test user.
///
/// Anything other than `write` or `admin` (including an unset field) falls
/// back to read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum PermissionLevel {
    #[default]
    Read,
    Write,
    Admin,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Read => "read",
            PermissionLevel::Write => "write",
            PermissionLevel::Admin => "admin",
        }
    }
}

impl From<String> for PermissionLevel {
    fn from(level: String) -> Self {
        match level.as_str() {
            "write" => PermissionLevel::Write,
            "admin" => PermissionLevel::Admin,
            _ => PermissionLevel::Read,
        }
    }
}

/// Accepts either a single mapping or a sequence of mappings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}
