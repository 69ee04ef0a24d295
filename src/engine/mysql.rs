//! MySQL adapter: renders plan steps as `mysqldump`/`mysql` invocations.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::command::ShellCommand;
use crate::config::{Connection, PermissionLevel, TestUser};
use crate::error::PortError;

use super::{DumpMode, Engine};

pub struct MySqlEngine {
    mysqldump: PathBuf,
    mysql: PathBuf,
}

impl MySqlEngine {
    /// Locate both client executables on PATH.
    ///
    /// A missing client aborts the whole run before any planning happens.
    pub fn locate() -> Result<Self, PortError> {
        let mysqldump =
            which::which("mysqldump").map_err(|_| PortError::ClientNotFound { name: "mysqldump" })?;
        let mysql = which::which("mysql").map_err(|_| PortError::ClientNotFound { name: "mysql" })?;
        debug!(
            mysqldump = %mysqldump.display(),
            mysql = %mysql.display(),
            "Located MySQL clients"
        );
        Ok(Self { mysqldump, mysql })
    }

    /// Build an adapter from explicit client paths, skipping PATH lookup.
    pub fn with_clients(mysqldump: impl Into<PathBuf>, mysql: impl Into<PathBuf>) -> Self {
        Self {
            mysqldump: mysqldump.into(),
            mysql: mysql.into(),
        }
    }

    /// A `mysql` invocation authenticated against `conn`.
    fn client(&self, conn: &Connection) -> ShellCommand {
        ShellCommand::new(&self.mysql)
            .arg(format!("-h{}", conn.host))
            .arg(format!("-u{}", conn.user))
            .arg(format!("-p{}", conn.password))
    }
}

impl Engine for MySqlEngine {
    fn render_dump(
        &self,
        source: &Connection,
        mode: DumpMode,
        ignore_tables: &[String],
        output: &Path,
    ) -> (String, ShellCommand) {
        let (data_flags, dump_kind): (&[&str], &str) = match mode {
            // CREATE TABLE statements without any data rows
            DumpMode::SchemaOnly => (&["--no-data"], "empty schema"),
            // rows only, bulk-inserted into the pre-existing tables
            DumpMode::DataOnly => (&["--no-create-info", "--complete-insert"], "selected data"),
            DumpMode::Full => (&["--complete-insert"], "all tables and data"),
        };

        let mut command = ShellCommand::new(&self.mysqldump)
            .arg("--lock-tables=false")
            .arg("--routines=true")
            .args(data_flags.iter().copied());
        for table in ignore_tables {
            command = command.arg(format!("--ignore-table={}.{}", source.name, table));
        }
        command = command
            .arg(format!("--result-file={}", output.display()))
            .arg(format!("-h{}", source.host))
            .arg(format!("-u{}", source.user))
            .arg(format!("-p{}", source.password))
            .arg(&source.name);

        let description = format!(
            "Dumping {} from {}.{}...",
            dump_kind, source.host, source.name
        );
        (description, command)
    }

    fn render_load(&self, dest: &Connection, input: &Path) -> (String, ShellCommand) {
        let command = self.client(dest).arg(&dest.name).stdin_file(input);
        let description = format!(
            "Loading {} on {}.{}...",
            input.display(),
            dest.name,
            dest.host
        );
        (description, command)
    }

    fn render_create_database(&self, dest: &Connection) -> (String, ShellCommand) {
        // drop-if-exists first so reruns are idempotent
        let sql = format!(
            "DROP DATABASE IF EXISTS {0}; CREATE DATABASE {0};",
            dest.name
        );
        let command = self.client(dest).arg("-e").arg(sql);
        let description = format!("Creating {} on {}...", dest.name, dest.host);
        (description, command)
    }

    fn render_grant(&self, dest: &Connection, user: &TestUser) -> (String, ShellCommand) {
        let privileges = match user.permissions {
            PermissionLevel::Write => "SELECT, INSERT, UPDATE, DELETE, EXECUTE",
            PermissionLevel::Admin => "ALL",
            PermissionLevel::Read => "SELECT",
        };
        let sql = format!(
            "GRANT {} ON {}.* TO '{}'@'%' IDENTIFIED BY '{}'; FLUSH PRIVILEGES;",
            privileges, dest.name, user.user, user.password
        );
        let command = self.client(dest).arg("-e").arg(sql);
        let description = format!(
            "Granting {} {} permission on {}.{}...",
            user.user,
            user.permissions.as_str(),
            dest.host,
            dest.name
        );
        (description, command)
    }

    fn render_apply_script(&self, dest: &Connection, script: &Path) -> (String, ShellCommand) {
        let command = self.client(dest).arg(&dest.name).stdin_file(script);
        let description = format!(
            "Applying {} to {}.{}...",
            script.display(),
            dest.host,
            dest.name
        );
        (description, command)
    }
}
