//! Step execution and spool-file cleanup.
//!
//! The executor walks a [`Plan`] in order: announce, run each step, clean
//! up, done. Step failures are reported and never abort the run; a failed
//! step's spool file is pulled out of the pending-deletion set so it
//! survives for inspection.
//!
//! External command execution sits behind the [`CommandRunner`] trait so
//! the whole state machine can be exercised in-process without spawning
//! `mysql`.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::command::ShellCommand;
use crate::output::Output;
use crate::planner::{Plan, PlannedStep};

/// Run-mode flags, resolved once from the CLI and passed explicitly to
/// whoever needs them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Suppress all job output.
    pub quiet: bool,
    /// Print every command and keep spool files afterwards.
    pub debug: bool,
    /// Print commands without executing them.
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            quiet: cli.quiet,
            debug: cli.debug,
            dry_run: cli.dry_run,
        }
    }
}

/// Captured result of one client invocation.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Whether the process exited zero.
    pub success: bool,
    pub stderr: String,
}

/// Trait for abstracting external command execution.
///
/// [`RealCommandRunner`] spawns the process; [`MockCommandRunner`] records
/// calls and returns canned outcomes for tests.
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion, feeding its configured stdin file and
    /// capturing stderr.
    fn run(&self, command: &ShellCommand) -> Result<RunOutcome>;
}

/// Production implementation that delegates to [`std::process::Command`].
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, command: &ShellCommand) -> Result<RunOutcome> {
        let mut process = Command::new(command.program());
        process.args(command.argv());
        match command.stdin() {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                process.stdin(Stdio::from(file));
            }
            None => {
                process.stdin(Stdio::null());
            }
        }

        let output = process
            .output()
            .with_context(|| format!("Failed to run '{}'", command.program().display()))?;
        debug!(
            command = %command,
            success = output.status.success(),
            "Command completed"
        );
        Ok(RunOutcome {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs one job's plan start to finish.
pub struct Executor<'a> {
    options: RunOptions,
    runner: &'a dyn CommandRunner,
}

impl<'a> Executor<'a> {
    pub fn new(options: RunOptions, runner: &'a dyn CommandRunner) -> Self {
        Self { options, runner }
    }

    pub fn run(&self, plan: Plan) -> Result<()> {
        let Plan {
            steps,
            spool_files,
            diagnostics,
        } = plan;
        let mut pending: Vec<PathBuf> = spool_files;

        if !self.options.quiet {
            if self.options.dry_run {
                Output::header("Starting portage (dry run)");
            } else {
                Output::header("Starting portage");
            }
            for diagnostic in &diagnostics {
                Output::error(diagnostic);
            }
        }

        for step in &steps {
            if !self.options.quiet {
                Output::step(&step.description);
            }
            if self.options.debug || self.options.dry_run {
                Output::running(step.command.render());
            }
            if !self.options.dry_run {
                self.run_step(step, &mut pending);
            }
            if !self.options.quiet {
                Output::separator();
            }
        }

        if !self.options.debug {
            if !self.options.quiet && !pending.is_empty() {
                Output::info("Removing temp files...");
            }
            for spool in &pending {
                match std::fs::remove_file(spool) {
                    Ok(()) => {}
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(err) => warn!(
                        spool = %spool.display(),
                        %err,
                        "Failed to remove spool file"
                    ),
                }
            }
        }

        if !self.options.quiet {
            Output::success("Portage complete");
        }
        Ok(())
    }

    fn run_step(&self, step: &PlannedStep, pending: &mut Vec<PathBuf>) {
        match self.runner.run(&step.command) {
            Ok(outcome) => {
                // Exit status is the primary failure signal; the ERROR
                // marker catches client versions that exit zero after a
                // per-statement failure.
                if !outcome.success || outcome.stderr.contains("ERROR") {
                    self.report_failure(step, outcome.stderr.trim(), pending);
                }
            }
            Err(err) => {
                self.report_failure(step, &format!("{err:#}"), pending);
            }
        }
    }

    /// Report a failed step and keep its spool file for inspection.
    fn report_failure(&self, step: &PlannedStep, detail: &str, pending: &mut Vec<PathBuf>) {
        warn!(command = %step.command, detail, "Step failed");
        if !self.options.quiet {
            if !self.options.debug {
                // the command was not echoed yet in this mode
                Output::running(step.command.render());
            }
            Output::error(format!("Step failed: {detail}"));
        }
        if let Some(artifact) = &step.artifact {
            pending.retain(|spool| spool != artifact);
        }
    }
}

/// Test double that records every call and returns canned outcomes.
pub struct MockCommandRunner {
    calls: std::sync::Mutex<Vec<String>>,
    /// Rendered-command substring that triggers an `ERROR` marker on stderr.
    error_marker_on: Option<String>,
    /// Rendered-command substring that triggers a nonzero exit.
    fail_status_on: Option<String>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            error_marker_on: None,
            fail_status_on: None,
        }
    }

    /// Respond with `ERROR` on stderr (but a zero exit) for any command
    /// whose rendered form contains `needle`.
    pub fn error_marker_on(mut self, needle: impl Into<String>) -> Self {
        self.error_marker_on = Some(needle.into());
        self
    }

    /// Respond with a nonzero exit for any command whose rendered form
    /// contains `needle`.
    pub fn fail_status_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_status_on = Some(needle.into());
        self
    }

    /// Rendered form of every command run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, command: &ShellCommand) -> Result<RunOutcome> {
        let rendered = command.render();
        self.calls.lock().unwrap().push(rendered.clone());

        if let Some(needle) = &self.error_marker_on {
            if rendered.contains(needle.as_str()) {
                return Ok(RunOutcome {
                    success: true,
                    stderr: "ERROR 1064 (42000): You have an error in your SQL syntax".to_string(),
                });
            }
        }
        if let Some(needle) = &self.fail_status_on {
            if rendered.contains(needle.as_str()) {
                return Ok(RunOutcome {
                    success: false,
                    stderr: "mysqldump: Got error: 2003: Can't connect to MySQL server".to_string(),
                });
            }
        }
        Ok(RunOutcome {
            success: true,
            stderr: String::new(),
        })
    }
}
