//! Command planning.
//!
//! Turns one [`PortageJob`](crate::config::PortageJob) into the ordered step
//! list that implements it. Planning decides *what* to run; the
//! [`executor`](crate::executor) decides nothing and runs everything.
//!
//! Steps are always emitted in phase order, regardless of how the
//! configuration was written: database creation, then grants, then the
//! dump/load transfer, then update scripts. Later phases depend on earlier
//! ones (grants need the database to exist, loads need a populated spool
//! file).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::command::ShellCommand;
use crate::config::PortageJob;
use crate::engine::{DumpMode, Engine};

/// One unit of work: what to tell the operator, and what to run.
#[derive(Debug, Clone)]
pub struct PlannedStep {
    pub description: String,
    pub command: ShellCommand,
    /// Spool file this step writes or reads, if any. A failed step keeps
    /// its spool file on disk for post-mortem inspection.
    pub artifact: Option<PathBuf>,
}

impl PlannedStep {
    fn new(rendered: (String, ShellCommand)) -> Self {
        Self {
            description: rendered.0,
            command: rendered.1,
            artifact: None,
        }
    }

    fn with_artifact(rendered: (String, ShellCommand), artifact: &Path) -> Self {
        Self {
            description: rendered.0,
            command: rendered.1,
            artifact: Some(artifact.to_path_buf()),
        }
    }
}

/// The full ordered step list for one job.
#[derive(Debug)]
pub struct Plan {
    pub steps: Vec<PlannedStep>,
    /// Spool files allocated while planning; the executor owns their
    /// cleanup from here on.
    pub spool_files: Vec<PathBuf>,
    /// Problems found while planning (missing update scripts). Reported at
    /// run start; they never abort the job.
    pub diagnostics: Vec<String>,
}

/// Produce the ordered step list for one job.
pub fn plan(job: &PortageJob, engine: &dyn Engine) -> Result<Plan> {
    let mut steps = Vec::new();
    let mut spool_files = Vec::new();
    let mut diagnostics = Vec::new();

    if job.create_dest_db {
        for dest in job.destinations() {
            steps.push(PlannedStep::new(engine.render_create_database(dest)));
        }
    }

    for user in &job.test_users {
        for dest in job.destinations() {
            steps.push(PlannedStep::new(engine.render_grant(dest, user)));
        }
    }

    if job.fetch_data {
        if job.ignore_tables.is_empty() {
            let spool = new_spool_file(&mut spool_files)?;
            transfer_cycle(job, engine, DumpMode::Full, &[], &spool, &mut steps);
        } else {
            // Schema and data must travel separately: the ignored tables
            // keep their structure but lose their rows, and the client's
            // schema-only and data-only modes cannot be combined.
            let schema_spool = new_spool_file(&mut spool_files)?;
            transfer_cycle(
                job,
                engine,
                DumpMode::SchemaOnly,
                &[],
                &schema_spool,
                &mut steps,
            );

            let data_spool = new_spool_file(&mut spool_files)?;
            transfer_cycle(
                job,
                engine,
                DumpMode::DataOnly,
                &job.ignore_tables,
                &data_spool,
                &mut steps,
            );
        }
    } else {
        let spool = new_spool_file(&mut spool_files)?;
        transfer_cycle(job, engine, DumpMode::SchemaOnly, &[], &spool, &mut steps);
    }

    for script in &job.update {
        if !script.is_file() {
            diagnostics.push(format!("{} does not exist, skipping", script.display()));
            continue;
        }
        for dest in job.destinations() {
            steps.push(PlannedStep::new(engine.render_apply_script(dest, script)));
        }
    }

    debug!(
        steps = steps.len(),
        spool_files = spool_files.len(),
        "Planned portage"
    );

    Ok(Plan {
        steps,
        spool_files,
        diagnostics,
    })
}

/// One dump into `spool` followed by a load of it into every destination.
fn transfer_cycle(
    job: &PortageJob,
    engine: &dyn Engine,
    mode: DumpMode,
    ignore_tables: &[String],
    spool: &Path,
    steps: &mut Vec<PlannedStep>,
) {
    steps.push(PlannedStep::with_artifact(
        engine.render_dump(&job.source, mode, ignore_tables, spool),
        spool,
    ));
    for dest in job.destinations() {
        steps.push(PlannedStep::with_artifact(
            engine.render_load(dest, spool),
            spool,
        ));
    }
}

/// Allocate a persisted `.sql` spool file and track it for cleanup.
fn new_spool_file(spool_files: &mut Vec<PathBuf>) -> Result<PathBuf> {
    let (_, path) = tempfile::Builder::new()
        .prefix("dbport-")
        .suffix(".sql")
        .tempfile()
        .context("Failed to create spool file")?
        .keep()
        .context("Failed to persist spool file")?;
    spool_files.push(path.clone());
    Ok(path)
}
