use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dbport::config::Config;
use dbport::engine::{self, MySqlEngine};
use dbport::executor::{Executor, RealCommandRunner, RunOptions};
use dbport::output::Output;
use dbport::planner;
use dbport::Cli;

fn main() {
    // Initialize tracing with RUST_LOG env filter
    // e.g., RUST_LOG=dbport=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.config.is_file() {
        Output::error(format!("{} not found", cli.config.display()));
        return Ok(());
    }

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            Output::error("Could not parse configuration file");
            Output::error(err.to_string());
            return Ok(());
        }
    };

    let options = RunOptions::from_cli(&cli);

    if options.debug {
        println!("{config:#?}");
    }

    let runner = RealCommandRunner;
    for job in &config.portages {
        if let Err(err) = engine::ensure_supported(&job.db_type) {
            Output::warning(err.to_string());
            continue;
        }

        // A missing client is fatal for the whole run, not just this job.
        let engine = MySqlEngine::locate()?;
        let plan = planner::plan(job, &engine)?;
        Executor::new(options, &runner).run(plan)?;
    }

    Ok(())
}
