use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use progctx::cli::{Cli, Commands};
use progctx::commands;
use progctx::config::Config;
use progctx::logging::{init_early_logging, init_logging};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Project root: --root, otherwise the current directory
    let project_root = match cli.root.clone() {
        Some(root) => root,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    // Load configuration (if available, otherwise use defaults)
    let config = Config::load(&project_root).unwrap_or_default();

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = match init_logging(&config.logging, &project_root) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: {:#}, logging to stderr only", e);
            init_early_logging();
            None
        }
    };

    tracing::info!("progctx starting up");
    tracing::debug!("Project root: {}", project_root.display());

    let query = match &cli.command {
        Commands::Index { progress } => {
            commands::index::run(project_root, config, *progress).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Call { json } => commands::query::parse_query(json)?,
        command => match command.query() {
            Some(query) => query,
            None => return Ok(ExitCode::SUCCESS),
        },
    };

    let success =
        commands::query::run(project_root, config, query, cli.timeout_secs, cli.json).await?;

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
