//! Index command implementation.
//!
//! Builds the index once and reports what was found. Nothing is persisted;
//! every other command indexes again on startup.

use anyhow::Result;
use std::path::PathBuf;

use crate::Config;

/// Run the index command.
///
/// # Arguments
///
/// * `root` - Project root to index
/// * `progress` - Show a progress bar while parsing
pub async fn run(root: PathBuf, config: Config, progress: bool) -> Result<()> {
    let engine = super::build_engine(root, config, progress).await?;
    let report = engine.report();
    let index = engine.index();

    println!("Project root: {}", engine.root().display());
    if index.is_empty() && report.failed == 0 {
        println!("No Java files found");
        return Ok(());
    }
    println!("{}", report.summary());
    println!(
        "Distinct class names: {}, declarations: {}",
        index.class_count(),
        index.declaration_count()
    );

    let errors = report.error_report();
    if errors.has_errors() {
        println!("\n{}:", errors.summary);
        for (stage, failures) in &errors.by_stage {
            println!("  {} ({}):", stage, failures.len());
            for failure in failures {
                println!("    - {}", failure.path.display());
            }
        }
    }

    Ok(())
}
