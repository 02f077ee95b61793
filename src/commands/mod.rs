pub mod index;
pub mod query;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::search::QueryEngine;
use crate::Config;

/// Index `root` on a blocking thread.
pub async fn build_engine(root: PathBuf, config: Config, progress: bool) -> Result<QueryEngine> {
    let display = root.display().to_string();
    tokio::task::spawn_blocking(move || QueryEngine::build_with_progress(&root, &config, progress))
        .await
        .context("Indexing task panicked")?
        .with_context(|| format!("Failed to index {}", display))
}
