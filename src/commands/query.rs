//! Query commands: index, run one query under a timeout, print the result.

use anyhow::{anyhow, Context, Result};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::search::{Query, ToolOutput};
use crate::Config;

/// Parse a JSON query such as `{"tool": "find_class", "class_name": "Foo"}`.
pub fn parse_query(json: &str) -> Result<Query> {
    serde_json::from_str(json).with_context(|| format!("Invalid query: {}", json))
}

/// Run `query` against a freshly indexed `root`.
///
/// Returns whether the query succeeded. Text is printed to stdout and the
/// summary to stderr, or both as one JSON object with `json`.
pub async fn run(
    root: PathBuf,
    config: Config,
    query: Query,
    timeout_secs: u64,
    json: bool,
) -> Result<bool> {
    let engine = Arc::new(super::build_engine(root, config, false).await?);
    let name = query.name();
    debug!("Executing {}", name);

    let task = tokio::task::spawn_blocking({
        let engine = Arc::clone(&engine);
        move || engine.execute(&query)
    });
    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), task)
        .await
        .map_err(|_| anyhow!("{} timed out after {}s", name, timeout_secs))?
        .with_context(|| format!("{} panicked", name))?;

    let success = output.success();
    print_output(output, json)?;
    Ok(success)
}

fn print_output(output: ToolOutput, as_json: bool) -> Result<()> {
    if as_json {
        let success = output.success();
        let value = json!({
            "text": output.text,
            "summary": output.summary,
            "success": success,
            "status": output.status,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let (text, summary, _) = output.into_parts();
        println!("{}", text);
        eprintln!("{}", summary);
    }
    Ok(())
}
