//! Query layer over the symbol index.
//!
//! This module contains:
//! - `engine` - `QueryEngine`, the entry point for every query operation
//! - `query` - serde-tagged `Query` for invoking operations by name
//! - `output` - `ToolOutput` and its typed status
//! - `result` - tagged rendering and collapsed listings of matches
//! - `tree` - box-drawing project layout

pub mod engine;
pub mod output;
pub mod query;
pub mod result;
pub mod tree;

pub use engine::QueryEngine;
pub use output::{Miss, Status, ToolOutput};
pub use query::Query;
pub use result::SearchResult;
