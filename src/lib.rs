pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod indexer;
pub mod indexing;
pub mod logging;
pub mod search;
pub mod symbol;

pub use config::Config;
pub use error::{Result, SearchError};
pub use search::{Query, QueryEngine, ToolOutput};
