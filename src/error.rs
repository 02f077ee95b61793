//! Error types for indexing and query execution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the index or serving a query.
///
/// Query operations never surface these to their caller directly; they are
/// rendered into a failed `ToolOutput` at the operation boundary.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The project root is missing or not a directory.
    #[error("Project root {0} is not a directory")]
    InvalidRoot(PathBuf),

    /// A source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file did not parse, even after recovery.
    #[error("Failed to parse Java file {0}")]
    Parse(PathBuf),

    /// The tree-sitter grammar could not be loaded.
    #[error("Failed to load Java grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// Directory traversal failed.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A search pattern could not be compiled.
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The parsing thread pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
