//! Named query operations, as exchanged with a tool layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One query operation and its arguments.
///
/// Serialized with the operation name in a `tool` field, e.g.
/// `{"tool": "find_method_in_class", "method_name": "run", "class_name": "Job"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum Query {
    FindClass {
        class_name: String,
    },
    FindClassInFile {
        class_name: String,
        file_name: String,
    },
    FindClassFull {
        class_name: String,
    },
    FindMethod {
        method_name: String,
    },
    FindMethodInClass {
        method_name: String,
        class_name: String,
    },
    FindMethodInFile {
        method_name: String,
        file_name: String,
    },
    FindCode {
        code: String,
    },
    FindCodeInFile {
        code: String,
        file_name: String,
    },
    ExtractClassSkeleton {
        file_name: String,
    },
    RepoStructure {
        #[serde(default)]
        max_depth: Option<usize>,
    },
    RetrieveSnippet {
        file_path: PathBuf,
        start_line: usize,
        end_line: usize,
    },
}

impl Query {
    pub fn name(&self) -> &'static str {
        match self {
            Query::FindClass { .. } => "find_class",
            Query::FindClassInFile { .. } => "find_class_in_file",
            Query::FindClassFull { .. } => "find_class_full",
            Query::FindMethod { .. } => "find_method",
            Query::FindMethodInClass { .. } => "find_method_in_class",
            Query::FindMethodInFile { .. } => "find_method_in_file",
            Query::FindCode { .. } => "find_code",
            Query::FindCodeInFile { .. } => "find_code_in_file",
            Query::ExtractClassSkeleton { .. } => "extract_class_skeleton",
            Query::RepoStructure { .. } => "repo_structure",
            Query::RetrieveSnippet { .. } => "retrieve_snippet",
        }
    }
}
