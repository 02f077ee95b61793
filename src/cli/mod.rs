use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::search::Query;

#[derive(Parser)]
#[command(name = "progctx")]
#[command(author, version, about = "Structural search over Java source trees")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Give up on a query after this many seconds
    #[arg(long, global = true, default_value = "60")]
    pub timeout_secs: u64,

    /// Print text, summary and status as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index the project and print statistics
    Index {
        /// Show a progress bar while parsing
        #[arg(long)]
        progress: bool,
    },

    /// Show the directory tree of Java sources
    Tree {
        /// Levels shown below the root's children
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Find classes, interfaces and enums by name
    Class {
        name: String,

        /// Only files whose path ends with this
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Show the full code of classes with this name
    ClassFull { name: String },

    /// Find methods and constructors by name
    Method {
        name: String,

        /// Only methods of this class
        #[arg(short, long, conflicts_with = "file")]
        class: Option<String>,

        /// Only files whose path ends with this
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Find literal occurrences of a code snippet
    Code {
        snippet: String,

        /// Only files whose path ends with this
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Print the signature skeleton of a file
    Skeleton {
        /// Path suffix of the file
        file: String,
    },

    /// Print lines START through END of a file
    Snippet {
        file: PathBuf,
        start: usize,
        end: usize,
    },

    /// Run a query given as JSON, e.g. '{"tool": "find_class", "class_name": "Foo"}'
    Call { json: String },
}

impl Commands {
    /// The query this subcommand runs; `None` for `index` and for `call`,
    /// whose query is parsed separately.
    pub fn query(&self) -> Option<Query> {
        let query = match self {
            Commands::Index { .. } | Commands::Call { .. } => return None,
            Commands::Tree { depth } => Query::RepoStructure { max_depth: *depth },
            Commands::Class { name, file: None } => Query::FindClass {
                class_name: name.clone(),
            },
            Commands::Class {
                name,
                file: Some(file),
            } => Query::FindClassInFile {
                class_name: name.clone(),
                file_name: file.clone(),
            },
            Commands::ClassFull { name } => Query::FindClassFull {
                class_name: name.clone(),
            },
            Commands::Method {
                name,
                class: Some(class),
                ..
            } => Query::FindMethodInClass {
                method_name: name.clone(),
                class_name: class.clone(),
            },
            Commands::Method {
                name,
                class: None,
                file: Some(file),
            } => Query::FindMethodInFile {
                method_name: name.clone(),
                file_name: file.clone(),
            },
            Commands::Method {
                name,
                class: None,
                file: None,
            } => Query::FindMethod {
                method_name: name.clone(),
            },
            Commands::Code {
                snippet,
                file: None,
            } => Query::FindCode {
                code: snippet.clone(),
            },
            Commands::Code {
                snippet,
                file: Some(file),
            } => Query::FindCodeInFile {
                code: snippet.clone(),
                file_name: file.clone(),
            },
            Commands::Skeleton { file } => Query::ExtractClassSkeleton {
                file_name: file.clone(),
            },
            Commands::Snippet { file, start, end } => Query::RetrieveSnippet {
                file_path: file.clone(),
                start_line: *start,
                end_line: *end,
            },
        };
        Some(query)
    }
}
