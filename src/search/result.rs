//! Tagged rendering of search results and the collapsed listings used when a
//! query matches too much.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const NOT_IN_METHOD: &str = "Not in a method";

/// One match: where it is and the code to show for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Absolute path of the file
    pub file: PathBuf,
    pub class: Option<String>,
    pub method: Option<String>,
    pub code: String,
}

impl SearchResult {
    pub fn new(file: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            class: None,
            method: None,
            code: code.into(),
        }
    }

    pub fn in_class(mut self, class: Option<impl Into<String>>) -> Self {
        self.class = class.map(Into::into);
        self
    }

    pub fn in_method(mut self, method: Option<impl Into<String>>) -> Self {
        self.method = method.map(Into::into);
        self
    }

    /// Path of the file below `root`, `/`-separated
    pub fn relative_path(&self, root: &Path) -> Cow<'_, str> {
        match self.file.strip_prefix(root) {
            Ok(relative) => relative.to_string_lossy(),
            Err(_) => self.file.to_string_lossy(),
        }
    }

    /// `<file>..</file>`, then `<class>` on its own line and `<method>` beside
    /// it when known, then the code block.
    pub fn to_tagged(&self, root: &Path) -> String {
        let mut out = format!("<file>{}</file>", self.relative_path(root));
        if let Some(class) = &self.class {
            let _ = write!(out, "\n<class>{}</class>", class);
        }
        if let Some(method) = &self.method {
            let _ = write!(out, " <method>{}</method>", method);
        }
        let _ = write!(out, "\n<code>\n{}\n</code>", self.code);
        out
    }
}

/// Numbered result blocks, each fenced.
pub fn render_blocks(results: &[SearchResult], root: &Path) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "- Search result {}:\n```\n{}\n```",
            i + 1,
            result.to_tagged(root)
        );
    }
    out
}

/// One line per file with its match count, in first-seen order.
pub fn collapse_to_files(results: &[SearchResult], root: &Path) -> String {
    let mut counts: IndexMap<Cow<'_, str>, usize> = IndexMap::new();
    for result in results {
        *counts.entry(result.relative_path(root)).or_default() += 1;
    }

    let mut out = String::new();
    for (file, count) in counts {
        let _ = writeln!(out, "- <file>{}</file> ({} matches)", file, count);
    }
    out
}

/// One line per (file, method) with its match count, in first-seen order.
pub fn collapse_to_methods(results: &[SearchResult], root: &Path) -> String {
    let mut counts: IndexMap<(Cow<'_, str>, Option<&str>), usize> = IndexMap::new();
    for result in results {
        let key = (result.relative_path(root), result.method.as_deref());
        *counts.entry(key).or_default() += 1;
    }

    let mut out = String::new();
    for ((file, method), count) in counts {
        let method = match method {
            Some(name) => format!(" <method>{}</method>", name),
            None => NOT_IN_METHOD.to_string(),
        };
        let _ = writeln!(out, "- <file>{}</file>{} ({} matches)", file, method, count);
    }
    out
}
