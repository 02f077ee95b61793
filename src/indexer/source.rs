//! Line-oriented access to source files.

use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{Result, SearchError};

/// Read a file, replacing invalid UTF-8 sequences.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| SearchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Lines `start..=end` (1-indexed) of `source`, line terminators kept.
///
/// Out-of-range bounds are clamped; an empty or inverted range yields "".
pub fn snippet(source: &str, start: usize, end: usize) -> String {
    let first = start.saturating_sub(1);
    if end <= first {
        return String::new();
    }
    source
        .split_inclusive('\n')
        .skip(first)
        .take(end - first)
        .collect()
}

/// [`snippet`] of a file on disk, or "" when it cannot be read.
pub fn read_snippet(path: &Path, start: usize, end: usize) -> String {
    read_source(path)
        .map(|source| snippet(&source, start, end))
        .unwrap_or_default()
}

/// Declaration header: from `start` through the first line containing `{`.
pub fn signature_lines(source: &str, start: usize) -> String {
    let mut header = Vec::new();
    for line in source.lines().skip(start.saturating_sub(1)) {
        header.push(line);
        if line.contains('{') {
            break;
        }
    }
    header.join("\n")
}

/// A match of a literal pattern and the lines around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// 1-indexed line the match starts on
    pub line: usize,
    pub context: String,
}

/// Every non-overlapping match of `pattern` with `context_lines` lines either side.
pub fn find_occurrences(source: &str, pattern: &Regex, context_lines: usize) -> Vec<Occurrence> {
    let lines: Vec<&str> = source.lines().collect();
    let mut occurrences = Vec::new();
    let mut line = 1;
    let mut scanned = 0;

    for found in pattern.find_iter(source) {
        line += source[scanned..found.start()].matches('\n').count();
        scanned = found.start();

        let index = line - 1;
        let first = index.saturating_sub(context_lines);
        let last = (index + context_lines + 1).min(lines.len());
        let context = if first < last {
            lines[first..last].join("\n")
        } else {
            String::new()
        };

        occurrences.push(Occurrence { line, context });
    }

    occurrences
}
