//! Declaration extraction from Java sources.
//!
//! A parsed file is reduced to its type declarations and their members, each
//! carrying a 1-indexed inclusive line range.

pub mod java;

use indexmap::IndexMap;
use std::path::PathBuf;

pub use java::{JavaExtractor, SyntaxTree};

/// Inclusive, 1-indexed line span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Build a range, lifting `end` to `start` if it would precede it.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Types of type declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Interface,
    Enum,
}

/// Types of declaration members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Constructor,
    Field,
}

impl MemberKind {
    /// Methods and constructors are callable; fields are not.
    pub fn is_callable(&self) -> bool {
        matches!(self, MemberKind::Method | MemberKind::Constructor)
    }
}

/// A class, interface or enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub range: LineRange,
}

/// A method, constructor or field of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub range: LineRange,
}

/// Everything extracted from one source file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    /// Declarations in preorder, nested ones after their enclosing type
    pub declarations: Vec<Declaration>,
    /// Members keyed by the name of the declaring type
    pub members: IndexMap<String, Vec<Member>>,
    /// Members not bound to any type; Java never produces these
    pub free_members: Vec<Member>,
}

impl ParsedFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            declarations: Vec::new(),
            members: IndexMap::new(),
            free_members: Vec::new(),
        }
    }

    /// Callable members paired with the name of their declaring type.
    pub fn callables(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().flat_map(|(owner, members)| {
            members
                .iter()
                .filter(|m| m.kind.is_callable())
                .map(move |m| (owner.as_str(), m))
        })
    }
}

/// Helper function to get text from source bytes at a node's range.
pub fn get_node_text(source: &[u8], start: usize, end: usize) -> &str {
    source
        .get(start..end)
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .unwrap_or("")
}

/// Helper function to extract a node's text content.
pub fn node_text<'a>(node: &tree_sitter::Node, source: &'a [u8]) -> &'a str {
    get_node_text(source, node.start_byte(), node.end_byte())
}
