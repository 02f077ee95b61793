//! In-memory symbol indices for fast lookups

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::indexer::{LineRange, Member, ParsedFile};

/// Where a symbol is declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Absolute path of the declaring file
    pub file: PathBuf,
    pub range: LineRange,
}

/// Class and method surrounding a line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosing {
    pub class: Option<String>,
    pub method: Option<String>,
}

/// Name-keyed indices over every successfully parsed file.
///
/// A name may map to any number of locations; duplicates are kept in the
/// order files were merged and are never collapsed.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    /// Class name to every declaration carrying it
    classes: IndexMap<String, Vec<Location>>,
    /// Class name to method name to every declaration (overloads included)
    class_methods: IndexMap<String, IndexMap<String, Vec<Location>>>,
    /// Methods not bound to a class
    methods: IndexMap<String, Vec<Location>>,
    /// Parsed files in discovery order
    files: IndexMap<PathBuf, ParsedFile>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one parsed file into the indices.
    pub fn insert_file(&mut self, parsed: ParsedFile) {
        let file = parsed.path.clone();
        let location = |range: LineRange| Location {
            file: file.clone(),
            range,
        };

        for declaration in &parsed.declarations {
            self.classes
                .entry(declaration.name.clone())
                .or_default()
                .push(location(declaration.range));
            self.class_methods
                .entry(declaration.name.clone())
                .or_default();
        }

        for (owner, member) in parsed.callables() {
            self.class_methods
                .entry(owner.to_string())
                .or_default()
                .entry(member.name.clone())
                .or_default()
                .push(location(member.range));
        }

        for member in parsed.free_members.iter().filter(|m| m.kind.is_callable()) {
            self.methods
                .entry(member.name.clone())
                .or_default()
                .push(location(member.range));
        }

        self.files.insert(file, parsed);
    }

    /// Every declaration of a class, interface or enum named `name`
    pub fn classes(&self, name: &str) -> &[Location] {
        self.classes.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Class names in the order they were first seen
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Methods named `method` declared in any class named `class`
    pub fn class_methods(&self, class: &str, method: &str) -> &[Location] {
        self.class_methods
            .get(class)
            .and_then(|methods| methods.get(method))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Methods named `name` that belong to no class
    pub fn free_methods(&self, name: &str) -> &[Location] {
        self.methods.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every method named `name`: free methods first, then per class in
    /// class-index order, each paired with its class name.
    pub fn all_methods(&self, name: &str) -> Vec<(Option<&str>, &Location)> {
        let free = self.free_methods(name).iter().map(|loc| (None, loc));
        let bound = self.class_names().flat_map(|class| {
            self.class_methods(class, name)
                .iter()
                .map(move |loc| (Some(class), loc))
        });
        free.chain(bound).collect()
    }

    /// Parsed files in discovery order
    pub fn files(&self) -> impl Iterator<Item = &ParsedFile> {
        self.files.values()
    }

    pub fn file(&self, path: &Path) -> Option<&ParsedFile> {
        self.files.get(path)
    }

    /// Parsed files whose path string ends with `suffix`
    pub fn files_ending_with(&self, suffix: &str) -> Vec<&ParsedFile> {
        self.files
            .values()
            .filter(|parsed| parsed.path.to_string_lossy().ends_with(suffix))
            .collect()
    }

    /// Resolve the class and method around `line` of `file`.
    ///
    /// A containing method wins, preferring the one declared closest above the
    /// line. Otherwise the innermost containing class is reported.
    pub fn enclosing(&self, file: &Path, line: usize) -> Enclosing {
        let Some(parsed) = self.files.get(file) else {
            return Enclosing::default();
        };

        let mut method: Option<(&str, &Member)> = None;
        for (owner, member) in parsed.callables() {
            let closer = method.map_or(true, |(_, best)| member.range.start > best.range.start);
            if member.range.contains(line) && closer {
                method = Some((owner, member));
            }
        }

        if let Some((owner, member)) = method {
            return Enclosing {
                class: Some(owner.to_string()),
                method: Some(member.name.clone()),
            };
        }

        if let Some(member) = parsed
            .free_members
            .iter()
            .find(|m| m.kind.is_callable() && m.range.contains(line))
        {
            return Enclosing {
                class: None,
                method: Some(member.name.clone()),
            };
        }

        let class = parsed
            .declarations
            .iter()
            .filter(|d| d.range.contains(line))
            .min_by_key(|d| d.range.end - d.range.start)
            .map(|d| d.name.clone());

        Enclosing {
            class,
            method: None,
        }
    }

    /// Number of distinct class names
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of class declarations, duplicates included
    pub fn declaration_count(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }

    /// Number of indexed method declarations, overloads included
    pub fn method_count(&self) -> usize {
        let bound: usize = self
            .class_methods
            .values()
            .flat_map(|methods| methods.values())
            .map(Vec::len)
            .sum();
        let free: usize = self.methods.values().map(Vec::len).sum();
        bound + free
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
