//! Read-only structural queries over an indexed Java project.

use regex::Regex;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::indexer::source::{find_occurrences, read_snippet, read_source, signature_lines, snippet};
use crate::indexer::{Exclusions, JavaExtractor, ParsedFile};
use crate::indexing::{IndexBuilder, IndexReport};
use crate::symbol::{Location, SymbolIndex};

use super::output::{Miss, ToolOutput};
use super::query::Query;
use super::result::{collapse_to_files, collapse_to_methods, render_blocks, SearchResult};
use super::tree::render_tree;

const FILES_HEADING: &str = "They appeared in the following files:\n";

/// Source text of files touched by one query, read at most once each
#[derive(Default)]
struct Sources<'a> {
    loaded: HashMap<&'a Path, String>,
}

impl<'a> Sources<'a> {
    fn get(&mut self, path: &'a Path) -> Result<&str> {
        if !self.loaded.contains_key(path) {
            let source = read_source(path)?;
            self.loaded.insert(path, source);
        }
        Ok(self.loaded.get(path).map(String::as_str).unwrap_or_default())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Query engine over one project, indexed once at construction.
///
/// Immutable after [`build`](Self::build); share it across threads by
/// reference or `Arc`.
pub struct QueryEngine {
    root: PathBuf,
    config: Config,
    index: SymbolIndex,
    report: IndexReport,
}

impl QueryEngine {
    /// Index every Java file under `root`.
    pub fn build(root: impl AsRef<Path>, config: &Config) -> Result<Self> {
        Self::build_with_progress(root, config, false)
    }

    pub fn build_with_progress(
        root: impl AsRef<Path>,
        config: &Config,
        progress: bool,
    ) -> Result<Self> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|_| SearchError::InvalidRoot(root.to_path_buf()))?;

        let (index, report) = IndexBuilder::new(root.clone(), &config.indexer)
            .with_progress(progress)
            .build()?;

        info!(
            "Query engine ready for {} ({} classes)",
            root.display(),
            index.class_count()
        );

        Ok(Self {
            root,
            config: config.clone(),
            index,
            report,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    pub fn report(&self) -> &IndexReport {
        &self.report
    }

    /// Run a named query.
    pub fn execute(&self, query: &Query) -> ToolOutput {
        match query {
            Query::FindClass { class_name } => self.find_class(class_name),
            Query::FindClassInFile {
                class_name,
                file_name,
            } => self.find_class_in_file(class_name, file_name),
            Query::FindClassFull { class_name } => self.find_class_full(class_name),
            Query::FindMethod { method_name } => self.find_method(method_name),
            Query::FindMethodInClass {
                method_name,
                class_name,
            } => self.find_method_in_class(method_name, class_name),
            Query::FindMethodInFile {
                method_name,
                file_name,
            } => self.find_method_in_file(method_name, file_name),
            Query::FindCode { code } => self.find_code(code),
            Query::FindCodeInFile { code, file_name } => self.find_code_in_file(code, file_name),
            Query::ExtractClassSkeleton { file_name } => self.extract_class_skeleton(file_name),
            Query::RepoStructure { max_depth } => self.repo_structure(*max_depth),
            Query::RetrieveSnippet {
                file_path,
                start_line,
                end_line,
            } => {
                let code = self.retrieve_snippet(file_path, *start_line, *end_line);
                if code.is_empty() {
                    ToolOutput::not_found(
                        Miss::Symbol,
                        format!(
                            "Could not read lines {}-{} of {}.",
                            start_line,
                            end_line,
                            file_path.display()
                        ),
                    )
                } else {
                    let summary = format!(
                        "Retrieved lines {}-{} of {}",
                        start_line,
                        end_line,
                        file_path.display()
                    );
                    ToolOutput::found(code, summary)
                }
            }
        }
    }

    /// Every class, interface or enum named `class_name`, by signature.
    pub fn find_class(&self, class_name: &str) -> ToolOutput {
        self.guarded("find_class", || {
            let locations = self.index.classes(class_name);
            if locations.is_empty() {
                return Ok(ToolOutput::not_found(
                    Miss::Symbol,
                    format!("Could not find class {} in the codebase.", class_name),
                )
                .with_summary(format!(
                    "Class {} did not appear in the codebase.",
                    class_name
                )));
            }

            let results = self.class_signatures(class_name, locations.iter())?;
            let header = format!(
                "Found {} classes with name {} in the codebase:\n\n",
                results.len(),
                class_name
            );
            let text = self.listing(header, &results);
            Ok(ToolOutput::found(
                text,
                format!("The tool returned information about class `{}`.", class_name),
            ))
        })
    }

    /// Declarations of `class_name` in files whose path ends with `file_name`.
    pub fn find_class_in_file(&self, class_name: &str, file_name: &str) -> ToolOutput {
        self.guarded("find_class_in_file", || {
            let candidates = self.index.files_ending_with(file_name);
            if candidates.is_empty() {
                return Ok(missing_file(file_name));
            }

            let locations = self.index.classes(class_name);
            if locations.is_empty() {
                return Ok(ToolOutput::not_found(
                    Miss::Symbol,
                    format!("Could not find class {} in the codebase.", class_name),
                ));
            }

            let in_files: Vec<&Location> = locations
                .iter()
                .filter(|loc| candidates.iter().any(|parsed| parsed.path == loc.file))
                .collect();
            if in_files.is_empty() {
                return Ok(ToolOutput::not_found(
                    Miss::SymbolInContainer,
                    format!("Could not find class {} in file {}.", class_name, file_name),
                ));
            }

            let results = self.class_signatures(class_name, in_files.into_iter())?;
            let header = format!(
                "Found {} classes with name {} in file {}:\n\n",
                results.len(),
                class_name,
                file_name
            );
            let text = format!("{}{}", header, render_blocks(&results, &self.root));
            Ok(ToolOutput::found(text, header))
        })
    }

    /// Like [`find_class`](Self::find_class), showing the full body of the
    /// first few declarations.
    pub fn find_class_full(&self, class_name: &str) -> ToolOutput {
        self.guarded("find_class_full", || {
            let locations = self.index.classes(class_name);
            if locations.is_empty() {
                return Ok(ToolOutput::not_found(
                    Miss::Symbol,
                    format!("Could not find class {} in the codebase.", class_name),
                )
                .with_summary(format!(
                    "Class {} did not appear in the codebase.",
                    class_name
                )));
            }

            let limit = self.config.search.full_class_limit;
            let mut sources = Sources::default();
            let mut results = Vec::new();
            for loc in locations.iter().take(limit) {
                let source = sources.get(&loc.file)?;
                results.push(
                    SearchResult::new(
                        loc.file.clone(),
                        snippet(source, loc.range.start, loc.range.end),
                    )
                    .in_class(Some(class_name)),
                );
            }

            let header = format!(
                "Found {} classes with name {} in the codebase:\n\n",
                locations.len(),
                class_name
            );
            let mut text = header.clone();
            if locations.len() > limit {
                text.push_str(&format!(
                    "Too many results, showing full code for {} of them:\n",
                    limit
                ));
            }
            text.push_str(&render_blocks(&results, &self.root));
            Ok(ToolOutput::found(text, header))
        })
    }

    /// Every method or constructor named `method_name`.
    pub fn find_method(&self, method_name: &str) -> ToolOutput {
        self.guarded("find_method", || {
            let matches = self.index.all_methods(method_name);
            if matches.is_empty() {
                return Ok(ToolOutput::not_found(
                    Miss::Symbol,
                    format!("Could not find method {} in the codebase.", method_name),
                ));
            }

            let results = self.method_bodies(method_name, &matches)?;
            let header = format!(
                "Found {} methods with name {} in the codebase:\n\n",
                results.len(),
                method_name
            );
            let text = self.listing(header.clone(), &results);
            Ok(ToolOutput::found(text, header))
        })
    }

    /// Methods named `method_name` declared in classes named `class_name`.
    pub fn find_method_in_class(&self, method_name: &str, class_name: &str) -> ToolOutput {
        self.guarded("find_method_in_class", || {
            if !self.index.has_class(class_name) {
                return Ok(ToolOutput::not_found(
                    Miss::Container,
                    format!("Could not find class {} in the codebase.", class_name),
                ));
            }

            let matches: Vec<(Option<&str>, &Location)> = self
                .index
                .class_methods(class_name, method_name)
                .iter()
                .map(|loc| (Some(class_name), loc))
                .collect();
            if matches.is_empty() {
                return Ok(ToolOutput::not_found(
                    Miss::SymbolInContainer,
                    format!("Could not find method {} in class {}.", method_name, class_name),
                ));
            }

            let results = self.method_bodies(method_name, &matches)?;
            let limit = self.config.search.result_show_limit;
            let header = format!(
                "Found {} methods with name {} in class {}:\n\n",
                results.len(),
                method_name,
                class_name
            );

            let mut text = header.clone();
            if results.len() > limit {
                let (shown, rest) = results.split_at(limit);
                text.push_str(&format!(
                    "Too many results, showing full code for {} of them, and the rest just file names:\n",
                    limit
                ));
                text.push_str(&render_blocks(shown, &self.root));
                text.push_str("Other results are in these files:\n");
                text.push_str(&collapse_to_files(rest, &self.root));
            } else {
                text.push_str(&render_blocks(&results, &self.root));
            }
            Ok(ToolOutput::found(text, header))
        })
    }

    /// Methods named `method_name` in files whose path ends with `file_name`.
    pub fn find_method_in_file(&self, method_name: &str, file_name: &str) -> ToolOutput {
        self.guarded("find_method_in_file", || {
            let candidates = self.index.files_ending_with(file_name);
            if candidates.is_empty() {
                return Ok(missing_file(file_name));
            }

            let matches = self.index.all_methods(method_name);
            if matches.is_empty() {
                return Ok(ToolOutput::not_found(
                    Miss::Symbol,
                    format!("The method {} does not appear in the codebase.", method_name),
                ));
            }

            let in_files: Vec<(Option<&str>, &Location)> = matches
                .into_iter()
                .filter(|(_, loc)| candidates.iter().any(|parsed| parsed.path == loc.file))
                .collect();
            if in_files.is_empty() {
                return Ok(ToolOutput::not_found(
                    Miss::SymbolInContainer,
                    format!(
                        "There is no method with name `{}` in file {}.",
                        method_name, file_name
                    ),
                ));
            }

            let results = self.method_bodies(method_name, &in_files)?;
            let header = format!(
                "Found {} methods with name `{}` in file {}:\n\n",
                results.len(),
                method_name,
                file_name
            );
            let text = format!("{}{}", header, render_blocks(&results, &self.root));
            Ok(ToolOutput::found(text, header))
        })
    }

    /// Literal occurrences of `code` anywhere in the project.
    pub fn find_code(&self, code: &str) -> ToolOutput {
        self.guarded("find_code", || {
            let miss = || {
                ToolOutput::not_found(
                    Miss::Symbol,
                    format!("Could not find code {} in the codebase.", code),
                )
            };
            if code.is_empty() {
                return Ok(miss());
            }

            let files: Vec<&ParsedFile> = self.index.files().collect();
            let results = self.code_occurrences(&files, code)?;
            if results.is_empty() {
                return Ok(miss());
            }

            let header = format!(
                "Found {} snippets containing `{}` in the codebase:\n\n",
                results.len(),
                code
            );
            let text = self.listing(header.clone(), &results);
            Ok(ToolOutput::found(text, header))
        })
    }

    /// Literal occurrences of `code` in files whose path ends with `file_name`.
    ///
    /// One trailing `)` is dropped from `code` before searching.
    pub fn find_code_in_file(&self, code: &str, file_name: &str) -> ToolOutput {
        self.guarded("find_code_in_file", || {
            let code = code.strip_suffix(')').unwrap_or(code);

            let candidates = self.index.files_ending_with(file_name);
            if candidates.is_empty() {
                return Ok(missing_file(file_name));
            }

            let results = if code.is_empty() {
                Vec::new()
            } else {
                self.code_occurrences(&candidates, code)?
            };
            if results.is_empty() {
                return Ok(ToolOutput::not_found(
                    Miss::SymbolInContainer,
                    format!("Could not find code {} in file {}.", code, file_name),
                ));
            }

            let header = format!(
                "Found {} snippets with code {} in file {}:\n\n",
                results.len(),
                code,
                file_name
            );
            let mut text = header.clone();
            if results.len() > self.config.search.result_show_limit {
                text.push_str("They appeared in the following methods:\n");
                text.push_str(&collapse_to_methods(&results, &self.root));
            } else {
                text.push_str(&render_blocks(&results, &self.root));
            }
            Ok(ToolOutput::found(text, header))
        })
    }

    /// Signatures of every type and member in the first file whose path ends
    /// with `file_name`.
    pub fn extract_class_skeleton(&self, file_name: &str) -> ToolOutput {
        self.guarded("extract_class_skeleton", || {
            let Some(parsed) = self.index.files_ending_with(file_name).into_iter().next() else {
                return Ok(missing_file(file_name));
            };

            let mut extractor = JavaExtractor::new(self.config.indexer.member_ranges)?;
            match extractor.skeleton(&parsed.path) {
                Ok(skeleton) => Ok(ToolOutput::found(
                    format!(
                        "Class skeleton extracted from {}:\n\n```java\n{}\n```",
                        file_name, skeleton
                    ),
                    format!("Successfully extracted class skeleton from {}", file_name),
                )),
                Err(e) => {
                    error!("Skeleton extraction failed for {}: {}", parsed.path.display(), e);
                    Ok(ToolOutput::failed(format!(
                        "Failed to extract skeleton from {}: {}",
                        file_name, e
                    )))
                }
            }
        })
    }

    /// Directory tree of the project, `max_depth` levels below the root's
    /// children (configured default when `None`).
    pub fn repo_structure(&self, max_depth: Option<usize>) -> ToolOutput {
        self.guarded("repo_structure", || {
            let depth = max_depth.unwrap_or(self.config.search.default_tree_depth);
            let exclusions = Exclusions::new(&self.config.indexer.ignore_patterns);

            match render_tree(&self.root, &exclusions, &self.config.indexer.extensions, depth) {
                Ok(tree) => Ok(ToolOutput::found(
                    tree,
                    format!(
                        "Repository structure with {} Java files and {} classes",
                        self.index.file_count(),
                        self.index.class_count()
                    ),
                )),
                Err(e) => Ok(ToolOutput::failed(format!(
                    "Error generating repository structure: {}",
                    e
                ))),
            }
        })
    }

    /// Lines `start..=end` of `file`, resolved against the root when relative.
    ///
    /// Empty when the file cannot be read or the range is out of bounds.
    pub fn retrieve_snippet(&self, file: &Path, start: usize, end: usize) -> String {
        let path = if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        };
        read_snippet(&path, start, end)
    }

    /// Run one operation, converting errors and panics into a failed output.
    fn guarded(&self, operation: &str, run: impl FnOnce() -> Result<ToolOutput>) -> ToolOutput {
        debug!("Running {}", operation);
        match catch_unwind(AssertUnwindSafe(run)) {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                error!("{} failed: {}", operation, e);
                ToolOutput::failed(format!("Error in {}: {}", operation, e))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("{} panicked: {}", operation, message);
                ToolOutput::failed(format!("Error in {}: {}", operation, message))
            }
        }
    }

    /// Blocks when within the show limit, otherwise a per-file listing.
    fn listing(&self, header: String, results: &[SearchResult]) -> String {
        let mut text = header;
        if results.len() > self.config.search.result_show_limit {
            text.push_str(FILES_HEADING);
            text.push_str(&collapse_to_files(results, &self.root));
        } else {
            text.push_str(&render_blocks(results, &self.root));
        }
        text
    }

    fn class_signatures<'a>(
        &self,
        class_name: &str,
        locations: impl Iterator<Item = &'a Location>,
    ) -> Result<Vec<SearchResult>> {
        let mut sources = Sources::default();
        let mut results = Vec::new();
        for loc in locations {
            let source = sources.get(&loc.file)?;
            results.push(
                SearchResult::new(loc.file.clone(), signature_lines(source, loc.range.start))
                    .in_class(Some(class_name)),
            );
        }
        Ok(results)
    }

    fn method_bodies(
        &self,
        method_name: &str,
        matches: &[(Option<&str>, &Location)],
    ) -> Result<Vec<SearchResult>> {
        let mut sources = Sources::default();
        let mut results = Vec::new();
        for (class, loc) in matches {
            let source = sources.get(&loc.file)?;
            results.push(
                SearchResult::new(
                    loc.file.clone(),
                    snippet(source, loc.range.start, loc.range.end),
                )
                .in_class(*class)
                .in_method(Some(method_name)),
            );
        }
        Ok(results)
    }

    fn code_occurrences(&self, files: &[&ParsedFile], code: &str) -> Result<Vec<SearchResult>> {
        let pattern = Regex::new(&regex::escape(code))?;
        let context = self.config.search.context_lines;

        let mut results = Vec::new();
        for parsed in files {
            let source = read_source(&parsed.path)?;
            for occurrence in find_occurrences(&source, &pattern, context) {
                let enclosing = self.index.enclosing(&parsed.path, occurrence.line);
                results.push(
                    SearchResult::new(parsed.path.clone(), occurrence.context)
                        .in_class(enclosing.class)
                        .in_method(enclosing.method),
                );
            }
        }
        debug!("{} occurrences of {:?}", results.len(), code);
        Ok(results)
    }
}

fn missing_file(file_name: &str) -> ToolOutput {
    ToolOutput::not_found(
        Miss::Container,
        format!("Could not find file {} in the codebase.", file_name),
    )
}
