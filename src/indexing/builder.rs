//! Parallel index construction using Rayon

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::IndexerConfig;
use crate::error::{Result, SearchError};
use crate::indexer::{JavaExtractor, ParsedFile, Walker};
use crate::symbol::SymbolIndex;

use super::errors::{ErrorReport, FileError};

/// Outcome of one index build
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub discovered: usize,
    pub parsed: usize,
    pub failed: usize,
    /// Class declarations, duplicates included
    pub classes: usize,
    /// Method and constructor declarations, overloads included
    pub methods: usize,
    pub duration: Duration,
    pub errors: Vec<FileError>,
}

impl IndexReport {
    pub fn summary(&self) -> String {
        format!(
            "Indexed {} of {} Java files in {:.2}s: {} classes, {} methods, {} files failed to parse",
            self.parsed,
            self.discovered,
            self.duration.as_secs_f64(),
            self.classes,
            self.methods,
            self.failed
        )
    }

    pub fn error_report(&self) -> ErrorReport {
        ErrorReport::from_errors(&self.errors)
    }
}

/// Builds a [`SymbolIndex`] by parsing every discovered file in parallel.
pub struct IndexBuilder {
    root: PathBuf,
    config: IndexerConfig,
    progress: bool,
}

impl IndexBuilder {
    pub fn new(root: impl Into<PathBuf>, config: &IndexerConfig) -> Self {
        Self {
            root: root.into(),
            config: config.clone(),
            progress: false,
        }
    }

    /// Show a progress bar on stderr while parsing
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    /// Discover, parse and merge. Files that fail are reported, never fatal.
    pub fn build(&self) -> Result<(SymbolIndex, IndexReport)> {
        let start = Instant::now();

        if !self.root.is_dir() {
            return Err(SearchError::InvalidRoot(self.root.clone()));
        }

        let files = Walker::new(self.root.clone(), &self.config).collect_files();
        info!("Found {} Java files under {}", files.len(), self.root.display());

        let outcomes = self.parse_parallel(&files)?;

        // Serial merge keeps index order identical to discovery order
        let mut index = SymbolIndex::new();
        let mut errors = Vec::new();
        for (path, outcome) in files.iter().zip(outcomes) {
            match outcome {
                Ok(parsed) => index.insert_file(parsed),
                Err(e) => {
                    debug!("Skipping {}: {}", path.display(), e);
                    errors.push(FileError::new(path.clone(), &e));
                }
            }
        }

        let report = IndexReport {
            discovered: files.len(),
            parsed: index.file_count(),
            failed: errors.len(),
            classes: index.declaration_count(),
            methods: index.method_count(),
            duration: start.elapsed(),
            errors,
        };

        info!("{}", report.summary());
        if report.failed > 0 {
            warn!("Failed to parse {} Java files", report.failed);
            report.error_report().log_summary();
        }

        Ok((index, report))
    }

    fn parse_parallel(&self, files: &[PathBuf]) -> Result<Vec<Result<ParsedFile>>> {
        let strategy = self.config.member_ranges;
        // Fail fast if the grammar cannot be loaded at all
        JavaExtractor::new(strategy)?;

        let threads = self
            .config
            .parallel_threads
            .unwrap_or_else(num_cpus::get)
            .max(1);
        debug!("Using {} threads for parsing", threads);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;

        let progress = self.progress.then(|| create_progress_bar(files.len()));
        let progress_ref = progress.as_ref();

        let outcomes = pool.install(|| {
            files
                .par_iter()
                .map_init(
                    || JavaExtractor::new(strategy).ok(),
                    |extractor, path| {
                        let outcome = match extractor {
                            Some(extractor) => {
                                catch_unwind(AssertUnwindSafe(|| extractor.extract_file(path)))
                                    .unwrap_or_else(|_| {
                                        warn!("Panic while parsing {}", path.display());
                                        Err(SearchError::Parse(path.clone()))
                                    })
                            }
                            None => Err(SearchError::Parse(path.clone())),
                        };
                        if let Some(pb) = progress_ref {
                            pb.inc(1);
                        }
                        outcome
                    },
                )
                .collect::<Vec<_>>()
        });

        if let Some(pb) = progress {
            pb.finish_with_message("Complete");
        }

        Ok(outcomes)
    }
}

/// Create a progress bar with standard styling
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] Parsing: [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
