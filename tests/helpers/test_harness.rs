use anyhow::Result;
use progctx::{Config, QueryEngine};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Throwaway Java project on disk
pub struct TestHarness {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            config: Config::default(),
        })
    }

    pub fn create_test_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Index the project as it currently is on disk
    pub fn engine(&self) -> Result<QueryEngine> {
        Ok(QueryEngine::build(self.path(), &self.config)?)
    }
}
