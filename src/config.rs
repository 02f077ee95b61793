use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".progctx";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indexer: IndexerConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How member and declaration end lines are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStrategy {
    /// Fixed line offsets from the declaration line
    #[default]
    Heuristic,
    /// Structural node boundaries reported by the parser
    Exact,
}

impl std::fmt::Display for RangeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeStrategy::Heuristic => write!(f, "heuristic"),
            RangeStrategy::Exact => write!(f, "exact"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// File extensions to index
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Path segments containing any of these are skipped
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Honour .gitignore files during discovery
    #[serde(default)]
    pub respect_gitignore: bool,

    /// Number of parallel threads for parsing (None = auto-detect)
    #[serde(default)]
    pub parallel_threads: Option<usize>,

    /// Line range computation for declarations and members
    #[serde(default)]
    pub member_ranges: RangeStrategy,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_patterns: default_ignore_patterns(),
            respect_gitignore: false,
            parallel_threads: None,
            member_ranges: RangeStrategy::default(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["java".to_string()]
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        "build".to_string(),
        "target".to_string(),
        "bin".to_string(),
        "out".to_string(),
        "test-data".to_string(),
        "generated".to_string(),
        "node_modules".to_string(),
        "__pycache__".to_string(),
    ]
}

/// Result shaping for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Above this many matches, project-wide searches collapse to a listing
    #[serde(default = "default_result_show_limit")]
    pub result_show_limit: usize,

    /// Number of full class bodies shown by `find_class_full`
    #[serde(default = "default_full_class_limit")]
    pub full_class_limit: usize,

    /// Lines of context on each side of a code match
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Depth used by `repo_structure` when the caller gives none
    #[serde(default = "default_tree_depth")]
    pub default_tree_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_show_limit: default_result_show_limit(),
            full_class_limit: default_full_class_limit(),
            context_lines: default_context_lines(),
            default_tree_depth: default_tree_depth(),
        }
    }
}

fn default_result_show_limit() -> usize {
    3
}

fn default_full_class_limit() -> usize {
    2
}

fn default_context_lines() -> usize {
    5
}

fn default_tree_depth() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rotating files
    #[serde(default)]
    pub enabled: bool,

    /// Also log to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// File log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory, relative paths resolve against the project root
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// hourly, daily, minutely or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_true(),
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_file_prefix(),
            rotation: default_rotation(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("logs")
}

fn default_file_prefix() -> String {
    "progctx.log".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .progctx directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .progctx directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        let config_path = config_dir.join(CONFIG_FILE);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the .progctx directory
    pub fn config_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }
}
