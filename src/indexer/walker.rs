use ignore::WalkBuilder;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::config::IndexerConfig;

/// Build-artifact exclusion shared by file discovery and tree rendering.
///
/// A path is excluded when any of its directory segments below the root
/// contains one of the patterns as a substring. File names are not checked.
#[derive(Debug, Clone)]
pub struct Exclusions {
    patterns: Vec<String>,
}

impl Exclusions {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns.to_vec(),
        }
    }

    /// Check a single path segment.
    pub fn excludes_segment(&self, segment: &str) -> bool {
        self.patterns.iter().any(|p| segment.contains(p.as_str()))
    }

    /// Check every directory segment of the file `path` that lies below `root`.
    pub fn excludes_path(&self, root: &Path, path: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let Some(dirs) = relative.parent() else {
            return false;
        };
        dirs.components().any(|component| match component {
            Component::Normal(segment) => self.excludes_segment(&segment.to_string_lossy()),
            _ => false,
        })
    }
}

/// Walks the filesystem collecting source files outside build-artifact directories
pub struct Walker {
    root: PathBuf,
    extensions: HashSet<String>,
    exclusions: Exclusions,
    respect_gitignore: bool,
}

impl Walker {
    /// Create a new Walker with the given root directory and configuration
    pub fn new(root: PathBuf, config: &IndexerConfig) -> Self {
        Self {
            root,
            extensions: config.extensions.iter().cloned().collect(),
            exclusions: Exclusions::new(&config.ignore_patterns),
            respect_gitignore: config.respect_gitignore,
        }
    }

    /// Walk the directory tree and return an iterator of file paths
    ///
    /// Hidden entries are skipped and siblings are visited in file-name order,
    /// so the output is stable across runs.
    pub fn walk(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let mut builder = WalkBuilder::new(&self.root);

        builder.git_ignore(self.respect_gitignore);
        builder.git_global(self.respect_gitignore);
        builder.git_exclude(self.respect_gitignore);
        builder.ignore(self.respect_gitignore);
        builder.parents(self.respect_gitignore);
        builder.hidden(true);
        builder.sort_by_file_name(|a, b| a.cmp(b));

        // Prune excluded directories instead of walking into them
        let prune = self.exclusions.clone();
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            entry.depth() == 0
                || !is_dir
                || !prune.excludes_segment(&entry.file_name().to_string_lossy())
        });

        builder
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter(move |entry| !self.exclusions.excludes_path(&self.root, entry.path()))
            .filter(move |entry| {
                entry
                    .path()
                    .extension()
                    .and_then(OsStr::to_str)
                    .map(|ext| self.extensions.contains(ext))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
    }

    /// Collect all walkable files into a Vec
    pub fn collect_files(&self) -> Vec<PathBuf> {
        self.walk().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn test_config() -> IndexerConfig {
        IndexerConfig::default()
    }

    #[test]
    fn test_walker_finds_java_files() {
        let dir = tempdir().unwrap();
        let src_dir = dir.path().join("src/main/java");
        fs::create_dir_all(&src_dir).unwrap();

        fs::write(src_dir.join("Main.java"), "class Main {}").unwrap();
        fs::write(src_dir.join("Util.java"), "class Util {}").unwrap();
        fs::write(src_dir.join("readme.md"), "# Readme").unwrap();

        let walker = Walker::new(dir.path().to_path_buf(), &test_config());
        let files = walker.collect_files();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "java"));
    }

    #[test]
    fn test_walker_output_is_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("b/Z.java"), "class Z {}").unwrap();
        fs::write(dir.path().join("a/Y.java"), "class Y {}").unwrap();
        fs::write(dir.path().join("X.java"), "class X {}").unwrap();

        let walker = Walker::new(dir.path().to_path_buf(), &test_config());
        let names: Vec<_> = walker
            .collect_files()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["X.java", "Y.java", "Z.java"]);
    }

    #[test]
    fn test_walker_ignores_build_directories() {
        let dir = tempdir().unwrap();
        for sub in ["target/classes", "build", "generated-sources", "src"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }

        fs::write(dir.path().join("src/Main.java"), "class Main {}").unwrap();
        fs::write(dir.path().join("target/classes/Gen.java"), "class Gen {}").unwrap();
        fs::write(dir.path().join("build/Out.java"), "class Out {}").unwrap();
        fs::write(dir.path().join("generated-sources/Api.java"), "class Api {}").unwrap();

        let walker = Walker::new(dir.path().to_path_buf(), &test_config());
        let files = walker.collect_files();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/Main.java"));
    }

    #[test]
    fn test_exclusion_ignores_root_segments() {
        // The root itself lives under a directory named "build"
        let dir = tempdir().unwrap();
        let root = dir.path().join("build").join("project");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("App.java"), "class App {}").unwrap();

        let walker = Walker::new(root.clone(), &test_config());
        assert_eq!(walker.collect_files().len(), 1);
    }

    #[test]
    fn test_exclusion_is_substring_on_segment() {
        let exclusions = Exclusions::new(&["out".to_string()]);
        let root = Path::new("/repo");

        assert!(exclusions.excludes_path(root, Path::new("/repo/layout/View.java")));
        assert!(exclusions.excludes_path(root, Path::new("/repo/out/A.java")));
        assert!(!exclusions.excludes_path(root, Path::new("/repo/src/A.java")));
        assert!(!exclusions.excludes_path(root, Path::new("/repo/src/Layout.java")));
    }
}
