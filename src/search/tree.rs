//! Box-drawing rendering of the project layout.

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::indexer::Exclusions;

struct TreeEntry {
    depth: usize,
    name: String,
    is_dir: bool,
}

fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
}

/// Directories before files, then by name
fn listing_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    is_dir(b)
        .cmp(&is_dir(a))
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Render `root` as a tree of directories and source files.
///
/// Entries deeper than `max_depth` levels below the root's children are
/// omitted. Hidden and excluded directories are skipped, as are directories
/// that cannot be read for lack of permission.
pub fn render_tree(
    root: &Path,
    exclusions: &Exclusions,
    extensions: &[String],
    max_depth: usize,
) -> Result<String> {
    let keep = |entry: &DirEntry| {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            return false;
        }
        if is_dir(entry) {
            !exclusions.excludes_segment(&name)
        } else {
            entry
                .path()
                .extension()
                .and_then(OsStr::to_str)
                .map(|ext| extensions.iter().any(|e| e == ext))
                .unwrap_or(false)
        }
    };

    let walker = WalkDir::new(root)
        .max_depth(max_depth.saturating_add(1))
        .sort_by(listing_order)
        .into_iter()
        .filter_entry(keep);

    let mut entries = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.io_error().map(|io| io.kind()) == Some(ErrorKind::PermissionDenied) => {
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if entry.depth() == 0 {
            continue;
        }
        entries.push(TreeEntry {
            depth: entry.depth(),
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: is_dir(&entry),
        });
    }

    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    Ok(draw(&root_name, &entries))
}

fn draw(root_name: &str, entries: &[TreeEntry]) -> String {
    // An entry is last when no sibling follows it; scan backwards tracking
    // which depths have already seen a later sibling.
    let mut is_last = vec![false; entries.len()];
    let mut later_sibling: Vec<bool> = Vec::new();
    for (i, entry) in entries.iter().enumerate().rev() {
        if later_sibling.len() <= entry.depth {
            later_sibling.resize(entry.depth + 1, false);
        }
        is_last[i] = !later_sibling[entry.depth];
        later_sibling[entry.depth] = true;
        later_sibling.truncate(entry.depth + 1);
    }

    let mut lines = vec![format!("{}/", root_name)];
    let mut prefix: Vec<&str> = Vec::new();
    for (entry, last) in entries.iter().zip(is_last) {
        prefix.truncate(entry.depth - 1);
        let connector = if last { "└── " } else { "├── " };
        let suffix = if entry.is_dir { "/" } else { "" };
        lines.push(format!("{}{}{}{}", prefix.concat(), connector, entry.name, suffix));
        prefix.push(if last { "    " } else { "│   " });
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn java() -> Vec<String> {
        vec!["java".to_string()]
    }

    fn exclusions() -> Exclusions {
        Exclusions::new(&["target".to_string(), "build".to_string()])
    }

    #[test]
    fn test_directories_first_then_files() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("shop");
        fs::create_dir_all(root.join("src/model")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("src/model/Order.java"), "class Order {}").unwrap();
        fs::write(root.join("src/App.java"), "class App {}").unwrap();
        fs::write(root.join("Build.java"), "class Build {}").unwrap();
        fs::write(root.join("README.md"), "# shop").unwrap();

        let tree = render_tree(&root, &exclusions(), &java(), 100).unwrap();
        let expected = "shop/
├── docs/
├── src/
│   ├── model/
│   │   └── Order.java
│   └── App.java
└── Build.java";
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_hidden_and_excluded_are_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("target/classes")).unwrap();
        fs::create_dir_all(root.join("build-output")).unwrap();
        fs::write(root.join("target/classes/Gen.java"), "class Gen {}").unwrap();
        fs::write(root.join(".Hidden.java"), "class Hidden {}").unwrap();
        fs::write(root.join("Main.java"), "class Main {}").unwrap();

        let tree = render_tree(root, &exclusions(), &java(), 100).unwrap();
        assert!(tree.ends_with("\n└── Main.java"));
        assert!(!tree.contains("target"));
        assert!(!tree.contains("build-output"));
        assert!(!tree.contains(".git"));
        assert!(!tree.contains("Hidden"));
    }

    #[test]
    fn test_depth_limit() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("a/b/c/Deep.java"), "class Deep {}").unwrap();

        let shallow = render_tree(root, &exclusions(), &java(), 0).unwrap();
        assert!(shallow.contains("└── a/"));
        assert!(!shallow.contains("b/"));

        let one = render_tree(root, &exclusions(), &java(), 1).unwrap();
        assert!(one.contains("    └── b/"));
        assert!(!one.contains("c/"));

        let all = render_tree(root, &exclusions(), &java(), 100).unwrap();
        assert!(all.contains("            └── Deep.java"));
    }
}
