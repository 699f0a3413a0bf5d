use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

/// Discovers `.zig` source files under a root directory.
///
/// Respects `.gitignore`, a project-local `.zigmemignore`, and any glob
/// patterns from the `ignore_patterns` config section. Results are sorted
/// so analysis order (and therefore output order) is stable.
pub struct FileWalker {
    root: PathBuf,
    ignore_globs: Option<GlobSet>,
}

impl FileWalker {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ignore_globs: None,
        }
    }

    /// Add config-level ignore patterns. Invalid globs are skipped with a
    /// warning rather than aborting the walk.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        if patterns.is_empty() {
            return self;
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => {
                    eprintln!("zigmem: warning: invalid ignore pattern {pattern:?}: {e}");
                }
            }
        }
        self.ignore_globs = builder.build().ok();
        self
    }

    pub fn walk(&self) -> Vec<PathBuf> {
        let mut entries = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .add_custom_ignore_filename(".zigmemignore")
            .build();

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(_) => continue,
            };

            if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                continue;
            }

            let path = entry.into_path();
            if path.extension().and_then(|e| e.to_str()) != Some("zig") {
                continue;
            }
            if let Some(globs) = &self.ignore_globs {
                let rel = path.strip_prefix(&self.root).unwrap_or(&path);
                if globs.is_match(rel) {
                    continue;
                }
            }
            entries.push(path);
        }

        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_walker_finds_zig_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.zig"), "fn main() void {}\n").unwrap();
        fs::write(dir.path().join("src/util.zig"), "").unwrap();
        fs::write(dir.path().join("README.md"), "# Hello").unwrap();

        let entries = FileWalker::new(dir.path()).walk();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].to_str().unwrap().ends_with("main.zig"));
        assert!(entries[1].to_str().unwrap().ends_with("util.zig"));
    }

    #[test]
    fn test_walker_respects_zigmemignore() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("src/app.zig"), "").unwrap();
        fs::write(dir.path().join("vendor/dep.zig"), "").unwrap();
        fs::write(dir.path().join(".zigmemignore"), "vendor/\n").unwrap();

        let entries = FileWalker::new(dir.path()).walk();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].to_str().unwrap().contains("app.zig"));
    }

    #[test]
    fn test_walker_config_ignore_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("gen")).unwrap();
        fs::write(dir.path().join("src/app.zig"), "").unwrap();
        fs::write(dir.path().join("gen/bindings.zig"), "").unwrap();

        let entries = FileWalker::new(dir.path())
            .with_ignore_patterns(&["gen/**".to_string()])
            .walk();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].to_str().unwrap().contains("app.zig"));
    }
}
