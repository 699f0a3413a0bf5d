use std::path::{Path, PathBuf};

use rayon::prelude::*;

use zigmem_analysis::walker::FileWalker;
use zigmem_core::config::ZigmemConfig;
use zigmem_output::OutputFormatter;
use zigmem_rules::engine::AnalysisEngine;
use zigmem_rules::types::{FileReport, RunReport};

/// Run `zigmem check [paths…]` — analyze files for memory-pattern issues.
pub fn run(
    formatter: &dyn OutputFormatter,
    verbose: bool,
    paths: Vec<String>,
    strict: bool,
    suppress: Option<String>,
    max_depth: Option<u32>,
    lazy: bool,
) -> i32 {
    let cwd = match std::env::current_dir() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("zigmem check: failed to get current directory: {}", e);
            return 2;
        }
    };

    let mut config = ZigmemConfig::load(&cwd);
    if let Some(depth) = max_depth {
        config.tracker.max_depth = depth;
    }
    if lazy {
        config.tracker.lazy = true;
    }

    let files = collect_files(&cwd, &paths, &config);
    if files.is_empty() {
        eprintln!("zigmem check: no .zig files to analyze");
        return 0;
    }
    if verbose {
        eprintln!("zigmem check: analyzing {} file(s)", files.len());
    }

    let mut engine = AnalysisEngine::with_config(config);
    if let Some(code) = suppress {
        engine.suppress(&code);
    }

    // One classifier/tracker pair per file; nothing shared, so files can be
    // analyzed in parallel. Input order is restored afterwards.
    let mut reports: Vec<(usize, FileReport)> = files
        .par_iter()
        .enumerate()
        .filter_map(|(idx, path)| match engine.analyze_file(path) {
            Ok(report) => Some((idx, report)),
            Err(e) => {
                eprintln!("zigmem check: {}", e);
                None
            }
        })
        .collect();
    let failures = files.len() - reports.len();
    reports.sort_by_key(|(idx, _)| *idx);

    let result = RunReport::from_files(reports.into_iter().map(|(_, r)| r).collect());

    let output = formatter.format_run(&result);
    if !output.is_empty() {
        println!("{}", output);
    }
    if verbose {
        eprintln!(
            "zigmem check: {} error(s), {} warning(s), {} note(s)",
            result.errors.len(),
            result.warnings.len(),
            result.notes.len(),
        );
    }

    if failures > 0 {
        return 2;
    }
    if !result.errors.is_empty() || (strict && !result.warnings.is_empty()) {
        return 1;
    }
    0
}

/// Resolve the check targets: explicit files are taken as-is, directories
/// are walked, and no arguments means the current directory.
fn collect_files(cwd: &Path, paths: &[String], config: &ZigmemConfig) -> Vec<PathBuf> {
    let walk_dir = |dir: &Path| {
        FileWalker::new(dir)
            .with_ignore_patterns(&config.ignore_patterns)
            .walk()
    };

    if paths.is_empty() {
        return walk_dir(cwd);
    }

    let mut files = Vec::new();
    for raw in paths {
        let path = PathBuf::from(raw);
        if path.is_dir() {
            files.extend(walk_dir(&path));
        } else {
            files.push(path);
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_files_mixes_dirs_and_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.zig"), "").unwrap();
        fs::write(dir.path().join("src/b.zig"), "").unwrap();
        fs::write(dir.path().join("loose.zig"), "").unwrap();

        let config = ZigmemConfig::default();
        let files = collect_files(
            dir.path(),
            &[
                dir.path().join("src").to_string_lossy().to_string(),
                dir.path().join("loose.zig").to_string_lossy().to_string(),
            ],
            &config,
        );
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_collect_files_defaults_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.zig"), "").unwrap();
        let config = ZigmemConfig::default();
        let files = collect_files(dir.path(), &[], &config);
        assert_eq!(files.len(), 1);
    }
}
