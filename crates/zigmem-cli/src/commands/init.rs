use std::fs;
use std::path::Path;

use zigmem_core::config::ZigmemConfig;

const DEFAULT_IGNORE: &str = "zig-cache/\nzig-out/\n";

/// Run `zigmem init` — write a default `zigmem.json` and `.zigmemignore`
/// into the current directory.
pub fn run(verbose: bool) -> i32 {
    let cwd = match std::env::current_dir() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("zigmem init: failed to get current directory: {}", e);
            return 2;
        }
    };

    let config_path = cwd.join("zigmem.json");
    if config_path.exists() {
        eprintln!("zigmem init: zigmem.json already exists");
        return 2;
    }

    let config = ZigmemConfig::default();
    let body = match serde_json::to_string_pretty(&config) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("zigmem init: failed to serialize default config: {}", e);
            return 2;
        }
    };
    if let Err(e) = fs::write(&config_path, body) {
        eprintln!("zigmem init: failed to write zigmem.json: {}", e);
        return 2;
    }

    create_zigmemignore(&cwd, verbose);

    if verbose {
        eprintln!("zigmem init: initialized in {}", cwd.display());
    }
    0
}

/// Write a starter `.zigmemignore` unless one already exists.
fn create_zigmemignore(root: &Path, verbose: bool) {
    let path = root.join(".zigmemignore");
    if path.exists() {
        if verbose {
            eprintln!("zigmem init: .zigmemignore already exists, leaving it");
        }
        return;
    }
    if let Err(e) = fs::write(&path, DEFAULT_IGNORE) {
        eprintln!("zigmem init: failed to write .zigmemignore: {}", e);
    }
}
