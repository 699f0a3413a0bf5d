use std::path::Path;

use zigmem_analysis::tracker::{ScopeTracker, TrackerConfig};
use zigmem_core::config::ZigmemConfig;
use zigmem_output::OutputFormatter;
use zigmem_rules::types::ScopeReport;

/// Run `zigmem scopes <file>` — dump the scope forest of one file.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool, file: &str) -> i32 {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("zigmem scopes: failed to read {}: {}", file, e);
            return 2;
        }
    };

    let config = ZigmemConfig::load(Path::new("."));
    let mut tracker = ScopeTracker::new(TrackerConfig::from_settings(&config.tracker));
    tracker.analyze(&source);

    if verbose {
        eprintln!(
            "zigmem scopes: {} — {} scope(s), {} arena handle(s)",
            file,
            tracker.scopes().len(),
            tracker.arenas().len(),
        );
    }

    let result = ScopeReport {
        version: "0.2.0".to_string(),
        command: "scopes".to_string(),
        file: file.to_string(),
        scopes: tracker.scopes().to_vec(),
    };
    println!("{}", formatter.format_scopes(&result));
    0
}
