//! Configuration file loading for zigmem.
//!
//! Reads `zigmem.json` from the project root and provides typed access to
//! all settings. Falls back to sensible defaults when the config file is
//! missing or incomplete.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level zigmem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZigmemConfig {
    pub version: String,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub tracker: TrackerSettings,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// Rule-family toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_true")]
    pub memory: bool,
    #[serde(default = "default_true")]
    pub test_compliance: bool,
}

/// Scope-tracker tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Maximum nesting depth to analyze; 0 means unlimited.
    #[serde(default)]
    pub max_depth: u32,
    /// Line count above which lazy parsing kicks in (when enabled).
    #[serde(default = "default_lazy_threshold")]
    pub lazy_threshold: usize,
    #[serde(default)]
    pub lazy: bool,
    /// Function-name fragments that imply ownership transfer. An empty list
    /// means the built-in defaults; a non-empty list replaces them and is
    /// not validated.
    #[serde(default)]
    pub ownership_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_lazy_threshold() -> usize {
    5000
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            memory: true,
            test_compliance: true,
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            max_depth: 0,
            lazy_threshold: default_lazy_threshold(),
            lazy: false,
            ownership_patterns: vec![],
        }
    }
}

impl Default for ZigmemConfig {
    fn default() -> Self {
        Self {
            version: "0.2.0".to_string(),
            rules: RulesConfig::default(),
            tracker: TrackerSettings::default(),
            ignore_patterns: vec![],
        }
    }
}

impl ZigmemConfig {
    /// Load configuration from `zigmem.json` inside the given project root.
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join("zigmem.json");
        let content = match std::fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!(
                    "zigmem: warning: failed to parse {}: {}, using defaults",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let cfg = ZigmemConfig::default();
        assert_eq!(cfg.version, "0.2.0");
        assert!(cfg.rules.memory);
        assert!(cfg.rules.test_compliance);
        assert_eq!(cfg.tracker.max_depth, 0);
        assert_eq!(cfg.tracker.lazy_threshold, 5000);
        assert!(!cfg.tracker.lazy);
        assert!(cfg.tracker.ownership_patterns.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let cfg = ZigmemConfig::load(Path::new("/nonexistent"));
        assert_eq!(cfg.tracker.lazy_threshold, 5000);
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = serde_json::json!({
            "version": "0.3.0",
            "rules": { "memory": true, "test_compliance": false },
            "tracker": { "max_depth": 12, "lazy": true },
            "ignore_patterns": ["vendor/**"]
        });
        fs::write(dir.path().join("zigmem.json"), config.to_string()).unwrap();
        let cfg = ZigmemConfig::load(dir.path());
        assert_eq!(cfg.version, "0.3.0");
        assert!(!cfg.rules.test_compliance);
        assert_eq!(cfg.tracker.max_depth, 12);
        assert!(cfg.tracker.lazy);
        assert_eq!(cfg.ignore_patterns, vec!["vendor/**".to_string()]);
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = serde_json::json!({
            "version": "0.2.0",
            "tracker": { "ownership_patterns": ["steal"] }
        });
        fs::write(dir.path().join("zigmem.json"), config.to_string()).unwrap();
        let cfg = ZigmemConfig::load(dir.path());
        assert!(cfg.rules.memory); // default
        assert_eq!(cfg.tracker.lazy_threshold, 5000); // default
        assert_eq!(cfg.tracker.ownership_patterns, vec!["steal".to_string()]);
    }

    #[test]
    fn test_load_invalid_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zigmem.json"), "{ not json").unwrap();
        let cfg = ZigmemConfig::load(dir.path());
        assert_eq!(cfg.version, "0.2.0");
    }
}
