//! Run configuration.
//!
//! Loaded from an optional TOML file; every section and key may be omitted.
//!
//! ```toml
//! database = "runs.db"
//!
//! [resources]
//! base_lexicon = "vader_lexicon.txt"
//! corrections = "gaming.json"
//! aspects = "attribution_dimensions.csv"
//!
//! [audit]
//! culprit_limit = 20
//!
//! [engine]
//! worker_threads = 4
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rl_core::{Result, RlError};
use rl_sentiment::audit::DEFAULT_CULPRIT_LIMIT;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub resources: ResourceConfig,
    pub audit: AuditConfig,
    pub engine: EngineConfig,
    /// SQLite file for run results. Nothing is persisted when unset.
    pub database: Option<PathBuf>,
}

/// Resource files. Unset entries fall back to the builtin resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Base lexicon, `word<TAB>weight` per line.
    pub base_lexicon: Option<PathBuf>,
    /// Correction lexicon, a JSON object of word to weight.
    pub corrections: Option<PathBuf>,
    /// Stopword list, one word per line.
    pub stopwords: Option<PathBuf>,
    /// Extra irregular lemma forms, `form<TAB>lemma` per line.
    pub lemma_exceptions: Option<PathBuf>,
    /// Abbreviations the sentence splitter must not break after.
    pub abbreviations: Option<PathBuf>,
    /// Aspect definition table (CSV with `Dimension` and `Keywords`).
    pub aspects: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Culprit rows kept per direction.
    pub culprit_limit: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            culprit_limit: DEFAULT_CULPRIT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rayon worker threads. `0` uses the global pool.
    pub worker_threads: usize,
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RlError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RlError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
        assert_eq!(cfg.audit.culprit_limit, 20);
        assert_eq!(cfg.engine.worker_threads, 0);
        assert!(cfg.database.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AnalysisConfig::from_toml_str(
            r#"
            database = "runs.db"

            [resources]
            aspects = "dims.csv"

            [engine]
            worker_threads = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.database, Some(PathBuf::from("runs.db")));
        assert_eq!(cfg.resources.aspects, Some(PathBuf::from("dims.csv")));
        assert!(cfg.resources.base_lexicon.is_none());
        assert_eq!(cfg.engine.worker_threads, 2);
        assert_eq!(cfg.audit.culprit_limit, 20);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = AnalysisConfig::from_toml_str("[audit]\nculprit_limit = \"many\"").unwrap_err();
        assert!(matches!(err, RlError::Config(_)));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review-lens.toml");
        std::fs::write(&path, "[audit]\nculprit_limit = 5\n").unwrap();
        assert_eq!(AnalysisConfig::load(&path).unwrap().audit.culprit_limit, 5);
        assert!(matches!(
            AnalysisConfig::load(&dir.path().join("missing.toml")),
            Err(RlError::Config(_))
        ));
    }
}
