// src/config.rs
// Configuration collaborator. Loads from a TOML file with env-var
// overrides; `exposure_limit` stays mutable at runtime through the shared
// handle so an admin can widen or tighten serving without a restart.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const ENV_CONFIG_PATH: &str = "RANKER_CONFIG_PATH";
pub const ENV_EXPOSURE_LIMIT: &str = "RANKER_EXPOSURE_LIMIT";
pub const DEFAULT_CONFIG_PATH: &str = "config/ranker.toml";

const DEFAULT_EXPOSURE_LIMIT: u32 = 5;
const DEFAULT_MIN_TRAIN_SAMPLES: usize = 5;
const DEFAULT_MAX_FEATURES: usize = 500;
const DEFAULT_INTERVAL_SECS: u64 = 600;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Maximum times an unresolved item may be served before being withheld.
    pub exposure_limit: u32,
    /// Labeled items required before a classifier fit is attempted.
    pub min_train_samples: usize,
    /// Vocabulary cap for the TF-IDF vectorizer.
    pub max_features: usize,
    /// Background feed-poll interval in seconds.
    pub interval_secs: u64,
    /// RSS feed URLs polled by the background sweep.
    pub feeds: Vec<String>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            exposure_limit: DEFAULT_EXPOSURE_LIMIT,
            min_train_samples: DEFAULT_MIN_TRAIN_SAMPLES,
            max_features: DEFAULT_MAX_FEATURES,
            interval_secs: DEFAULT_INTERVAL_SECS,
            feeds: Vec::new(),
        }
    }
}

impl RankerConfig {
    pub fn fit_params(&self) -> crate::classifier::FitParams {
        crate::classifier::FitParams {
            min_train_samples: self.min_train_samples,
            max_features: self.max_features,
        }
    }
}

/// Load config from an explicit TOML path.
pub fn load_from(path: &Path) -> Result<RankerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let cfg: RankerConfig =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Load config using env var + fallbacks:
/// 1) $RANKER_CONFIG_PATH
/// 2) config/ranker.toml
/// 3) built-in defaults
/// $RANKER_EXPOSURE_LIMIT overrides the file value either way.
pub fn load_default() -> Result<RankerConfig> {
    let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("RANKER_CONFIG_PATH points to non-existent path"));
        }
        load_from(&pb)?
    } else {
        let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
        if pb.exists() {
            load_from(&pb)?
        } else {
            RankerConfig::default()
        }
    };

    if let Ok(v) = std::env::var(ENV_EXPOSURE_LIMIT) {
        let limit: u32 = v
            .parse()
            .with_context(|| format!("parsing {ENV_EXPOSURE_LIMIT}={v}"))?;
        cfg.exposure_limit = limit;
    }

    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &RankerConfig) -> Result<()> {
    if cfg.exposure_limit < 1 {
        return Err(anyhow!("exposure_limit must be >= 1"));
    }
    if cfg.min_train_samples < 2 {
        return Err(anyhow!("min_train_samples must be >= 2"));
    }
    if cfg.max_features == 0 {
        return Err(anyhow!("max_features must be >= 1"));
    }
    if cfg.interval_secs == 0 {
        return Err(anyhow!("interval_secs must be >= 1"));
    }
    Ok(())
}

/// Cloneable handle to the live configuration, shared between the API and
/// the background sweep.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<RankerConfig>>,
}

impl ConfigHandle {
    pub fn new(cfg: RankerConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cfg)),
        }
    }

    pub fn snapshot(&self) -> RankerConfig {
        self.inner.read().expect("config lock poisoned").clone()
    }

    pub fn exposure_limit(&self) -> u32 {
        self.inner.read().expect("config lock poisoned").exposure_limit
    }

    /// Runtime mutation; rejects zero (the limit must stay >= 1).
    pub fn set_exposure_limit(&self, limit: u32) -> bool {
        if limit < 1 {
            return false;
        }
        self.inner.write().expect("config lock poisoned").exposure_limit = limit;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = RankerConfig::default();
        assert_eq!(cfg.exposure_limit, 5);
        assert_eq!(cfg.min_train_samples, 5);
        assert_eq!(cfg.max_features, 500);
        assert_eq!(cfg.interval_secs, 600);
        assert!(cfg.feeds.is_empty());
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: RankerConfig =
            toml::from_str(r#"exposure_limit = 3"#).expect("parse partial config");
        assert_eq!(cfg.exposure_limit, 3);
        assert_eq!(cfg.max_features, 500);
    }

    #[test]
    fn feeds_list_parses() {
        let cfg: RankerConfig = toml::from_str(
            r#"
            interval_secs = 120
            feeds = ["https://example.org/rss.xml", "https://example.net/feed"]
            "#,
        )
        .expect("parse config with feeds");
        assert_eq!(cfg.feeds.len(), 2);
        assert_eq!(cfg.interval_secs, 120);
    }

    #[test]
    fn zero_exposure_limit_is_rejected() {
        let mut cfg = RankerConfig::default();
        cfg.exposure_limit = 0;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn handle_mutates_exposure_limit_at_runtime() {
        let h = ConfigHandle::new(RankerConfig::default());
        assert_eq!(h.exposure_limit(), 5);
        assert!(h.set_exposure_limit(9));
        assert_eq!(h.exposure_limit(), 9);
        assert!(!h.set_exposure_limit(0));
        assert_eq!(h.exposure_limit(), 9);
    }
}
