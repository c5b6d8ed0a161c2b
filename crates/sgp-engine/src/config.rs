//! # Engine Configuration
//!
//! Configuration management for the calculation engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SGP_CACHE_ENABLED=false                                            │
//! │     SGP_BENCH_ITERATIONS=5000                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/sgp-engine/engine.toml (Linux)                           │
//! │     ~/Library/Application Support/br.sgp.engine/engine.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     advisory limits from sgp-core, cache on, 1000 bench iterations     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # engine.toml
//! [limits]
//! dimension_warning_cm = 500
//! money_warning = 10000
//! ilhos_quantity_warning = 50
//! ilhos_min_spacing_cm = 5
//! ilhos_max_coverage_cm = 4000
//!
//! [cache]
//! enabled = true
//!
//! [benchmark]
//! default_iterations = 1000
//! ```

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgp_core::ValidationLimits;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Cache Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// When false every area and money call is computed afresh.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings { enabled: true }
    }
}

// =============================================================================
// Benchmark Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkSettings {
    /// Iterations used by `sgp-bench` when `--iterations` is not given.
    #[serde(default = "default_iterations")]
    pub default_iterations: u32,
}

fn default_iterations() -> u32 {
    1000
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        BenchmarkSettings {
            default_iterations: default_iterations(),
        }
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Advisory ceilings used by the validators.
    #[serde(default)]
    pub limits: ValidationLimits,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub benchmark: BenchmarkSettings,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (engine.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        let limits = &self.limits;
        for (name, value) in [
            ("limits.dimension_warning_cm", limits.dimension_warning_cm),
            ("limits.money_warning", limits.money_warning),
            ("limits.ilhos_min_spacing_cm", limits.ilhos_min_spacing_cm),
            ("limits.ilhos_max_coverage_cm", limits.ilhos_max_coverage_cm),
        ] {
            if value <= Decimal::ZERO {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be greater than 0, got {}",
                    name, value
                )));
            }
        }

        if limits.ilhos_quantity_warning == 0 {
            return Err(EngineError::InvalidConfig(
                "limits.ilhos_quantity_warning must be greater than 0".into(),
            ));
        }

        if self.benchmark.default_iterations == 0 {
            return Err(EngineError::InvalidConfig(
                "benchmark.default_iterations must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `SGP_*` overrides read through `lookup`.
    ///
    /// Unparsable values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(enabled) = lookup("SGP_CACHE_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.cache.enabled = true,
                "0" | "false" | "no" | "off" => self.cache.enabled = false,
                _ => warn!(value = %enabled, "Unknown SGP_CACHE_ENABLED value"),
            }
        }

        if let Some(iterations) = lookup("SGP_BENCH_ITERATIONS") {
            match iterations.parse::<u32>() {
                Ok(n) => {
                    debug!(iterations = n, "Overriding benchmark iterations from environment");
                    self.benchmark.default_iterations = n;
                }
                Err(_) => warn!(value = %iterations, "Invalid SGP_BENCH_ITERATIONS value"),
            }
        }

        override_decimal(
            &lookup,
            "SGP_DIMENSION_WARNING_CM",
            &mut self.limits.dimension_warning_cm,
        );
        override_decimal(&lookup, "SGP_MONEY_WARNING", &mut self.limits.money_warning);
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("br", "sgp", "engine")
            .map(|dirs| dirs.config_dir().join("engine.toml"))
    }
}

fn override_decimal(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut Decimal) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<Decimal>() {
        Ok(value) => {
            debug!(key, %value, "Overriding limit from environment");
            *target = value;
        }
        Err(_) => warn!(key, value = %raw, "Invalid decimal in environment"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.cache.enabled);
        assert_eq!(config.benchmark.default_iterations, 1000);
        assert_eq!(config.limits, ValidationLimits::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [limits]
            dimension_warning_cm = 300

            [cache]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.limits.dimension_warning_cm, Decimal::from(300));
        assert_eq!(config.limits.ilhos_quantity_warning, 50);
        assert!(!config.cache.enabled);
        assert_eq!(config.benchmark.default_iterations, 1000);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.benchmark.default_iterations = 0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let mut config = EngineConfig::default();
        config.limits.money_warning = Decimal::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("limits.money_warning"));
    }

    #[test]
    fn test_overrides() {
        let mut config = EngineConfig::default();
        config.apply_overrides(lookup_from(&[
            ("SGP_CACHE_ENABLED", "off"),
            ("SGP_BENCH_ITERATIONS", "250"),
            ("SGP_MONEY_WARNING", "5000.50"),
        ]));

        assert!(!config.cache.enabled);
        assert_eq!(config.benchmark.default_iterations, 250);
        assert_eq!(config.limits.money_warning, Decimal::new(500050, 2));
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = EngineConfig::default();
        config.apply_overrides(lookup_from(&[
            ("SGP_CACHE_ENABLED", "maybe"),
            ("SGP_BENCH_ITERATIONS", "lots"),
            ("SGP_DIMENSION_WARNING_CM", "wide"),
        ]));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("sgp-engine-test-missing/engine.toml");
        let config = EngineConfig::load_or_default(Some(path));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("sgp-engine-test-{}", std::process::id()));
        let path = dir.join("engine.toml");

        let mut config = EngineConfig::default();
        config.benchmark.default_iterations = 42;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: EngineConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.benchmark.default_iterations, 42);

        let _ = std::fs::remove_dir_all(dir);
    }
}
