//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{ClassificationRules, EngineConfig, EngineMetadata, PolicyConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/osha_sts/
/// ├── engine.yaml   # Methodology metadata
/// └── policy.yaml   # STS threshold, age correction, baseline revision
/// ```
///
/// # Example
///
/// ```no_run
/// use hearing_anomaly_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/osha_sts")?;
/// println!("Threshold: {} dB", loader.rules().sts_threshold);
/// # Ok::<(), hearing_anomaly_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A policy value is out of range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<EngineMetadata>(&path.join("engine.yaml"))?;
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;
        let rules = ClassificationRules::try_from(policy)?;

        Ok(Self {
            config: EngineConfig::new(metadata, rules),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the methodology metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        self.config.metadata()
    }

    /// Returns the classification rules.
    pub fn rules(&self) -> &ClassificationRules {
        self.config.rules()
    }
}
