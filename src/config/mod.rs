//! Configuration loading and management for the Hearing Anomaly Classification Engine.
//!
//! This module loads the classification policy from YAML files: the STS
//! threshold, whether shifts are age corrected, and the baseline revision
//! rule. Without a configuration directory, [`ClassificationRules::default`]
//! gives the standard OSHA behaviour.
//!
//! # Example
//!
//! ```no_run
//! use hearing_anomaly_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/osha_sts").unwrap();
//! println!("Loaded methodology: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BaselineRevisionConfig, ClassificationRules, EngineConfig, EngineMetadata, PolicyConfig,
};
