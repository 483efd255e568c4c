//! Configuration types for hearing anomaly classification.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the validated
//! [`ClassificationRules`] the engine runs with.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::{
    APPENDIX_F_IMPROVEMENT_DB, BaselineRevisionPolicy, DEFAULT_STS_THRESHOLD_DB,
};
use crate::error::{EngineError, EngineResult};

/// Metadata about the classification methodology.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// Human-readable name of the methodology.
    pub name: String,
    /// Version of the configuration.
    pub version: String,
    /// The regulation the methodology follows (e.g., "29 CFR 1910.95").
    pub regulation: String,
    /// URL to the regulation text.
    pub source_url: String,
}

impl Default for EngineMetadata {
    fn default() -> Self {
        Self {
            name: "OSHA Standard Threshold Shift".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            regulation: "29 CFR 1910.95".to_string(),
            source_url: "https://www.osha.gov/laws-regs/regulations/standardnumber/1910/1910.95"
                .to_string(),
        }
    }
}

/// Baseline revision section of policy.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct BaselineRevisionConfig {
    /// Whether baselines may move to a later screening.
    #[serde(default)]
    pub enabled: bool,
    /// Improvement in dB at 2/3/4 kHz required to move a baseline.
    #[serde(default = "default_min_improvement")]
    pub min_improvement_db: Decimal,
}

fn default_min_improvement() -> Decimal {
    APPENDIX_F_IMPROVEMENT_DB
}

impl Default for BaselineRevisionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_improvement_db: default_min_improvement(),
        }
    }
}

/// Classification policy file structure (policy.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Average 2/3/4 kHz shift in dB at or above which an ear is flagged.
    pub sts_threshold_db: Decimal,
    /// Whether shifts are age corrected before comparison.
    #[serde(default = "default_apply_age_correction")]
    pub apply_age_correction: bool,
    /// Baseline revision settings.
    #[serde(default)]
    pub baseline_revision: BaselineRevisionConfig,
}

fn default_apply_age_correction() -> bool {
    true
}

/// The rules a classification run applies.
///
/// The default matches the shipped `policy.yaml`: 10 dB threshold, age
/// correction on, baselines never revised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRules {
    /// Average shift in dB at or above which an ear is a possible STS.
    pub sts_threshold: Decimal,
    /// Whether shifts are age corrected.
    pub apply_age_correction: bool,
    /// When an ear's baseline may move forward.
    pub baseline_revision: BaselineRevisionPolicy,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            sts_threshold: DEFAULT_STS_THRESHOLD_DB,
            apply_age_correction: true,
            baseline_revision: BaselineRevisionPolicy::Never,
        }
    }
}

impl TryFrom<PolicyConfig> for ClassificationRules {
    type Error = EngineError;

    fn try_from(policy: PolicyConfig) -> EngineResult<Self> {
        if policy.sts_threshold_db <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                field: "sts_threshold_db".to_string(),
                message: format!("must be greater than zero, got {}", policy.sts_threshold_db),
            });
        }

        let revision = policy.baseline_revision;
        if revision.enabled && revision.min_improvement_db <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                field: "baseline_revision.min_improvement_db".to_string(),
                message: format!(
                    "must be greater than zero, got {}",
                    revision.min_improvement_db
                ),
            });
        }

        let baseline_revision = if revision.enabled {
            BaselineRevisionPolicy::OnImprovement {
                min_improvement_db: revision.min_improvement_db,
            }
        } else {
            BaselineRevisionPolicy::Never
        };

        Ok(Self {
            sts_threshold: policy.sts_threshold_db,
            apply_age_correction: policy.apply_age_correction,
            baseline_revision,
        })
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Methodology metadata.
    metadata: EngineMetadata,
    /// Validated classification rules.
    rules: ClassificationRules,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(metadata: EngineMetadata, rules: ClassificationRules) -> Self {
        Self { metadata, rules }
    }

    /// Returns the methodology metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns the classification rules.
    pub fn rules(&self) -> &ClassificationRules {
        &self.rules
    }
}
