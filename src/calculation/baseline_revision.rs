//! Baseline revision policy.
//!
//! OSHA does not define a significant improvement. The example in Appendix
//! F of the Hearing Conservation Amendment revises the baseline after the
//! 2/3/4 kHz average improves by 5 dB. That rule is available here but the
//! default policy never revises, so every ear keeps its first screening as
//! the baseline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, EarThresholdSet};

use super::sts_range_average;

/// Regulation section for baseline revision.
pub const BASELINE_REVISION_REGULATION_REF: &str = "29 CFR 1910.95(g)(9)";

/// Improvement used by the Appendix F example.
pub const APPENDIX_F_IMPROVEMENT_DB: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Decides when an ear's baseline moves to a later screening.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BaselineRevisionPolicy {
    /// The first screening stays the baseline.
    #[default]
    Never,
    /// Revise when the 2/3/4 kHz average improves by at least this many dB.
    OnImprovement {
        /// Minimum improvement in decibels.
        min_improvement_db: Decimal,
    },
}

impl BaselineRevisionPolicy {
    /// The Appendix F rule: revise after a 5 dB improvement.
    pub fn appendix_f() -> Self {
        BaselineRevisionPolicy::OnImprovement {
            min_improvement_db: APPENDIX_F_IMPROVEMENT_DB,
        }
    }

    /// Returns true if this policy can ever revise a baseline.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, BaselineRevisionPolicy::Never)
    }

    /// Returns true if an ear whose baseline averages `baseline_average`
    /// should adopt a screening averaging `new_average` as its baseline.
    ///
    /// Averages are 2/3/4 kHz means; lower is better.
    ///
    /// # Examples
    ///
    /// ```
    /// use hearing_anomaly_engine::calculation::BaselineRevisionPolicy;
    /// use rust_decimal::Decimal;
    ///
    /// let policy = BaselineRevisionPolicy::appendix_f();
    /// assert!(policy.should_revise(Decimal::from(20), Decimal::from(15)));
    /// assert!(!policy.should_revise(Decimal::from(20), Decimal::from(16)));
    ///
    /// assert!(!BaselineRevisionPolicy::Never.should_revise(Decimal::from(90), Decimal::ZERO));
    /// ```
    pub fn should_revise(&self, baseline_average: Decimal, new_average: Decimal) -> bool {
        match self {
            BaselineRevisionPolicy::Never => false,
            BaselineRevisionPolicy::OnImprovement { min_improvement_db } => {
                new_average <= baseline_average - *min_improvement_db
            }
        }
    }

    /// Compares two audiograms under this policy.
    pub fn should_revise_ear(&self, baseline: &EarThresholdSet, current: &EarThresholdSet) -> bool {
        self.should_revise(sts_range_average(baseline), sts_range_average(current))
    }
}

/// Builds the audit step recorded when an ear's baseline is revised.
pub fn baseline_revision_audit_step(
    step_number: u32,
    ear: &str,
    previous_year: i32,
    new_year: i32,
    previous_average: Decimal,
    new_average: Decimal,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "baseline_revision".to_string(),
        rule_name: "Baseline Revision".to_string(),
        regulation_ref: BASELINE_REVISION_REGULATION_REF.to_string(),
        input: serde_json::json!({
            "ear": ear,
            "previous_baseline_year": previous_year,
            "previous_average": previous_average.round_dp(2).to_string(),
            "new_average": new_average.round_dp(2).to_string()
        }),
        output: serde_json::json!({
            "baseline_year": new_year
        }),
        reasoning: format!(
            "{} ear baseline moved from {} to {}: 2/3/4 kHz average improved from {} dB to {} dB",
            ear,
            previous_year,
            new_year,
            previous_average.round_dp(2),
            new_average.round_dp(2)
        ),
    }
}
