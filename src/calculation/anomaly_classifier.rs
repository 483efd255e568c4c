//! Per-ear Standard Threshold Shift classification.
//!
//! This module decides one ear's [`AnomalyStatus`] for one year by
//! comparing the year's audiogram against the ear's baseline.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ClassificationRules;
use crate::models::{AnomalyStatus, AuditStep, EarThresholdSet};

use super::{AgeCorrection, average_shift};

/// Regulation section defining a Standard Threshold Shift.
pub const STS_REGULATION_REF: &str = "29 CFR 1910.95(g)(10)";

/// Default STS threshold: an average shift of 10 dB at 2, 3 and 4 kHz.
pub const DEFAULT_STS_THRESHOLD_DB: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// The result of classifying one ear for one year.
#[derive(Debug, Clone)]
pub struct EarClassification {
    /// The ear's status for the year.
    pub status: AnomalyStatus,
    /// Average corrected shift from the baseline to this year.
    pub baseline_shift: Decimal,
    /// Average corrected shift from the previous screening to this year.
    ///
    /// Recorded for the audit trail only; it never affects `status`.
    pub prior_shift: Decimal,
    /// The audit step recording this classification.
    pub audit_step: AuditStep,
}

/// Classifies one ear using the default rules.
///
/// Returns [`AnomalyStatus::PossibleSts`] when the age-corrected average
/// shift from `baseline` to `current_year` at 2, 3 and 4 kHz is 10 dB or
/// more, and [`AnomalyStatus::NoSts`] otherwise. Either result becomes
/// [`AnomalyStatus::Cnt`] if `baseline` or `current_year` is missing a
/// reading at one of those frequencies.
///
/// # Examples
///
/// ```
/// use hearing_anomaly_engine::calculation::{classify, lookup_age_correction};
/// use hearing_anomaly_engine::models::{AnomalyStatus, EarThresholdSet, PersonSex};
///
/// let correction = lookup_age_correction(PersonSex::Male, 30).unwrap();
/// let baseline = EarThresholdSet::from_readings([Some(10); 7]);
/// let current = EarThresholdSet::from_readings([Some(30); 7]);
///
/// let status = classify(&baseline, &baseline, &current, &correction);
/// assert_eq!(status, AnomalyStatus::PossibleSts);
/// ```
pub fn classify(
    baseline: &EarThresholdSet,
    prior_year: &EarThresholdSet,
    current_year: &EarThresholdSet,
    correction: &AgeCorrection,
) -> AnomalyStatus {
    classify_ear(
        baseline,
        prior_year,
        current_year,
        correction,
        &ClassificationRules::default(),
        1,
    )
    .status
}

/// Classifies one ear under `rules` and records the decision.
///
/// The CNT check only runs after the threshold comparison, so a shift that
/// would be a possible STS is still reported as CNT when data is missing.
/// [`AnomalyStatus::NewBaseline`] is returned only when `rules` enables
/// baseline revision and the ear improved enough.
pub fn classify_ear(
    baseline: &EarThresholdSet,
    prior_year: &EarThresholdSet,
    current_year: &EarThresholdSet,
    correction: &AgeCorrection,
    rules: &ClassificationRules,
    step_number: u32,
) -> EarClassification {
    let baseline_shift = average_shift(
        baseline,
        current_year,
        correction,
        rules.apply_age_correction,
    );
    let prior_shift = average_shift(
        prior_year,
        current_year,
        correction,
        rules.apply_age_correction,
    );

    let untested =
        baseline.has_untested_sts_frequency() || current_year.has_untested_sts_frequency();
    let reaches_threshold = baseline_shift >= rules.sts_threshold;

    let (status, reasoning) = if reaches_threshold {
        if untested {
            (
                AnomalyStatus::Cnt,
                format!(
                    "Average shift {} dB reaches {} dB but a 2/3/4 kHz reading is untested",
                    baseline_shift.round_dp(2),
                    rules.sts_threshold
                ),
            )
        } else {
            (
                AnomalyStatus::PossibleSts,
                format!(
                    "Average shift {} dB >= {} dB threshold",
                    baseline_shift.round_dp(2),
                    rules.sts_threshold
                ),
            )
        }
    } else if untested {
        (
            AnomalyStatus::Cnt,
            "A 2/3/4 kHz reading is untested in the baseline or current year".to_string(),
        )
    } else if rules
        .baseline_revision
        .should_revise_ear(baseline, current_year)
    {
        (
            AnomalyStatus::NewBaseline,
            "2/3/4 kHz average improved enough to revise the baseline".to_string(),
        )
    } else {
        (
            AnomalyStatus::NoSts,
            format!(
                "Average shift {} dB < {} dB threshold",
                baseline_shift.round_dp(2),
                rules.sts_threshold
            ),
        )
    };

    debug!(
        baseline_shift = %baseline_shift.round_dp(2),
        prior_shift = %prior_shift.round_dp(2),
        status = %status,
        "Classified ear"
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "sts_classification".to_string(),
        rule_name: "Standard Threshold Shift".to_string(),
        regulation_ref: STS_REGULATION_REF.to_string(),
        input: serde_json::json!({
            "baseline": baseline,
            "prior_year": prior_year,
            "current_year": current_year,
            "correction": correction,
            "apply_age_correction": rules.apply_age_correction,
            "sts_threshold_db": rules.sts_threshold.to_string()
        }),
        output: serde_json::json!({
            "status": status,
            "baseline_shift_db": baseline_shift.round_dp(2).to_string(),
            "prior_shift_db": prior_shift.round_dp(2).to_string(),
            "untested_sts_frequency": untested
        }),
        reasoning,
    };

    EarClassification {
        status,
        baseline_shift,
        prior_shift,
        audit_step,
    }
}
