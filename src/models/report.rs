//! Report models for the Hearing Anomaly Classification Engine.
//!
//! This module contains the per-year [`EarAnomalyStatus`] rows, the
//! [`HearingReport`] wrapper, and the audit structures that record every
//! age lookup and classification decision behind a report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PersonSex;

/// Classification of one ear for one screening year.
///
/// # Example
///
/// ```
/// use hearing_anomaly_engine::models::AnomalyStatus;
///
/// assert_eq!(AnomalyStatus::PossibleSts.code(), 4);
/// assert_eq!(AnomalyStatus::PossibleSts.to_string(), "Possible STS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyStatus {
    /// Placeholder; never produced by the engine.
    None,
    /// This year is the ear's baseline; no comparison was made.
    Baseline,
    /// Compared against the baseline with no significant shift.
    NoSts,
    /// The ear improved enough to become the new baseline.
    ///
    /// Only produced when baseline revision is enabled.
    NewBaseline,
    /// Average corrected shift at 2, 3 and 4 kHz reached the STS threshold.
    PossibleSts,
    /// A 2, 3 or 4 kHz reading was missing from the baseline or this year.
    Cnt,
}

impl AnomalyStatus {
    /// Returns the stable numeric code used when statuses are persisted.
    pub fn code(&self) -> u8 {
        match self {
            AnomalyStatus::None => 0,
            AnomalyStatus::Baseline => 1,
            AnomalyStatus::NoSts => 2,
            AnomalyStatus::NewBaseline => 3,
            AnomalyStatus::PossibleSts => 4,
            AnomalyStatus::Cnt => 5,
        }
    }

    /// Returns the status for a persisted numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AnomalyStatus::None),
            1 => Some(AnomalyStatus::Baseline),
            2 => Some(AnomalyStatus::NoSts),
            3 => Some(AnomalyStatus::NewBaseline),
            4 => Some(AnomalyStatus::PossibleSts),
            5 => Some(AnomalyStatus::Cnt),
            _ => None,
        }
    }
}

impl fmt::Display for AnomalyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnomalyStatus::None => "None",
            AnomalyStatus::Baseline => "Baseline",
            AnomalyStatus::NoSts => "No STS",
            AnomalyStatus::NewBaseline => "New Baseline",
            AnomalyStatus::PossibleSts => "Possible STS",
            AnomalyStatus::Cnt => "CNT",
        };
        f.write_str(label)
    }
}

/// One report row: both ears' statuses for a single screening year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarAnomalyStatus {
    /// Status of the left ear.
    pub left_status: AnomalyStatus,
    /// Status of the right ear.
    pub right_status: AnomalyStatus,
    /// The screening year this row reports on.
    pub report_year: i32,
    /// The year of the left ear's baseline screening.
    pub left_baseline_year: i32,
    /// The year of the right ear's baseline screening.
    pub right_baseline_year: i32,
}

impl EarAnomalyStatus {
    /// Returns a row marking `year` as the baseline for both ears.
    pub fn baseline(year: i32) -> Self {
        Self {
            left_status: AnomalyStatus::Baseline,
            right_status: AnomalyStatus::Baseline,
            report_year: year,
            left_baseline_year: year,
            right_baseline_year: year,
        }
    }

    /// Returns true if either ear shows a possible STS.
    pub fn has_possible_sts(&self) -> bool {
        self.left_status == AnomalyStatus::PossibleSts
            || self.right_status == AnomalyStatus::PossibleSts
    }
}

/// A single step in the audit trace recording an engine decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the regulation section behind this rule.
    pub regulation_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated while building a report.
///
/// Warnings flag conditions that don't stop the report but deserve a look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of decision steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated along the way.
    pub warnings: Vec<AuditWarning>,
    /// The total generation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of classifying one employee's screening history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HearingReport {
    /// Unique identifier for this report.
    pub report_id: Uuid,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that generated the report.
    pub engine_version: String,
    /// The sex recorded on the history.
    pub sex: PersonSex,
    /// One row per screening year, ascending.
    pub rows: Vec<EarAnomalyStatus>,
    /// Complete audit trace of the decisions behind `rows`.
    pub audit_trace: AuditTrace,
}

impl HearingReport {
    /// Returns the years in which either ear shows a possible STS.
    pub fn possible_sts_years(&self) -> Vec<i32> {
        self.rows
            .iter()
            .filter(|row| row.has_possible_sts())
            .map(|row| row.report_year)
            .collect()
    }
}
