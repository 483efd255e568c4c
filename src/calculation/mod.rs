//! Calculation logic for the Hearing Anomaly Classification Engine.
//!
//! This module contains the age correction lookup, decibel shift averages,
//! the per-ear STS classifier, the baseline revision policy, and the
//! multi-year report generator that drives them.

mod age_correction;
mod anomaly_classifier;
mod baseline_revision;
mod decibel_shift;
mod report_generator;

pub use age_correction::{
    AGE_CLAMP_MAX, AGE_CLAMP_MIN, AGE_CORRECTION_REGULATION_REF, AgeCorrection,
    AgeCorrectionLookup, AgeCorrectionRow, clamp_age, correction_table, correction_table_sex,
    lookup_age_correction, lookup_age_correction_with_audit,
};
pub use anomaly_classifier::{
    DEFAULT_STS_THRESHOLD_DB, EarClassification, STS_REGULATION_REF, classify, classify_ear,
};
pub use baseline_revision::{
    APPENDIX_F_IMPROVEMENT_DB, BASELINE_REVISION_REGULATION_REF, BaselineRevisionPolicy,
    baseline_revision_audit_step,
};
pub use decibel_shift::{
    UNTESTED_SENTINEL_DB, average_shift, sts_range_average, whole_spectrum_average_shift,
};
pub use report_generator::{generate_hearing_report, generate_report};
