//! Core data models for the Hearing Anomaly Classification Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod person;
mod report;
mod screening;
mod thresholds;

pub use person::PersonSex;
pub use report::{
    AnomalyStatus, AuditStep, AuditTrace, AuditWarning, EarAnomalyStatus, HearingReport,
};
pub use screening::{Ear, HearingScreening, ScreeningHistory};
pub use thresholds::{CNT_LABEL, EarThresholdLabels, EarThresholdSet, Frequency};
