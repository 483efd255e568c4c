//! Error types for the Hearing Anomaly Classification Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while classifying screenings.

use thiserror::Error;

use crate::models::{Frequency, PersonSex};

/// The main error type for the Hearing Anomaly Classification Engine.
///
/// An empty screening history is not an error; it produces an empty report.
///
/// # Example
///
/// ```
/// use hearing_anomaly_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The age correction table has no row for the clamped age.
    #[error(
        "Age correction table for {sex} has no adjustment for age {age} (requested age {requested_age})"
    )]
    AgeCorrectionNotFound {
        /// The clamped age that was looked up.
        age: i32,
        /// The age before clamping.
        requested_age: i32,
        /// The sex whose table was requested.
        sex: PersonSex,
    },

    /// An age could not be derived from the history's reference age.
    #[error(
        "Age in {year} is out of range (age {reference_age} in {reference_year})"
    )]
    AgeOutOfRange {
        /// The year whose age was requested.
        year: i32,
        /// The history's reference year.
        reference_year: i32,
        /// The history's age in `reference_year`.
        reference_age: i32,
    },

    /// A threshold label was neither a whole number of decibels nor "CNT".
    #[error("Invalid threshold at {frequency}: '{value}'")]
    InvalidThreshold {
        /// The frequency band the label belonged to.
        frequency: Frequency,
        /// The label that could not be parsed.
        value: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was out of its accepted range.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
