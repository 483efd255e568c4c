//! Hearing Anomaly Classification Engine
//!
//! This crate classifies yearly employee audiograms against a baseline
//! using an OSHA-style Standard Threshold Shift (STS) methodology with
//! sex- and age-specific corrections (29 CFR 1910.95).

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
