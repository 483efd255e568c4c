//! Audiometric frequency bands and per-ear threshold readings.
//!
//! A reading that could not be taken ("CNT") is stored as `None`. The
//! worst-case 90 dB substitute is applied only inside the averaging
//! functions in [`crate::calculation`], never here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Label used for a reading that could not be taken.
pub const CNT_LABEL: &str = "CNT";

/// One of the seven audiometric test frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// 500 Hz.
    Hz500,
    /// 1000 Hz.
    Hz1000,
    /// 2000 Hz.
    Hz2000,
    /// 3000 Hz.
    Hz3000,
    /// 4000 Hz.
    Hz4000,
    /// 6000 Hz.
    Hz6000,
    /// 8000 Hz.
    Hz8000,
}

impl Frequency {
    /// All seven bands in ascending order.
    pub const ALL: [Frequency; 7] = [
        Frequency::Hz500,
        Frequency::Hz1000,
        Frequency::Hz2000,
        Frequency::Hz3000,
        Frequency::Hz4000,
        Frequency::Hz6000,
        Frequency::Hz8000,
    ];

    /// The bands that decide a Standard Threshold Shift.
    pub const STS_RANGE: [Frequency; 3] = [Frequency::Hz2000, Frequency::Hz3000, Frequency::Hz4000];

    /// Returns the band's frequency in hertz.
    pub fn hertz(&self) -> u32 {
        match self {
            Frequency::Hz500 => 500,
            Frequency::Hz1000 => 1000,
            Frequency::Hz2000 => 2000,
            Frequency::Hz3000 => 3000,
            Frequency::Hz4000 => 4000,
            Frequency::Hz6000 => 6000,
            Frequency::Hz8000 => 8000,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hertz())
    }
}

/// Hearing thresholds for one ear in one year, in decibels.
///
/// `None` marks a frequency that could not be tested.
///
/// # Example
///
/// ```
/// use hearing_anomaly_engine::models::{EarThresholdSet, Frequency};
///
/// let ear = EarThresholdSet::from_readings([
///     Some(5), Some(10), Some(10), None, Some(15), Some(20), Some(25),
/// ]);
/// assert_eq!(ear.get(Frequency::Hz2000), Some(10));
/// assert!(ear.has_untested_sts_frequency());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarThresholdSet {
    /// Threshold at 500 Hz.
    pub hz500: Option<i32>,
    /// Threshold at 1000 Hz.
    pub hz1000: Option<i32>,
    /// Threshold at 2000 Hz.
    pub hz2000: Option<i32>,
    /// Threshold at 3000 Hz.
    pub hz3000: Option<i32>,
    /// Threshold at 4000 Hz.
    pub hz4000: Option<i32>,
    /// Threshold at 6000 Hz.
    pub hz6000: Option<i32>,
    /// Threshold at 8000 Hz.
    pub hz8000: Option<i32>,
}

impl EarThresholdSet {
    /// Builds a set from readings ordered as [`Frequency::ALL`].
    pub fn from_readings(readings: [Option<i32>; 7]) -> Self {
        let [hz500, hz1000, hz2000, hz3000, hz4000, hz6000, hz8000] = readings;
        Self {
            hz500,
            hz1000,
            hz2000,
            hz3000,
            hz4000,
            hz6000,
            hz8000,
        }
    }

    /// Returns the reading at `frequency`, or `None` if it was not tested.
    pub fn get(&self, frequency: Frequency) -> Option<i32> {
        match frequency {
            Frequency::Hz500 => self.hz500,
            Frequency::Hz1000 => self.hz1000,
            Frequency::Hz2000 => self.hz2000,
            Frequency::Hz3000 => self.hz3000,
            Frequency::Hz4000 => self.hz4000,
            Frequency::Hz6000 => self.hz6000,
            Frequency::Hz8000 => self.hz8000,
        }
    }

    /// Returns a copy with the reading at `frequency` replaced.
    pub fn with_reading(mut self, frequency: Frequency, reading: Option<i32>) -> Self {
        let slot = match frequency {
            Frequency::Hz500 => &mut self.hz500,
            Frequency::Hz1000 => &mut self.hz1000,
            Frequency::Hz2000 => &mut self.hz2000,
            Frequency::Hz3000 => &mut self.hz3000,
            Frequency::Hz4000 => &mut self.hz4000,
            Frequency::Hz6000 => &mut self.hz6000,
            Frequency::Hz8000 => &mut self.hz8000,
        };
        *slot = reading;
        self
    }

    /// Returns true if any of 2000, 3000 or 4000 Hz was not tested.
    pub fn has_untested_sts_frequency(&self) -> bool {
        Frequency::STS_RANGE
            .iter()
            .any(|&frequency| self.get(frequency).is_none())
    }

    /// Returns the frequencies that were not tested, in ascending order.
    pub fn untested_frequencies(&self) -> Vec<Frequency> {
        Frequency::ALL
            .into_iter()
            .filter(|&frequency| self.get(frequency).is_none())
            .collect()
    }

    /// Renders every reading as its decibel value or `"CNT"`.
    pub fn to_labels(&self) -> EarThresholdLabels {
        let label = |reading: Option<i32>| match reading {
            Some(db) => db.to_string(),
            None => CNT_LABEL.to_string(),
        };
        EarThresholdLabels {
            hz500: label(self.hz500),
            hz1000: label(self.hz1000),
            hz2000: label(self.hz2000),
            hz3000: label(self.hz3000),
            hz4000: label(self.hz4000),
            hz6000: label(self.hz6000),
            hz8000: label(self.hz8000),
        }
    }

    /// Parses labels produced by [`EarThresholdSet::to_labels`] or entered by hand.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidThreshold`] for a label that is neither
    /// a whole number nor `"CNT"`.
    pub fn from_labels(labels: &EarThresholdLabels) -> EngineResult<Self> {
        let mut set = EarThresholdSet::default();
        for frequency in Frequency::ALL {
            let raw = labels.get(frequency);
            let value = raw.trim();
            let reading = if value.eq_ignore_ascii_case(CNT_LABEL) {
                None
            } else {
                let db = value
                    .parse::<i32>()
                    .map_err(|_| EngineError::InvalidThreshold {
                        frequency,
                        value: raw.to_string(),
                    })?;
                Some(db)
            };
            set = set.with_reading(frequency, reading);
        }
        Ok(set)
    }
}

/// Text form of an [`EarThresholdSet`], as exchanged with forms and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarThresholdLabels {
    /// Label at 500 Hz.
    pub hz500: String,
    /// Label at 1000 Hz.
    pub hz1000: String,
    /// Label at 2000 Hz.
    pub hz2000: String,
    /// Label at 3000 Hz.
    pub hz3000: String,
    /// Label at 4000 Hz.
    pub hz4000: String,
    /// Label at 6000 Hz.
    pub hz6000: String,
    /// Label at 8000 Hz.
    pub hz8000: String,
}

impl EarThresholdLabels {
    /// Returns the label at `frequency`.
    pub fn get(&self, frequency: Frequency) -> &str {
        match frequency {
            Frequency::Hz500 => &self.hz500,
            Frequency::Hz1000 => &self.hz1000,
            Frequency::Hz2000 => &self.hz2000,
            Frequency::Hz3000 => &self.hz3000,
            Frequency::Hz4000 => &self.hz4000,
            Frequency::Hz6000 => &self.hz6000,
            Frequency::Hz8000 => &self.hz8000,
        }
    }
}
