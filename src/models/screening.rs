//! Screening records and the per-employee screening history.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{EarThresholdSet, PersonSex};

/// Identifies one ear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ear {
    /// The left ear.
    Left,
    /// The right ear.
    Right,
}

impl Ear {
    /// Both ears, left first.
    pub const BOTH: [Ear; 2] = [Ear::Left, Ear::Right];
}

impl fmt::Display for Ear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ear::Left => f.write_str("left"),
            Ear::Right => f.write_str("right"),
        }
    }
}

/// One employee's hearing screening for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HearingScreening {
    /// The calendar year of the screening.
    pub year: i32,
    /// Thresholds for the left ear.
    pub left_ear: EarThresholdSet,
    /// Thresholds for the right ear.
    pub right_ear: EarThresholdSet,
}

impl HearingScreening {
    /// Returns the thresholds recorded for `ear`.
    pub fn ear(&self, ear: Ear) -> &EarThresholdSet {
        match ear {
            Ear::Left => &self.left_ear,
            Ear::Right => &self.right_ear,
        }
    }
}

/// All screenings for one employee, plus what is needed to work out their age.
///
/// The employee was `reference_age` years old in `reference_year`.
///
/// Callers must supply at most one screening per year. Duplicates are not
/// detected and give unspecified results.
///
/// # Example
///
/// ```
/// use hearing_anomaly_engine::models::{PersonSex, ScreeningHistory};
///
/// let history = ScreeningHistory {
///     reference_age: 45,
///     reference_year: 2024,
///     sex: PersonSex::Male,
///     screenings: vec![],
/// };
/// assert_eq!(history.age_in_year(2014).unwrap(), 35);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningHistory {
    /// The employee's age in `reference_year`.
    pub reference_age: i32,
    /// The year `reference_age` applies to.
    pub reference_year: i32,
    /// The employee's recorded sex.
    pub sex: PersonSex,
    /// Yearly screenings, in any order.
    #[serde(default)]
    pub screenings: Vec<HearingScreening>,
}

impl ScreeningHistory {
    /// Builds a history whose reference age is the employee's completed
    /// years on `as_of`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use hearing_anomaly_engine::models::{PersonSex, ScreeningHistory};
    ///
    /// let history = ScreeningHistory::from_date_of_birth(
    ///     NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
    ///     NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
    ///     PersonSex::Female,
    ///     vec![],
    /// );
    /// assert_eq!(history.reference_age, 34);
    /// assert_eq!(history.reference_year, 2025);
    /// ```
    pub fn from_date_of_birth(
        date_of_birth: NaiveDate,
        as_of: NaiveDate,
        sex: PersonSex,
        screenings: Vec<HearingScreening>,
    ) -> Self {
        let had_birthday =
            (as_of.month(), as_of.day()) >= (date_of_birth.month(), date_of_birth.day());
        let reference_age = as_of.year() - date_of_birth.year() - if had_birthday { 0 } else { 1 };

        Self {
            reference_age,
            reference_year: as_of.year(),
            sex,
            screenings,
        }
    }

    /// Returns the employee's age during `year`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AgeOutOfRange`] if the age does not fit in an `i32`.
    pub fn age_in_year(&self, year: i32) -> EngineResult<i32> {
        year.checked_sub(self.reference_year)
            .and_then(|offset| offset.checked_add(self.reference_age))
            .ok_or(EngineError::AgeOutOfRange {
                year,
                reference_year: self.reference_year,
                reference_age: self.reference_age,
            })
    }

    /// Returns the screenings ordered by ascending year without touching `self`.
    pub fn sorted_screenings(&self) -> Vec<&HearingScreening> {
        let mut sorted: Vec<&HearingScreening> = self.screenings.iter().collect();
        sorted.sort_by_key(|screening| screening.year);
        sorted
    }
}
