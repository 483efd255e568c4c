//! Age correction lookup.
//!
//! Threshold shifts are reduced by the hearing loss expected from ageing
//! alone before they are compared with the STS threshold. Corrections come
//! from the sex-specific tables in 29 CFR 1910.95 Appendix F, one row per
//! age from 20 to 60.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Frequency, PersonSex};

/// Lower bound ages are clamped to before lookup.
///
/// The tables start at 20, so a clamped age of 19 never resolves. This is
/// kept as-is; callers see [`EngineError::AgeCorrectionNotFound`].
pub const AGE_CLAMP_MIN: i32 = 19;

/// Upper bound ages are clamped to before lookup.
pub const AGE_CLAMP_MAX: i32 = 60;

/// Regulation section the correction tables come from.
pub const AGE_CORRECTION_REGULATION_REF: &str = "29 CFR 1910.95 Appendix F";

/// Age correction values in decibels for one table row.
///
/// 500 Hz and 8000 Hz are never corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeCorrection {
    /// Correction at 1000 Hz.
    pub hz1000: i32,
    /// Correction at 2000 Hz.
    pub hz2000: i32,
    /// Correction at 3000 Hz.
    pub hz3000: i32,
    /// Correction at 4000 Hz.
    pub hz4000: i32,
    /// Correction at 6000 Hz.
    pub hz6000: i32,
}

impl AgeCorrection {
    /// A correction that changes nothing.
    pub const ZERO: AgeCorrection = AgeCorrection {
        hz1000: 0,
        hz2000: 0,
        hz3000: 0,
        hz4000: 0,
        hz6000: 0,
    };

    /// Returns the correction for `frequency`; zero for 500 Hz and 8000 Hz.
    pub fn for_frequency(&self, frequency: Frequency) -> i32 {
        match frequency {
            Frequency::Hz500 | Frequency::Hz8000 => 0,
            Frequency::Hz1000 => self.hz1000,
            Frequency::Hz2000 => self.hz2000,
            Frequency::Hz3000 => self.hz3000,
            Frequency::Hz4000 => self.hz4000,
            Frequency::Hz6000 => self.hz6000,
        }
    }
}

/// One row of a correction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeCorrectionRow {
    /// The age this row applies to.
    pub age: i32,
    /// The corrections for that age.
    pub correction: AgeCorrection,
}

const fn row(age: i32, values: [i32; 5]) -> AgeCorrectionRow {
    AgeCorrectionRow {
        age,
        correction: AgeCorrection {
            hz1000: values[0],
            hz2000: values[1],
            hz3000: values[2],
            hz4000: values[3],
            hz6000: values[4],
        },
    }
}

// Columns: 1000, 2000, 3000, 4000, 6000 Hz.
static MALE_TABLE: [AgeCorrectionRow; 41] = [
    row(20, [5, 3, 4, 5, 8]),
    row(21, [5, 3, 4, 5, 8]),
    row(22, [5, 3, 4, 5, 8]),
    row(23, [5, 3, 4, 6, 9]),
    row(24, [5, 3, 5, 6, 9]),
    row(25, [5, 3, 5, 7, 10]),
    row(26, [5, 4, 5, 7, 10]),
    row(27, [5, 4, 6, 7, 11]),
    row(28, [6, 4, 6, 8, 11]),
    row(29, [6, 4, 6, 8, 12]),
    row(30, [6, 4, 6, 9, 12]),
    row(31, [6, 4, 7, 9, 13]),
    row(32, [6, 5, 7, 10, 14]),
    row(33, [6, 5, 7, 10, 14]),
    row(34, [6, 5, 8, 11, 15]),
    row(35, [7, 5, 8, 11, 15]),
    row(36, [7, 5, 9, 12, 16]),
    row(37, [7, 6, 9, 12, 17]),
    row(38, [7, 6, 9, 13, 17]),
    row(39, [7, 6, 10, 14, 18]),
    row(40, [7, 6, 10, 14, 19]),
    row(41, [7, 6, 10, 14, 20]),
    row(42, [8, 7, 11, 16, 20]),
    row(43, [8, 7, 12, 16, 21]),
    row(44, [8, 7, 12, 17, 22]),
    row(45, [8, 7, 13, 18, 23]),
    row(46, [8, 8, 13, 19, 24]),
    row(47, [8, 8, 14, 19, 24]),
    row(48, [9, 8, 14, 20, 25]),
    row(49, [9, 9, 15, 21, 26]),
    row(50, [9, 9, 16, 22, 27]),
    row(51, [9, 9, 16, 23, 28]),
    row(52, [9, 10, 17, 24, 29]),
    row(53, [9, 10, 18, 25, 30]),
    row(54, [10, 10, 18, 26, 31]),
    row(55, [10, 11, 19, 27, 32]),
    row(56, [10, 11, 20, 28, 34]),
    row(57, [10, 11, 21, 29, 35]),
    row(58, [10, 12, 22, 31, 36]),
    row(59, [11, 12, 22, 32, 37]),
    row(60, [11, 13, 23, 33, 38]),
];

static FEMALE_TABLE: [AgeCorrectionRow; 41] = [
    row(20, [7, 4, 3, 3, 6]),
    row(21, [7, 4, 4, 3, 6]),
    row(22, [7, 4, 4, 4, 6]),
    row(23, [7, 5, 4, 4, 7]),
    row(24, [7, 5, 4, 4, 7]),
    row(25, [8, 5, 4, 4, 7]),
    row(26, [8, 5, 5, 4, 8]),
    row(27, [8, 5, 5, 5, 8]),
    row(28, [8, 5, 5, 5, 8]),
    row(29, [8, 5, 5, 5, 9]),
    row(30, [8, 6, 5, 5, 9]),
    row(31, [8, 6, 6, 5, 9]),
    row(32, [9, 6, 6, 6, 10]),
    row(33, [9, 6, 6, 6, 10]),
    row(34, [9, 6, 6, 6, 10]),
    row(35, [9, 6, 7, 7, 11]),
    row(36, [9, 7, 7, 7, 11]),
    row(37, [9, 7, 7, 7, 12]),
    row(38, [10, 7, 7, 7, 12]),
    row(39, [10, 7, 8, 8, 12]),
    row(40, [10, 7, 8, 8, 13]),
    row(41, [10, 8, 8, 8, 13]),
    row(42, [10, 8, 9, 9, 13]),
    row(43, [11, 8, 9, 9, 14]),
    row(44, [11, 8, 9, 9, 14]),
    row(45, [11, 8, 10, 10, 15]),
    row(46, [11, 9, 10, 10, 15]),
    row(47, [11, 9, 10, 11, 16]),
    row(48, [12, 9, 11, 11, 16]),
    row(49, [12, 9, 11, 11, 16]),
    row(50, [12, 10, 11, 12, 17]),
    row(51, [12, 10, 12, 12, 17]),
    row(52, [12, 10, 12, 13, 18]),
    row(53, [13, 10, 13, 13, 18]),
    row(54, [13, 11, 13, 14, 19]),
    row(55, [13, 11, 14, 14, 19]),
    row(56, [13, 11, 14, 15, 20]),
    row(57, [13, 11, 15, 15, 20]),
    row(58, [14, 12, 15, 16, 21]),
    row(59, [14, 12, 16, 16, 21]),
    row(60, [14, 12, 16, 17, 22]),
];

/// Maps a sex to the table its corrections are read from.
///
/// There is no table for [`PersonSex::Other`]; it is routed to the male table.
pub fn correction_table_sex(sex: PersonSex) -> PersonSex {
    match sex {
        PersonSex::Female => PersonSex::Female,
        PersonSex::Male | PersonSex::Other => PersonSex::Male,
    }
}

/// Returns the rows of the table used for `sex`, ordered by age.
pub fn correction_table(sex: PersonSex) -> &'static [AgeCorrectionRow] {
    match correction_table_sex(sex) {
        PersonSex::Female => &FEMALE_TABLE,
        _ => &MALE_TABLE,
    }
}

/// Clamps an age into the range the lookup accepts.
pub fn clamp_age(age: i32) -> i32 {
    age.clamp(AGE_CLAMP_MIN, AGE_CLAMP_MAX)
}

/// The result of an age correction lookup, including the audit step.
#[derive(Debug, Clone)]
pub struct AgeCorrectionLookup {
    /// The correction values of the matched row.
    pub correction: AgeCorrection,
    /// The table actually consulted.
    pub table_sex: PersonSex,
    /// The age after clamping.
    pub clamped_age: i32,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Looks up the age correction for `sex` at `age`.
///
/// The age is clamped to [`AGE_CLAMP_MIN`]..=[`AGE_CLAMP_MAX`] first. The
/// row's raw values are returned as-is; no baseline-age row is subtracted.
///
/// # Errors
///
/// Returns [`EngineError::AgeCorrectionNotFound`] when the clamped age has no
/// row, which is always the case for ages of 19 and below.
///
/// # Examples
///
/// ```
/// use hearing_anomaly_engine::calculation::lookup_age_correction;
/// use hearing_anomaly_engine::models::PersonSex;
///
/// let correction = lookup_age_correction(PersonSex::Male, 30).unwrap();
/// assert_eq!((correction.hz2000, correction.hz3000, correction.hz4000), (4, 6, 9));
///
/// assert!(lookup_age_correction(PersonSex::Female, 19).is_err());
/// ```
pub fn lookup_age_correction(sex: PersonSex, age: i32) -> EngineResult<AgeCorrection> {
    lookup_age_correction_with_audit(sex, age, 1).map(|lookup| lookup.correction)
}

/// Looks up the age correction and records the decision as an audit step.
///
/// See [`lookup_age_correction`] for the lookup rules.
pub fn lookup_age_correction_with_audit(
    sex: PersonSex,
    age: i32,
    step_number: u32,
) -> EngineResult<AgeCorrectionLookup> {
    let table_sex = correction_table_sex(sex);
    let clamped_age = clamp_age(age);

    let correction = correction_table(sex)
        .iter()
        .find(|row| row.age == clamped_age)
        .map(|row| row.correction)
        .ok_or(EngineError::AgeCorrectionNotFound {
            age: clamped_age,
            requested_age: age,
            sex,
        })?;

    let reasoning = if table_sex == sex {
        format!(
            "Age {} (clamped to {}) found in {} table",
            age, clamped_age, table_sex
        )
    } else {
        format!(
            "No table for {}; using {} table. Age {} (clamped to {})",
            sex, table_sex, age, clamped_age
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "age_correction_lookup".to_string(),
        rule_name: "Age Correction Lookup".to_string(),
        regulation_ref: AGE_CORRECTION_REGULATION_REF.to_string(),
        input: serde_json::json!({
            "sex": sex.as_str(),
            "age": age
        }),
        output: serde_json::json!({
            "table": table_sex.as_str(),
            "clamped_age": clamped_age,
            "hz1000": correction.hz1000,
            "hz2000": correction.hz2000,
            "hz3000": correction.hz3000,
            "hz4000": correction.hz4000,
            "hz6000": correction.hz6000
        }),
        reasoning,
    };

    Ok(AgeCorrectionLookup {
        correction,
        table_sex,
        clamped_age,
        audit_step,
    })
}
