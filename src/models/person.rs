//! Person sex model used to select an age correction table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The recorded sex of an employee.
///
/// Only `Female` and `Male` have their own age correction tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonSex {
    /// Female; uses the female correction table.
    Female,
    /// Male; uses the male correction table.
    Male,
    /// Any other or unrecorded value; has no table of its own.
    Other,
}

impl PersonSex {
    /// Parses a free-text label as stored by record-keeping systems.
    ///
    /// Matching is case-insensitive. Anything other than "male" or "female"
    /// maps to [`PersonSex::Other`]; this never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use hearing_anomaly_engine::models::PersonSex;
    ///
    /// assert_eq!(PersonSex::from_label("Female"), PersonSex::Female);
    /// assert_eq!(PersonSex::from_label("MALE"), PersonSex::Male);
    /// assert_eq!(PersonSex::from_label("prefer not to say"), PersonSex::Other);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "male" => PersonSex::Male,
            "female" => PersonSex::Female,
            _ => PersonSex::Other,
        }
    }

    /// Returns the lower-case label for this value.
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonSex::Female => "female",
            PersonSex::Male => "male",
            PersonSex::Other => "other",
        }
    }
}

impl fmt::Display for PersonSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_is_case_insensitive() {
        assert_eq!(PersonSex::from_label("male"), PersonSex::Male);
        assert_eq!(PersonSex::from_label("Male"), PersonSex::Male);
        assert_eq!(PersonSex::from_label("FEMALE"), PersonSex::Female);
        assert_eq!(PersonSex::from_label(" female "), PersonSex::Female);
    }

    #[test]
    fn test_from_label_unknown_maps_to_other() {
        assert_eq!(PersonSex::from_label(""), PersonSex::Other);
        assert_eq!(PersonSex::from_label("m"), PersonSex::Other);
        assert_eq!(PersonSex::from_label("nonbinary"), PersonSex::Other);
    }

    #[test]
    fn test_sex_serialization() {
        assert_eq!(
            serde_json::to_string(&PersonSex::Female).unwrap(),
            "\"female\""
        );
        assert_eq!(serde_json::to_string(&PersonSex::Male).unwrap(), "\"male\"");
        assert_eq!(
            serde_json::to_string(&PersonSex::Other).unwrap(),
            "\"other\""
        );
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(PersonSex::Other.to_string(), "other");
    }
}
