//! Multi-year hearing report generation.
//!
//! A report walks an employee's screenings in year order. The first
//! screening is the baseline for both ears; every later screening is
//! classified per ear against that ear's baseline and the screening before
//! it. Baselines are not stored anywhere, so the whole history is
//! re-classified on every run.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{ClassificationRules, EngineConfig};
use crate::error::EngineResult;
use crate::models::{
    AnomalyStatus, AuditStep, AuditTrace, AuditWarning, Ear, EarAnomalyStatus, Frequency,
    HearingReport, HearingScreening, PersonSex, ScreeningHistory,
};

use super::{
    baseline_revision_audit_step, classify_ear, correction_table_sex,
    lookup_age_correction_with_audit, sts_range_average,
};

/// Where one ear's baseline currently sits in the sorted screenings.
#[derive(Debug, Clone, Copy)]
struct EarBaseline {
    index: usize,
    year: i32,
}

/// Rows and audit records produced by one walk over a history.
#[derive(Debug, Default)]
struct ReportWalk {
    rows: Vec<EarAnomalyStatus>,
    steps: Vec<AuditStep>,
    warnings: Vec<AuditWarning>,
}

/// Generates one classification row per screening year using the default rules.
///
/// - An empty history gives an empty report.
/// - A single screening gives one `Baseline` row.
/// - Otherwise the first year is the `Baseline` row and each later year is
///   classified for both ears.
///
/// The input is not modified; screenings are sorted by year internally.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::AgeCorrectionNotFound`] if any
/// correction lookup fails, or [`crate::error::EngineError::AgeOutOfRange`]
/// if a baseline-year age overflows. No partial report is returned.
///
/// # Examples
///
/// ```
/// use hearing_anomaly_engine::calculation::generate_report;
/// use hearing_anomaly_engine::models::{
///     AnomalyStatus, EarThresholdSet, HearingScreening, PersonSex, ScreeningHistory,
/// };
///
/// let quiet = EarThresholdSet::from_readings([Some(10); 7]);
/// let noisy = EarThresholdSet::from_readings([Some(35); 7]);
/// let history = ScreeningHistory {
///     reference_age: 30,
///     reference_year: 2020,
///     sex: PersonSex::Male,
///     screenings: vec![
///         HearingScreening { year: 2020, left_ear: quiet, right_ear: quiet },
///         HearingScreening { year: 2021, left_ear: noisy, right_ear: quiet },
///     ],
/// };
///
/// let rows = generate_report(&history).unwrap();
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].left_status, AnomalyStatus::PossibleSts);
/// assert_eq!(rows[1].right_status, AnomalyStatus::NoSts);
/// ```
pub fn generate_report(history: &ScreeningHistory) -> EngineResult<Vec<EarAnomalyStatus>> {
    walk_history(history, &ClassificationRules::default()).map(|walk| walk.rows)
}

/// Generates a full [`HearingReport`] with audit trace under `config`.
///
/// # Errors
///
/// Same as [`generate_report`].
pub fn generate_hearing_report(
    history: &ScreeningHistory,
    config: &EngineConfig,
) -> EngineResult<HearingReport> {
    let start_time = Instant::now();
    let report_id = Uuid::new_v4();

    let walk = walk_history(history, config.rules())?;
    let duration = start_time.elapsed();

    info!(
        report_id = %report_id,
        screenings = history.screenings.len(),
        rows = walk.rows.len(),
        warnings = walk.warnings.len(),
        duration_us = duration.as_micros(),
        "Hearing report generated"
    );

    Ok(HearingReport {
        report_id,
        generated_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        sex: history.sex,
        rows: walk.rows,
        audit_trace: AuditTrace {
            steps: walk.steps,
            warnings: walk.warnings,
            duration_us: u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
        },
    })
}

fn walk_history(
    history: &ScreeningHistory,
    rules: &ClassificationRules,
) -> EngineResult<ReportWalk> {
    let screenings = history.sorted_screenings();
    let mut walk = ReportWalk::default();

    let Some(first) = screenings.first() else {
        warn!("No screenings available");
        walk.warnings.push(AuditWarning {
            code: "NO_SCREENINGS".to_string(),
            message: "History contains no screenings; report is empty".to_string(),
            severity: "low".to_string(),
        });
        return Ok(walk);
    };

    walk.rows.push(EarAnomalyStatus::baseline(first.year));
    if screenings.len() == 1 {
        return Ok(walk);
    }

    if correction_table_sex(history.sex) != history.sex {
        warn!(sex = %history.sex, "No age correction table for sex; using male table");
        walk.warnings.push(AuditWarning {
            code: "SEX_TABLE_FALLBACK".to_string(),
            message: format!(
                "No age correction table for '{}'; male table used",
                history.sex
            ),
            severity: "medium".to_string(),
        });
    }

    let initial = EarBaseline {
        index: 0,
        year: first.year,
    };
    let mut baselines = [initial; 2];
    let mut step_number: u32 = 1;

    for i in 1..screenings.len() {
        let prior = screenings[i - 1];
        let current = screenings[i];
        let mut statuses = [AnomalyStatus::None; 2];

        debug!(report_year = current.year, "Classifying screening year");

        for (slot, ear) in Ear::BOTH.into_iter().enumerate() {
            let baseline = screenings[baselines[slot].index];

            // The correction row is chosen by the employee's age in the
            // baseline year, not in the year being reported.
            let age = history.age_in_year(baseline.year)?;
            debug!(
                ear = %ear,
                baseline_year = baseline.year,
                baseline_age = age,
                "Looking up age correction"
            );

            let lookup = lookup_age_correction_with_audit(history.sex, age, step_number)?;
            walk.steps.push(lookup.audit_step);
            step_number += 1;

            let classification = classify_ear(
                baseline.ear(ear),
                prior.ear(ear),
                current.ear(ear),
                &lookup.correction,
                rules,
                step_number,
            );
            walk.steps.push(classification.audit_step);
            step_number += 1;

            if classification.status == AnomalyStatus::Cnt {
                walk.warnings.push(untested_warning(history.sex, ear, baseline, current));
            }
            statuses[slot] = classification.status;
        }

        walk.rows.push(EarAnomalyStatus {
            left_status: statuses[0],
            right_status: statuses[1],
            report_year: current.year,
            left_baseline_year: baselines[0].year,
            right_baseline_year: baselines[1].year,
        });

        // Revise after the row is written so the new baseline year is not
        // compared against itself. The decision uses the 2/3/4 kHz averages
        // only, so a CNT baseline can still be replaced.
        for (slot, ear) in Ear::BOTH.into_iter().enumerate() {
            let previous = screenings[baselines[slot].index];
            let previous_average = sts_range_average(previous.ear(ear));
            let new_average = sts_range_average(current.ear(ear));
            if !rules
                .baseline_revision
                .should_revise(previous_average, new_average)
            {
                continue;
            }
            walk.steps.push(baseline_revision_audit_step(
                step_number,
                &ear.to_string(),
                previous.year,
                current.year,
                previous_average,
                new_average,
            ));
            step_number += 1;

            debug!(ear = %ear, from = previous.year, to = current.year, "Baseline revised");
            baselines[slot] = EarBaseline {
                index: i,
                year: current.year,
            };
        }
    }

    Ok(walk)
}

fn untested_sts_frequencies(screening: &HearingScreening, ear: Ear) -> Vec<String> {
    Frequency::STS_RANGE
        .into_iter()
        .filter(|&frequency| screening.ear(ear).get(frequency).is_none())
        .map(|frequency| frequency.to_string())
        .collect()
}

fn untested_warning(
    sex: PersonSex,
    ear: Ear,
    baseline: &HearingScreening,
    current: &HearingScreening,
) -> AuditWarning {
    let mut causes = Vec::new();
    let in_current = untested_sts_frequencies(current, ear);
    if !in_current.is_empty() {
        causes.push(format!("untested {}", in_current.join(", ")));
    }
    let in_baseline = untested_sts_frequencies(baseline, ear);
    if !in_baseline.is_empty() {
        causes.push(format!(
            "baseline {} untested {}",
            baseline.year,
            in_baseline.join(", ")
        ));
    }

    AuditWarning {
        code: "UNTESTED_STS_FREQUENCY".to_string(),
        message: format!(
            "{} ear in {} could not be classified ({} history): {}",
            ear,
            current.year,
            sex,
            causes.join("; ")
        ),
        severity: "medium".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::BaselineRevisionPolicy;
    use crate::error::EngineError;
    use crate::models::EarThresholdSet;

    fn uniform(db: i32) -> EarThresholdSet {
        EarThresholdSet::from_readings([Some(db); 7])
    }

    fn screening(year: i32, left: EarThresholdSet, right: EarThresholdSet) -> HearingScreening {
        HearingScreening {
            year,
            left_ear: left,
            right_ear: right,
        }
    }

    fn history(
        sex: PersonSex,
        reference_age: i32,
        screenings: Vec<HearingScreening>,
    ) -> ScreeningHistory {
        ScreeningHistory {
            reference_age,
            reference_year: 2000,
            sex,
            screenings,
        }
    }

    #[test]
    fn test_empty_history_returns_empty_report() {
        let rows = generate_report(&history(PersonSex::Male, 30, vec![])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_single_screening_is_baseline() {
        let rows = generate_report(&history(
            PersonSex::Female,
            30,
            vec![screening(2003, uniform(10), uniform(10))],
        ))
        .unwrap();

        assert_eq!(rows, vec![EarAnomalyStatus::baseline(2003)]);
    }

    #[test]
    fn test_single_screening_never_looks_up_age() {
        // Age 10 has no table row, but nothing is compared.
        let rows = generate_report(&history(
            PersonSex::Male,
            10,
            vec![screening(2000, uniform(10), uniform(10))],
        ))
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_two_identical_years_are_no_sts() {
        let rows = generate_report(&history(
            PersonSex::Male,
            30,
            vec![
                screening(2000, uniform(10), uniform(10)),
                screening(2001, uniform(10), uniform(10)),
            ],
        ))
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], EarAnomalyStatus::baseline(2000));
        assert_eq!(rows[1].left_status, AnomalyStatus::NoSts);
        assert_eq!(rows[1].right_status, AnomalyStatus::NoSts);
        assert_eq!(rows[1].report_year, 2001);
        assert_eq!(rows[1].left_baseline_year, 2000);
        assert_eq!(rows[1].right_baseline_year, 2000);
    }

    #[test]
    fn test_ears_are_classified_independently() {
        let rows = generate_report(&history(
            PersonSex::Male,
            30,
            vec![
                screening(2000, uniform(10), uniform(10)),
                screening(2001, uniform(30), uniform(10)),
                screening(2002, uniform(30), uniform(10).with_reading(Frequency::Hz2000, None)),
            ],
        ))
        .unwrap();

        assert_eq!(rows[1].left_status, AnomalyStatus::PossibleSts);
        assert_eq!(rows[1].right_status, AnomalyStatus::NoSts);
        assert_eq!(rows[2].left_status, AnomalyStatus::PossibleSts);
        assert_eq!(rows[2].right_status, AnomalyStatus::Cnt);
    }

    #[test]
    fn test_unsorted_input_is_reported_in_year_order() {
        let input = history(
            PersonSex::Female,
            35,
            vec![
                screening(2002, uniform(10), uniform(10)),
                screening(2000, uniform(10), uniform(10)),
                screening(2001, uniform(10), uniform(10)),
            ],
        );
        let rows = generate_report(&input).unwrap();

        let years: Vec<i32> = rows.iter().map(|row| row.report_year).collect();
        assert_eq!(years, vec![2000, 2001, 2002]);
        assert_eq!(rows[0].left_status, AnomalyStatus::Baseline);
        assert_eq!(input.screenings[0].year, 2002);
    }

    #[test]
    fn test_baseline_stays_on_first_year() {
        let rows = generate_report(&history(
            PersonSex::Male,
            30,
            vec![
                screening(2000, uniform(40), uniform(40)),
                screening(2001, uniform(0), uniform(0)),
                screening(2002, uniform(0), uniform(0)),
            ],
        ))
        .unwrap();

        for row in &rows[1..] {
            assert_eq!(row.left_status, AnomalyStatus::NoSts);
            assert_eq!(row.left_baseline_year, 2000);
            assert_eq!(row.right_baseline_year, 2000);
        }
    }

    #[test]
    fn test_correction_uses_age_at_baseline_year() {
        // Age 30 at the 2000 baseline; age 59 by 2029. Left rises 19/20/21 dB.
        // Age-30 correction (4/6/9): (15 + 14 + 12) / 3 = 13.67 -> Possible STS.
        // Age-59 correction (12/22/32) would give (7 - 2 - 11) / 3 < 10.
        let later = EarThresholdSet::from_readings([
            Some(10),
            Some(10),
            Some(29),
            Some(30),
            Some(31),
            Some(10),
            Some(10),
        ]);
        let rows = generate_report(&history(
            PersonSex::Male,
            30,
            vec![
                screening(2000, uniform(10), uniform(10)),
                screening(2029, later, uniform(10)),
            ],
        ))
        .unwrap();

        assert_eq!(rows[1].left_status, AnomalyStatus::PossibleSts);
    }

    #[test]
    fn test_baseline_age_19_aborts_report() {
        // Employee was 19 at the baseline year.
        let result = generate_report(&ScreeningHistory {
            reference_age: 25,
            reference_year: 2006,
            sex: PersonSex::Female,
            screenings: vec![
                screening(2000, uniform(10), uniform(10)),
                screening(2001, uniform(10), uniform(10)),
            ],
        });

        match result {
            Err(EngineError::AgeCorrectionNotFound {
                age,
                requested_age,
                sex,
            }) => {
                assert_eq!(age, 19);
                assert_eq!(requested_age, 19);
                assert_eq!(sex, PersonSex::Female);
            }
            other => panic!("Expected AgeCorrectionNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_other_sex_matches_male_report() {
        let screenings = vec![
            screening(2000, uniform(10), uniform(10)),
            screening(2001, uniform(22), uniform(25)),
            screening(2002, uniform(26), uniform(28)),
        ];
        let male = generate_report(&history(PersonSex::Male, 40, screenings.clone())).unwrap();
        let other = generate_report(&history(PersonSex::Other, 40, screenings)).unwrap();
        assert_eq!(male, other);
    }

    #[test]
    fn test_hearing_report_records_audit_trail() {
        let report = generate_hearing_report(
            &history(
                PersonSex::Other,
                30,
                vec![
                    screening(2000, uniform(10), uniform(10)),
                    screening(2001, uniform(30), uniform(10).with_reading(Frequency::Hz4000, None)),
                ],
            ),
            &EngineConfig::default(),
        )
        .unwrap();

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.sex, PersonSex::Other);
        assert_eq!(report.possible_sts_years(), vec![2001]);

        // Lookup + classification per ear.
        let steps = &report.audit_trace.steps;
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].rule_id, "age_correction_lookup");
        assert_eq!(steps[1].rule_id, "sts_classification");
        let numbers: Vec<u32> = steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);

        let codes: Vec<&str> = report
            .audit_trace
            .warnings
            .iter()
            .map(|w| w.code.as_str())
            .collect();
        assert_eq!(codes, vec!["SEX_TABLE_FALLBACK", "UNTESTED_STS_FREQUENCY"]);
        assert!(report.audit_trace.warnings[1].message.contains("4000 Hz"));
    }

    #[test]
    fn test_hearing_report_warns_on_empty_history() {
        let report =
            generate_hearing_report(&history(PersonSex::Male, 30, vec![]), &EngineConfig::default())
                .unwrap();

        assert!(report.rows.is_empty());
        assert_eq!(report.audit_trace.warnings[0].code, "NO_SCREENINGS");
    }

    #[test]
    fn test_enabled_revision_moves_baseline_after_row() {
        let rules = ClassificationRules {
            baseline_revision: BaselineRevisionPolicy::appendix_f(),
            ..ClassificationRules::default()
        };
        let walk = walk_history(
            &history(
                PersonSex::Male,
                30,
                vec![
                    screening(2000, uniform(30), uniform(30)),
                    screening(2001, uniform(20), uniform(28)),
                    screening(2002, uniform(40), uniform(28)),
                ],
            ),
            &rules,
        )
        .unwrap();

        let rows = walk.rows;
        assert_eq!(rows[1].left_status, AnomalyStatus::NewBaseline);
        assert_eq!(rows[1].left_baseline_year, 2000);
        assert_eq!(rows[1].right_status, AnomalyStatus::NoSts);

        // 2002 is compared with the revised 2001 left baseline at age 31.
        assert_eq!(rows[2].left_baseline_year, 2001);
        assert_eq!(rows[2].right_baseline_year, 2000);
        assert_eq!(rows[2].left_status, AnomalyStatus::PossibleSts);

        assert!(walk.steps.iter().any(|s| s.rule_id == "baseline_revision"));
    }

    #[test]
    fn test_enabled_revision_replaces_cnt_baseline() {
        let rules = ClassificationRules {
            baseline_revision: BaselineRevisionPolicy::appendix_f(),
            ..ClassificationRules::default()
        };
        // 3000 Hz averages as 90 dB, so the baseline's 2/3/4 kHz mean is 36.67.
        let untested = uniform(10).with_reading(Frequency::Hz3000, None);
        let walk = walk_history(
            &history(
                PersonSex::Male,
                30,
                vec![
                    screening(2000, untested, untested),
                    screening(2001, uniform(10), uniform(10)),
                    screening(2002, uniform(10), uniform(10)),
                ],
            ),
            &rules,
        )
        .unwrap();

        let rows = walk.rows;
        assert_eq!(rows[1].left_status, AnomalyStatus::Cnt);
        assert_eq!(rows[1].left_baseline_year, 2000);
        assert_eq!(rows[2].left_status, AnomalyStatus::NoSts);
        assert_eq!(rows[2].right_status, AnomalyStatus::NoSts);
        assert_eq!(rows[2].left_baseline_year, 2001);
        assert_eq!(rows[2].right_baseline_year, 2001);

        let revisions = walk
            .steps
            .iter()
            .filter(|s| s.rule_id == "baseline_revision")
            .count();
        assert_eq!(revisions, 2);
    }

    #[test]
    fn test_default_rules_keep_cnt_baseline() {
        let untested = uniform(10).with_reading(Frequency::Hz3000, None);
        let rows = generate_report(&history(
            PersonSex::Male,
            30,
            vec![
                screening(2000, untested, untested),
                screening(2001, uniform(10), uniform(10)),
                screening(2002, uniform(10), uniform(10)),
            ],
        ))
        .unwrap();

        assert_eq!(rows[2].left_status, AnomalyStatus::Cnt);
        assert_eq!(rows[2].left_baseline_year, 2000);
    }

    #[test]
    fn test_untested_warning_names_baseline_cause() {
        let baseline = uniform(10).with_reading(Frequency::Hz3000, None);
        let current = uniform(10).with_reading(Frequency::Hz500, None);
        let report = generate_hearing_report(
            &history(
                PersonSex::Female,
                30,
                vec![
                    screening(2000, baseline, uniform(10)),
                    screening(2001, current, uniform(10)),
                ],
            ),
            &EngineConfig::default(),
        )
        .unwrap();

        assert_eq!(report.rows[1].left_status, AnomalyStatus::Cnt);
        assert_eq!(report.audit_trace.warnings.len(), 1);

        let message = &report.audit_trace.warnings[0].message;
        assert!(message.contains("baseline 2000 untested 3000 Hz"));
        assert!(!message.contains("500 Hz"));
        assert!(message.starts_with("left ear in 2001"));
    }

    #[test]
    fn test_untested_warning_lists_current_year_bands() {
        let current = uniform(10)
            .with_reading(Frequency::Hz2000, None)
            .with_reading(Frequency::Hz8000, None);
        let report = generate_hearing_report(
            &history(
                PersonSex::Male,
                30,
                vec![
                    screening(2000, uniform(10), uniform(10)),
                    screening(2001, uniform(10), current),
                ],
            ),
            &EngineConfig::default(),
        )
        .unwrap();

        let message = &report.audit_trace.warnings[0].message;
        assert!(message.contains("right ear in 2001"));
        assert!(message.contains("untested 2000 Hz"));
        assert!(!message.contains("8000 Hz"));
        assert!(!message.contains("baseline"));
    }
}
