//! Decibel shift averages between two audiograms.
//!
//! All averages substitute [`UNTESTED_SENTINEL_DB`] for a reading that
//! could not be taken. The substitution exists only inside these
//! functions; stored thresholds keep `None`.

use rust_decimal::Decimal;

use crate::models::{EarThresholdSet, Frequency};

use super::AgeCorrection;

/// Worst-case threshold assumed for an untested frequency when averaging.
pub const UNTESTED_SENTINEL_DB: i32 = 90;

fn reading_or_sentinel(set: &EarThresholdSet, frequency: Frequency) -> Decimal {
    Decimal::from(set.get(frequency).unwrap_or(UNTESTED_SENTINEL_DB))
}

fn mean(values: impl Iterator<Item = Decimal>) -> Decimal {
    let (sum, count) = values.fold((Decimal::ZERO, 0u32), |(sum, count), value| {
        (sum + value, count + 1)
    });
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    }
}

/// Returns the average shift from `earlier` to `later` at 2000, 3000 and 4000 Hz.
///
/// For each band the difference `later - earlier` is taken and, when
/// `apply_age_correction` is set, the band's correction is subtracted. The
/// result is the unweighted mean of the three values. A positive result
/// means hearing got worse.
///
/// # Examples
///
/// ```
/// use hearing_anomaly_engine::calculation::{average_shift, AgeCorrection};
/// use hearing_anomaly_engine::models::EarThresholdSet;
/// use rust_decimal::Decimal;
///
/// let before = EarThresholdSet::from_readings([Some(10); 7]);
/// let after = EarThresholdSet::from_readings([Some(25); 7]);
///
/// let shift = average_shift(&before, &after, &AgeCorrection::ZERO, true);
/// assert_eq!(shift, Decimal::from(15));
/// ```
pub fn average_shift(
    earlier: &EarThresholdSet,
    later: &EarThresholdSet,
    correction: &AgeCorrection,
    apply_age_correction: bool,
) -> Decimal {
    mean(Frequency::STS_RANGE.into_iter().map(|frequency| {
        let diff = reading_or_sentinel(later, frequency) - reading_or_sentinel(earlier, frequency);
        if apply_age_correction {
            diff - Decimal::from(correction.for_frequency(frequency))
        } else {
            diff
        }
    }))
}

/// Returns the average shift from `earlier` to `later` over all seven bands.
///
/// No age correction is applied. Classification never reads this value.
pub fn whole_spectrum_average_shift(earlier: &EarThresholdSet, later: &EarThresholdSet) -> Decimal {
    mean(
        Frequency::ALL
            .into_iter()
            .map(|frequency| reading_or_sentinel(later, frequency) - reading_or_sentinel(earlier, frequency)),
    )
}

/// Returns the mean threshold at 2000, 3000 and 4000 Hz for one audiogram.
///
/// Used to decide whether an ear improved enough to revise its baseline.
pub fn sts_range_average(set: &EarThresholdSet) -> Decimal {
    mean(
        Frequency::STS_RANGE
            .into_iter()
            .map(|frequency| reading_or_sentinel(set, frequency)),
    )
}
