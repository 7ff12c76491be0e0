use std::fmt;

use chrono::NaiveDate;

use super::error::ItemError;
use super::fill::FilledSeries;
use super::model::Variant;

/// How a quantity moved across the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    Stable,
    /// Started at zero, ended above it.
    NewItem,
    /// Started above zero, ended at zero.
    FullyRemoved,
    SignificantIncrease,
    Increase,
    SignificantDecrease,
    Decrease,
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeStatus::Stable => "stable",
            ChangeStatus::NewItem => "new item",
            ChangeStatus::FullyRemoved => "fully removed",
            ChangeStatus::SignificantIncrease => "significant increase",
            ChangeStatus::Increase => "increase",
            ChangeStatus::SignificantDecrease => "significant decrease",
            ChangeStatus::Decrease => "decrease",
        };
        f.write_str(label)
    }
}

/// Percent band above which a change counts as significant.
const SIGNIFICANT_PERCENT: f64 = 10.0;

/// Sentinel reported instead of an infinite ratio at a zero crossing.
const ZERO_CROSSING_PERCENT: f64 = 100.0;

/// Unrounded statistics of one filled series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub initial: f64,
    pub final_value: f64,
    pub percent_change: Option<f64>,
    /// Only the quantity sheet classifies changes.
    pub status: Option<ChangeStatus>,
    pub mean: f64,
    pub max: f64,
    /// Earliest day holding the maximum; absent when the maximum is not positive.
    pub max_date: Option<NaiveDate>,
}

/// Round to one decimal place for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn ratio(initial: f64, final_value: f64) -> f64 {
    (final_value - initial) / initial * 100.0
}

/// Percent change between the first and last day.
///
/// Prices have no meaningful change from zero. Quantities report crossings
/// through zero with a ±100% sentinel.
pub fn percent_change(
    variant: Variant,
    initial: f64,
    final_value: f64,
) -> (Option<f64>, Option<ChangeStatus>) {
    match variant {
        Variant::Price => {
            if initial == 0.0 {
                (None, None)
            } else {
                (Some(ratio(initial, final_value)), None)
            }
        }
        Variant::Quantity => {
            if initial == 0.0 && final_value == 0.0 {
                (Some(0.0), Some(ChangeStatus::Stable))
            } else if initial == 0.0 && final_value > 0.0 {
                (Some(ZERO_CROSSING_PERCENT), Some(ChangeStatus::NewItem))
            } else if initial > 0.0 && final_value == 0.0 {
                (Some(-ZERO_CROSSING_PERCENT), Some(ChangeStatus::FullyRemoved))
            } else if initial == 0.0 {
                (None, None)
            } else {
                let pct = ratio(initial, final_value);
                let status = if pct > SIGNIFICANT_PERCENT {
                    ChangeStatus::SignificantIncrease
                } else if pct > 0.0 {
                    ChangeStatus::Increase
                } else if pct < -SIGNIFICANT_PERCENT {
                    ChangeStatus::SignificantDecrease
                } else if pct < 0.0 {
                    ChangeStatus::Decrease
                } else {
                    ChangeStatus::Stable
                };
                (Some(pct), Some(status))
            }
        }
    }
}

pub fn compute(series: &FilledSeries, variant: Variant) -> Result<SeriesStats, ItemError> {
    if series.is_empty() {
        return Err(ItemError::EmptySeries);
    }
    let values = series.values();
    let (initial, final_value) = (values[0], values[series.len() - 1]);
    let (percent_change, status) = percent_change(variant, initial, final_value);

    let mean = values.iter().sum::<f64>() / series.len() as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_date = if max > 0.0 {
        series.iter().find(|&(_, v)| v == max).map(|(d, _)| d)
    } else {
        None
    };

    Ok(SeriesStats {
        initial,
        final_value,
        percent_change,
        status,
        mean,
        max,
        max_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fill::{fill_series, Fallback, FillOutcome, FillPolicy};
    use crate::data::model::DateWindow;
    use approx::assert_relative_eq;

    fn d(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn series(values: &[f64]) -> FilledSeries {
        let start = d(1, 1, 2024);
        let obs: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + chrono::Duration::days(i as i64), v))
            .collect();
        let window = DateWindow::new(start, obs.last().unwrap().0).unwrap();
        let policy = FillPolicy {
            limit_days: 30,
            max_calendar_days: 731,
            fallback: Fallback::MeanOrZero,
        };
        match fill_series(&obs, &window, &policy).unwrap() {
            FillOutcome::Filled(s) => s,
            FillOutcome::NoData => unreachable!(),
        }
    }

    #[test]
    fn quantity_zero_crossings() {
        assert_eq!(
            percent_change(Variant::Quantity, 0.0, 0.0),
            (Some(0.0), Some(ChangeStatus::Stable))
        );
        assert_eq!(
            percent_change(Variant::Quantity, 0.0, 5.0),
            (Some(100.0), Some(ChangeStatus::NewItem))
        );
        assert_eq!(
            percent_change(Variant::Quantity, 5.0, 0.0),
            (Some(-100.0), Some(ChangeStatus::FullyRemoved))
        );
    }

    #[test]
    fn quantity_bands() {
        let status = |i, f| percent_change(Variant::Quantity, i, f).1;
        assert_eq!(status(10.0, 12.0), Some(ChangeStatus::SignificantIncrease));
        assert_eq!(status(10.0, 10.5), Some(ChangeStatus::Increase));
        assert_eq!(status(10.0, 8.0), Some(ChangeStatus::SignificantDecrease));
        assert_eq!(status(10.0, 9.5), Some(ChangeStatus::Decrease));
        assert_eq!(status(10.0, 10.0), Some(ChangeStatus::Stable));
    }

    #[test]
    fn price_change_undefined_from_zero() {
        assert_eq!(percent_change(Variant::Price, 0.0, 5.0), (None, None));
        let (pct, status) = percent_change(Variant::Price, 8.0, 6.0);
        assert_relative_eq!(pct.unwrap(), -25.0);
        assert_eq!(status, None);
    }

    #[test]
    fn summary_statistics() {
        let s = series(&[10.0, 14.0, 12.0, 14.0]);
        let stats = compute(&s, Variant::Price).unwrap();
        assert_eq!(stats.initial, 10.0);
        assert_eq!(stats.final_value, 14.0);
        assert_relative_eq!(stats.percent_change.unwrap(), 40.0);
        assert_relative_eq!(stats.mean, 12.5);
        assert_eq!(stats.max, 14.0);
        assert_eq!(stats.max_date, Some(d(2, 1, 2024)));
    }

    #[test]
    fn single_day_series() {
        let stats = compute(&series(&[3.0]), Variant::Quantity).unwrap();
        assert_eq!(stats.initial, stats.final_value);
        assert_eq!(stats.status, Some(ChangeStatus::Stable));
    }

    #[test]
    fn non_positive_maximum_has_no_date() {
        let stats = compute(&series(&[0.0, 0.0]), Variant::Quantity).unwrap();
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.max_date, None);
    }

    #[test]
    fn rounding_for_display() {
        assert_eq!(round1(12.34), 12.3);
        assert_eq!(round1(12.36), 12.4);
        assert_eq!(round1(11.0), 11.0);
    }
}
