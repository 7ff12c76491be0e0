use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::error::ItemError;
use super::model::{DateWindow, Variant};
use crate::config::VariantConfig;

/// Fallback for days neither neighbour could reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Mean of the observations, or zero when there are none.
    ///
    /// `SummaryBuilder` reports an item with an empty pool as no data before
    /// filling, so the pipeline itself never takes the zero branch.
    MeanOrZero,
    /// Mean of the observations; no observations means no data.
    MeanOrNoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillPolicy {
    /// Furthest a single observation is copied backward or forward.
    pub limit_days: usize,
    pub max_calendar_days: usize,
    pub fallback: Fallback,
}

impl FillPolicy {
    pub fn new(variant: Variant, cfg: &VariantConfig) -> Self {
        Self {
            limit_days: cfg.fill_limit_days,
            max_calendar_days: cfg.max_calendar_days,
            fallback: match variant {
                Variant::Price => Fallback::MeanOrNoData,
                Variant::Quantity => Fallback::MeanOrZero,
            },
        }
    }
}

/// A value for every day of a (capped) window.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl FilledSeries {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    Filled(FilledSeries),
    /// Nothing to fill from and the policy refuses to invent values.
    NoData,
}

/// Copy each observation backward over up to `limit` missing days.
fn backfill(slots: &mut [Option<f64>], limit: usize) {
    let mut next = None;
    let mut run = 0;
    for slot in slots.iter_mut().rev() {
        match slot {
            Some(v) => {
                next = Some(*v);
                run = 0;
            }
            None => {
                if let Some(v) = next {
                    if run < limit {
                        *slot = Some(v);
                        run += 1;
                    }
                }
            }
        }
    }
}

/// Copy each known value forward over up to `limit` missing days.
fn forward_fill(slots: &mut [Option<f64>], limit: usize) {
    let mut prev = None;
    let mut run = 0;
    for slot in slots.iter_mut() {
        match slot {
            Some(v) => {
                prev = Some(*v);
                run = 0;
            }
            None => {
                if let Some(v) = prev {
                    if run < limit {
                        *slot = Some(v);
                        run += 1;
                    }
                }
            }
        }
    }
}

/// Build a complete daily series for one item.
///
/// `observations` may reach outside the window; they are only reindexed onto
/// the window's calendar, but all of them feed the mean fallback.
pub fn fill_series(
    observations: &[(NaiveDate, f64)],
    window: &DateWindow,
    policy: &FillPolicy,
) -> Result<FillOutcome, ItemError> {
    let mut by_date = BTreeMap::new();
    for &(date, value) in observations {
        if !value.is_finite() {
            return Err(ItemError::NonFinite(date));
        }
        if by_date.insert(date, value).is_some() {
            return Err(ItemError::DuplicateDate(date));
        }
    }

    let dates = window.calendar(policy.max_calendar_days);
    let mut slots: Vec<Option<f64>> = dates.iter().map(|d| by_date.get(d).copied()).collect();

    backfill(&mut slots, policy.limit_days);
    forward_fill(&mut slots, policy.limit_days);

    let fallback = if slots.iter().any(Option::is_none) {
        if observations.is_empty() {
            match policy.fallback {
                Fallback::MeanOrZero => 0.0,
                Fallback::MeanOrNoData => return Ok(FillOutcome::NoData),
            }
        } else {
            observations.iter().map(|(_, v)| v).sum::<f64>() / observations.len() as f64
        }
    } else {
        0.0
    };

    let values = slots.into_iter().map(|v| v.unwrap_or(fallback)).collect();
    Ok(FillOutcome::Filled(FilledSeries { dates, values }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn policy(fallback: Fallback) -> FillPolicy {
        FillPolicy {
            limit_days: 30,
            max_calendar_days: 731,
            fallback,
        }
    }

    fn filled(outcome: FillOutcome) -> FilledSeries {
        match outcome {
            FillOutcome::Filled(s) => s,
            FillOutcome::NoData => panic!("expected a filled series"),
        }
    }

    #[test]
    fn short_gaps_are_bridged_by_neighbours() {
        // 40 missing days: the later value reaches back 30, the earlier covers the rest.
        let start = d(1, 1, 2024);
        let end = start + Duration::days(41);
        let window = DateWindow::new(start, end).unwrap();
        let s = filled(
            fill_series(&[(start, 10.0), (end, 20.0)], &window, &policy(Fallback::MeanOrNoData))
                .unwrap(),
        );
        assert_eq!(s.len(), 42);
        let v = s.values();
        assert!(v[1..=10].iter().all(|&x| x == 10.0));
        assert!(v[11..=40].iter().all(|&x| x == 20.0));
    }

    #[test]
    fn long_gaps_fall_back_to_mean() {
        let start = d(1, 1, 2024);
        let end = start + Duration::days(100);
        let window = DateWindow::new(start, end).unwrap();
        let s = filled(
            fill_series(&[(start, 10.0), (end, 20.0)], &window, &policy(Fallback::MeanOrNoData))
                .unwrap(),
        );
        let v = s.values();
        assert!(v[1..=30].iter().all(|&x| x == 10.0));
        assert!(v[31..70].iter().all(|&x| x == 15.0));
        assert!(v[70..100].iter().all(|&x| x == 20.0));
        assert_eq!(v[100], 20.0);
    }

    #[test]
    fn mean_uses_observations_outside_window() {
        let window = DateWindow::new(d(1, 3, 2024), d(3, 3, 2024)).unwrap();
        let obs = [(d(1, 1, 2024), 4.0), (d(1, 6, 2024), 8.0)];
        let s = filled(fill_series(&obs, &window, &policy(Fallback::MeanOrZero)).unwrap());
        assert_eq!(s.values(), [6.0, 6.0, 6.0]);
    }

    #[test]
    fn no_observations_follows_policy() {
        let window = DateWindow::new(d(1, 1, 2024), d(5, 1, 2024)).unwrap();
        let zeros = filled(fill_series(&[], &window, &policy(Fallback::MeanOrZero)).unwrap());
        assert_eq!(zeros.values(), [0.0; 5]);
        assert_eq!(
            fill_series(&[], &window, &policy(Fallback::MeanOrNoData)).unwrap(),
            FillOutcome::NoData
        );
    }

    #[test]
    fn calendar_is_capped() {
        let start = d(1, 1, 2022);
        let window = DateWindow::new(start, start + Duration::days(999)).unwrap();
        let s = filled(
            fill_series(&[(start, 1.0)], &window, &policy(Fallback::MeanOrNoData)).unwrap(),
        );
        assert_eq!(s.len(), 731);
        assert_eq!(s.dates().last().copied(), Some(start + Duration::days(730)));
    }

    #[test]
    fn malformed_observations_are_item_errors() {
        let window = DateWindow::new(d(1, 1, 2024), d(2, 1, 2024)).unwrap();
        let p = policy(Fallback::MeanOrZero);
        assert_eq!(
            fill_series(&[(d(1, 1, 2024), 1.0), (d(1, 1, 2024), 2.0)], &window, &p),
            Err(ItemError::DuplicateDate(d(1, 1, 2024)))
        );
        assert_eq!(
            fill_series(&[(d(2, 1, 2024), f64::NAN)], &window, &p),
            Err(ItemError::NonFinite(d(2, 1, 2024)))
        );
    }

    #[test]
    fn single_observation_spreads_both_ways() {
        let window = DateWindow::new(d(1, 1, 2024), d(3, 1, 2024)).unwrap();
        let s = filled(
            fill_series(&[(d(2, 1, 2024), 7.0)], &window, &policy(Fallback::MeanOrZero)).unwrap(),
        );
        assert_eq!(s.dates(), [d(1, 1, 2024), d(2, 1, 2024), d(3, 1, 2024)]);
        assert_eq!(s.values(), [7.0, 7.0, 7.0]);
    }
}
