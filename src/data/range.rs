use chrono::NaiveDate;

use super::error::{PipelineWarning, RangeError};
use super::model::DateWindow;
use crate::config::VariantConfig;

/// Chooses the effective date window for a query.
///
/// With a hard floor or ceiling configured the request is intersected with
/// those bounds; otherwise it is clamped to the dates actually observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSelector {
    pub hard_floor: Option<NaiveDate>,
    pub hard_ceiling: Option<NaiveDate>,
    pub warn_window_days: i64,
    pub max_calendar_days: usize,
}

/// The effective window plus whatever deserves a warning about it.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSelection {
    pub window: DateWindow,
    pub warnings: Vec<PipelineWarning>,
}

impl RangeSelector {
    pub fn from_config(cfg: &VariantConfig) -> Self {
        Self {
            hard_floor: cfg.hard_floor,
            hard_ceiling: cfg.hard_ceiling,
            warn_window_days: cfg.warn_window_days,
            max_calendar_days: cfg.max_calendar_days,
        }
    }

    fn has_hard_bounds(&self) -> bool {
        self.hard_floor.is_some() || self.hard_ceiling.is_some()
    }

    /// Window offered before the user picks anything: the observed range,
    /// tightened by the hard bounds.
    pub fn default_window(
        &self,
        observed: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<DateWindow, RangeError> {
        let (min, max) = observed.ok_or(RangeError::NoValidDates)?;
        let start = self.hard_floor.map_or(min, |floor| min.max(floor));
        let end = self.hard_ceiling.map_or(max, |ceiling| max.min(ceiling));
        if end < start {
            return Err(RangeError::OutsideBounds { start: min, end: max });
        }
        DateWindow::new(start, end)
    }

    /// Resolve a user request into the effective window.
    pub fn select(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        observed: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<RangeSelection, RangeError> {
        let (min, max) = observed.ok_or(RangeError::NoValidDates)?;
        if end < start {
            return Err(RangeError::EndBeforeStart { start, end });
        }

        let (lo, hi) = if self.has_hard_bounds() {
            (
                self.hard_floor.map_or(start, |floor| start.max(floor)),
                self.hard_ceiling.map_or(end, |ceiling| end.min(ceiling)),
            )
        } else {
            (start.max(min), end.min(max))
        };
        if hi < lo {
            return Err(RangeError::OutsideBounds { start, end });
        }
        let window = DateWindow::new(lo, hi)?;

        let mut warnings = Vec::new();
        let days = window.span_days();
        if days > self.warn_window_days {
            log::warn!("date window spans {days} days");
            warnings.push(PipelineWarning::WideWindow {
                days,
                recommended: self.warn_window_days,
            });
        }
        if window.len_days() > self.max_calendar_days {
            log::warn!(
                "daily calendar capped at {} of {} days",
                self.max_calendar_days,
                window.len_days()
            );
            warnings.push(PipelineWarning::CalendarCapped {
                requested: window.len_days(),
                cap: self.max_calendar_days,
            });
        }

        Ok(RangeSelection { window, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn data_driven() -> RangeSelector {
        RangeSelector::from_config(&VariantConfig::default())
    }

    fn bounded() -> RangeSelector {
        RangeSelector {
            hard_floor: Some(d(1, 1, 2022)),
            hard_ceiling: Some(d(31, 12, 2025)),
            ..data_driven()
        }
    }

    #[test]
    fn clamps_to_observed_without_hard_bounds() {
        let sel = data_driven()
            .select(d(1, 1, 2020), d(1, 1, 2030), Some((d(5, 3, 2024), d(9, 9, 2024))))
            .unwrap();
        assert_eq!(sel.window.start(), d(5, 3, 2024));
        assert_eq!(sel.window.end(), d(9, 9, 2024));
        assert!(sel.warnings.is_empty());
    }

    #[test]
    fn hard_bounds_replace_observed_clamp() {
        let sel = bounded()
            .select(d(1, 6, 2021), d(1, 6, 2022), Some((d(1, 1, 2024), d(2, 1, 2024))))
            .unwrap();
        assert_eq!(sel.window.start(), d(1, 1, 2022));
        assert_eq!(sel.window.end(), d(1, 6, 2022));
    }

    #[test]
    fn reversed_request_is_invalid() {
        let err = data_driven()
            .select(d(2, 1, 2024), d(1, 1, 2024), Some((d(1, 1, 2024), d(2, 1, 2024))))
            .unwrap_err();
        assert_eq!(
            err,
            RangeError::EndBeforeStart { start: d(2, 1, 2024), end: d(1, 1, 2024) }
        );
    }

    #[test]
    fn no_observed_dates_is_invalid() {
        assert_eq!(
            data_driven().select(d(1, 1, 2024), d(2, 1, 2024), None),
            Err(RangeError::NoValidDates)
        );
        assert_eq!(data_driven().default_window(None), Err(RangeError::NoValidDates));
    }

    #[test]
    fn disjoint_request_is_invalid() {
        let err = data_driven()
            .select(d(1, 1, 2020), d(1, 2, 2020), Some((d(1, 1, 2024), d(2, 1, 2024))))
            .unwrap_err();
        assert!(matches!(err, RangeError::OutsideBounds { .. }));
    }

    #[test]
    fn long_windows_warn_and_cap() {
        let sel = bounded()
            .select(d(1, 1, 2022), d(27, 9, 2024), Some((d(1, 1, 2022), d(1, 1, 2023))))
            .unwrap();
        assert_eq!(sel.window.len_days(), 1001);
        assert_eq!(
            sel.warnings,
            vec![
                PipelineWarning::WideWindow { days: 1000, recommended: 730 },
                PipelineWarning::CalendarCapped { requested: 1001, cap: 731 },
            ]
        );
    }

    #[test]
    fn exactly_730_days_is_quiet() {
        let start = d(1, 1, 2022);
        let end = start + chrono::Duration::days(730);
        let sel = bounded().select(start, end, Some((start, end))).unwrap();
        assert_eq!(sel.window.len_days(), 731);
        assert!(sel.warnings.is_empty());
    }

    #[test]
    fn default_window_respects_hard_bounds() {
        let w = bounded()
            .default_window(Some((d(1, 6, 2021), d(1, 6, 2026))))
            .unwrap();
        assert_eq!((w.start(), w.end()), (d(1, 1, 2022), d(31, 12, 2025)));
    }
}
