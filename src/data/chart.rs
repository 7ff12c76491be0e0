use chrono::{Datelike, NaiveDate};

use super::fill::FilledSeries;

/// Filled values pivoted for charting: one column per item, one row per day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartMatrix {
    pub dates: Vec<NaiveDate>,
    pub items: Vec<String>,
    /// `columns[i][d]` is item `i` on `dates[d]`.
    pub columns: Vec<Vec<f64>>,
}

impl ChartMatrix {
    /// Pivot filled series sharing one calendar. Series whose calendar does
    /// not match `dates` are skipped.
    pub fn from_series(dates: Vec<NaiveDate>, series: &[(String, FilledSeries)]) -> Self {
        let mut matrix = ChartMatrix {
            dates,
            ..Default::default()
        };
        for (item, s) in series {
            if s.dates() != matrix.dates.as_slice() {
                log::warn!("series for '{item}' does not match the chart calendar; skipped");
                continue;
            }
            matrix.items.push(item.clone());
            matrix.columns.push(s.values().to_vec());
        }
        matrix
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `[x, y]` points of one item, x being [`date_to_x`].
    pub fn points(&self, item: usize) -> Vec<[f64; 2]> {
        self.dates
            .iter()
            .zip(&self.columns[item])
            .map(|(&date, &v)| [date_to_x(date), v])
            .collect()
    }
}

/// Plot coordinate of a day.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}
