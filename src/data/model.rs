use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{RangeError, ReshapeError};

/// Date format used for column headers and every displayed date.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Variant – which missing-value policy a sheet follows
// ---------------------------------------------------------------------------

/// The two kinds of sheet the viewer understands.
///
/// Prices need real observations to mean anything, so missing cells are
/// dropped. Quantities treat a missing cell as "zero in stock".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Price,
    Quantity,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Price, Variant::Quantity];

    /// Noun used in column headers ("Initial price", "Max quantity", ...).
    pub fn noun(self) -> &'static str {
        match self {
            Variant::Price => "price",
            Variant::Quantity => "quantity",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Price => write!(f, "Prices"),
            Variant::Quantity => write!(f, "Quantities"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – the wide sheet as delivered by the data source
// ---------------------------------------------------------------------------

/// A wide sheet: named columns, every cell kept as text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table, rejecting duplicate column names and ragged rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ReshapeError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(ReshapeError::DuplicateColumn(col.clone()));
            }
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != columns.len() {
                return Err(ReshapeError::RaggedRow {
                    row,
                    expected: columns.len(),
                    found: cells.len(),
                });
            }
        }
        Ok(RawTable { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy of the table with the named columns removed (absent names are ignored).
    pub fn without_columns(&self, drop: &[String]) -> RawTable {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !drop.contains(&self.columns[i]))
            .collect();
        if keep.len() == self.columns.len() {
            return self.clone();
        }
        RawTable {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|cells| keep.iter().map(|&i| cells[i].clone()).collect())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// LongRecord / LongTable – the melted, normalized form
// ---------------------------------------------------------------------------

/// One (row, date column) observation after normalization.
///
/// `ids` is shared by every record melted from the same source row.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    /// Source row in the raw table; later rows win on duplicate keys.
    pub row: usize,
    pub ids: Rc<[String]>,
    pub date: NaiveDate,
    /// Always finite: the normalizer drops or zeroes anything else.
    pub value: f64,
}

/// Long-format records plus the identifier column names they carry.
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    pub id_columns: Vec<String>,
    /// Index into `id_columns` of the grouping ("Item") column.
    pub grouping: usize,
    pub records: Vec<LongRecord>,
}

impl LongTable {
    pub fn grouping_column(&self) -> &str {
        &self.id_columns[self.grouping]
    }

    pub fn item<'a>(&self, record: &'a LongRecord) -> &'a str {
        &record.ids[self.grouping]
    }

    /// Earliest and latest observed dates, if any record survived.
    pub fn observed_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}

// ---------------------------------------------------------------------------
// DateWindow – inclusive calendar range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::EndBeforeStart { start, end });
        }
        Ok(DateWindow { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Days between start and end (0 for a single-day window).
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Number of calendar days in the window, both ends included.
    pub fn len_days(&self) -> usize {
        self.span_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day of the window from the start, truncated to `cap` entries.
    pub fn calendar(&self, cap: usize) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take(self.len_days().min(cap))
            .collect()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", format_date(self.start), format_date(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn raw_table_rejects_duplicate_columns() {
        let err = RawTable::new(vec!["Item".into(), "Item".into()], vec![]).unwrap_err();
        assert_eq!(err, ReshapeError::DuplicateColumn("Item".into()));
    }

    #[test]
    fn raw_table_rejects_ragged_rows() {
        let err = RawTable::new(
            vec!["Item".into(), "01.01.2024".into()],
            vec![vec!["A".into()]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReshapeError::RaggedRow {
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn without_columns_drops_only_named() {
        let table = RawTable::new(
            vec!["id".into(), "Item".into(), "01.01.2024".into()],
            vec![vec!["7".into(), "A".into(), "1".into()]],
        )
        .unwrap();
        let trimmed = table.without_columns(&["id".to_string(), "missing".to_string()]);
        assert_eq!(trimmed.columns(), ["Item", "01.01.2024"]);
        assert_eq!(trimmed.rows()[0], vec!["A".to_string(), "1".to_string()]);
    }

    #[test]
    fn window_calendar_is_inclusive_and_capped() {
        let w = DateWindow::new(d(1, 1, 2024), d(3, 1, 2024)).unwrap();
        assert_eq!(w.len_days(), 3);
        assert_eq!(w.calendar(10), vec![d(1, 1, 2024), d(2, 1, 2024), d(3, 1, 2024)]);
        assert_eq!(w.calendar(2).len(), 2);
    }

    #[test]
    fn window_rejects_reversed_dates() {
        assert!(matches!(
            DateWindow::new(d(2, 1, 2024), d(1, 1, 2024)),
            Err(RangeError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn window_displays_sheet_dates() {
        let w = DateWindow::new(d(1, 1, 2024), d(31, 12, 2024)).unwrap();
        assert_eq!(w.to_string(), "01.01.2024 – 31.12.2024");
    }
}
