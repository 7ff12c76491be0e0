use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use super::model::format_date;

fn day(date: &NaiveDate) -> String {
    format_date(*date)
}

/// The sheet's columns cannot support the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("no date columns found (expected headers in DD.MM.YYYY format)")]
    NoDateColumns,
    #[error("no identifier columns found; cannot tell items apart")]
    NoIdentifierColumns,
}

/// Structural failure while melting or pivoting the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReshapeError {
    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("column '{0}' is not in the table")]
    UnknownColumn(String),
    #[error("{count} duplicate (item, date) keys remain after deduplication")]
    DuplicateKeys { count: usize },
}

/// The requested date window is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("end date {} is before start date {}", day(.end), day(.start))]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("the sheet contains no valid dates")]
    NoValidDates,
    #[error("window {} – {} lies outside the allowed dates", day(.start), day(.end))]
    OutsideBounds { start: NaiveDate, end: NaiveDate },
}

/// Failure scoped to one item; never aborts the summary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemError {
    #[error("two observations share the date {}", day(.0))]
    DuplicateDate(NaiveDate),
    #[error("observation on {} is not a finite number", day(.0))]
    NonFinite(NaiveDate),
    #[error("the filled series is empty")]
    EmptySeries,
}

/// Anything that stops a pipeline run for the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Reshape(#[from] ReshapeError),
    #[error(transparent)]
    InvalidRange(#[from] RangeError),
}

impl PipelineError {
    /// Stable machine-readable reason for the empty result.
    pub fn reason_code(&self) -> &'static str {
        match self {
            PipelineError::Schema(SchemaError::NoDateColumns) => "no_date_columns",
            PipelineError::Schema(SchemaError::NoIdentifierColumns) => "no_identifier_columns",
            PipelineError::Reshape(_) => "reshape_failed",
            PipelineError::InvalidRange(RangeError::NoValidDates) => "no_valid_dates",
            PipelineError::InvalidRange(_) => "invalid_range",
        }
    }
}

// ---------------------------------------------------------------------------
// Non-fatal conditions reported alongside a result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    /// Duplicate (item, date) cells were dropped, keeping the last row.
    DuplicatesDropped { count: usize },
    /// The window is longer than the recommended maximum.
    WideWindow { days: i64, recommended: i64 },
    /// The daily calendar was truncated to `cap` days.
    CalendarCapped { requested: usize, cap: usize },
    /// No selected item has an observation inside the window.
    NoDataInWindow,
    ItemFailed { item: String, reason: String },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::DuplicatesDropped { count } => write!(
                f,
                "Found {count} duplicate dates; the latest values are used."
            ),
            PipelineWarning::WideWindow { days, recommended } => write!(
                f,
                "The selected range ({days} days) is very large. \
                 Consider a shorter period (up to {recommended} days)."
            ),
            PipelineWarning::CalendarCapped { requested, cap } => write!(
                f,
                "The daily calendar was limited to {cap} of {requested} days."
            ),
            PipelineWarning::NoDataInWindow => {
                write!(f, "No data for the selected dates or items.")
            }
            PipelineWarning::ItemFailed { item, reason } => {
                write!(f, "Error while processing '{item}': {reason}")
            }
        }
    }
}
