use once_cell::sync::Lazy;
use regex::Regex;

use super::error::SchemaError;

/// Exactly `DD.MM.YYYY`; no calendar validation happens here.
static DATE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").expect("date header pattern"));

pub fn is_date_header(name: &str) -> bool {
    DATE_HEADER.is_match(name)
}

/// Order-preserving split of a sheet's columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnPartition {
    pub identifiers: Vec<String>,
    pub dates: Vec<String>,
}

/// Partition column names into identifier and date columns.
pub fn classify(columns: &[String]) -> ColumnPartition {
    let mut partition = ColumnPartition::default();
    for col in columns {
        if is_date_header(col) {
            partition.dates.push(col.clone());
        } else {
            partition.identifiers.push(col.clone());
        }
    }
    partition
}

impl ColumnPartition {
    /// Fail with [`SchemaError::NoDateColumns`] when nothing looks like a date.
    pub fn require_dates(self) -> Result<Self, SchemaError> {
        if self.dates.is_empty() {
            return Err(SchemaError::NoDateColumns);
        }
        Ok(self)
    }

    /// Index of the grouping column: `preferred` when present, else the first
    /// identifier column.
    pub fn grouping_index(&self, preferred: &str) -> Result<usize, SchemaError> {
        if self.identifiers.is_empty() {
            return Err(SchemaError::NoIdentifierColumns);
        }
        Ok(self
            .identifiers
            .iter()
            .position(|c| c == preferred)
            .unwrap_or(0))
    }
}
