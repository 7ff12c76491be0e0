use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use chrono::NaiveDate;

use super::error::ReshapeError;
use super::model::{LongTable, RawTable, DATE_FORMAT};
use super::schema::{is_date_header, ColumnPartition};

// ---------------------------------------------------------------------------
// Wide → long
// ---------------------------------------------------------------------------

/// One (row, date column) cell before its text is normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct MeltedCell {
    pub row: usize,
    pub ids: Rc<[String]>,
    /// `None` when the header matched the pattern but is not a real day.
    pub date: Option<NaiveDate>,
    pub raw: String,
}

/// Strict `day.month.year` parse of a date column header.
pub fn parse_date_header(name: &str) -> Option<NaiveDate> {
    if !is_date_header(name) {
        return None;
    }
    NaiveDate::parse_from_str(name, DATE_FORMAT).ok()
}

fn resolve(table: &RawTable, names: &[String]) -> Result<Vec<usize>, ReshapeError> {
    names
        .iter()
        .map(|n| {
            table
                .column_index(n)
                .ok_or_else(|| ReshapeError::UnknownColumn(n.clone()))
        })
        .collect()
}

/// Melt the wide table into exactly `rows × date columns` cells.
///
/// Cells are emitted date column by date column, rows in source order within
/// each column.
pub fn melt(
    table: &RawTable,
    partition: &ColumnPartition,
) -> Result<Vec<MeltedCell>, ReshapeError> {
    let id_idx = resolve(table, &partition.identifiers)?;
    let date_idx = resolve(table, &partition.dates)?;

    let ids: Vec<Rc<[String]>> = table
        .rows()
        .iter()
        .map(|cells| id_idx.iter().map(|&i| cells[i].clone()).collect())
        .collect();

    let mut cells = Vec::with_capacity(table.len() * date_idx.len());
    for (&col, name) in date_idx.iter().zip(&partition.dates) {
        let date = parse_date_header(name);
        if date.is_none() {
            log::debug!("date column '{name}' is not a calendar day; its cells will be dropped");
        }
        for (row, source) in table.rows().iter().enumerate() {
            cells.push(MeltedCell {
                row,
                ids: Rc::clone(&ids[row]),
                date,
                raw: source[col].clone(),
            });
        }
    }
    Ok(cells)
}

// ---------------------------------------------------------------------------
// Duplicate handling and grouping
// ---------------------------------------------------------------------------

/// Keep only the latest source row for every (item, date) key.
///
/// Returns the number of records dropped.
pub fn dedup_keep_last(table: &mut LongTable) -> usize {
    let g = table.grouping;
    let mut winner: HashMap<(&str, NaiveDate), usize> = HashMap::new();
    for (i, rec) in table.records.iter().enumerate() {
        match winner.entry((rec.ids[g].as_str(), rec.date)) {
            Entry::Occupied(mut e) => {
                if table.records[*e.get()].row <= rec.row {
                    e.insert(i);
                }
            }
            Entry::Vacant(e) => {
                e.insert(i);
            }
        }
    }
    let keep: HashSet<usize> = winner.into_values().collect();
    let before = table.records.len();
    let records = std::mem::take(&mut table.records);
    table.records = records
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, r)| r)
        .collect();
    before - table.records.len()
}

/// Date-sorted observations per item.
pub type Observations = HashMap<String, Vec<(NaiveDate, f64)>>;

/// Pivot records into per-item observation lists.
///
/// Requires one value per (item, date); duplicates are a
/// [`ReshapeError::DuplicateKeys`].
pub fn group_observations(table: &LongTable) -> Result<Observations, ReshapeError> {
    let mut seen: HashSet<(&str, NaiveDate)> = HashSet::with_capacity(table.records.len());
    let mut duplicates = 0;
    let mut grouped: Observations = HashMap::new();
    for rec in &table.records {
        let item = table.item(rec);
        if !seen.insert((item, rec.date)) {
            duplicates += 1;
            continue;
        }
        grouped
            .entry(item.to_string())
            .or_default()
            .push((rec.date, rec.value));
    }
    if duplicates > 0 {
        return Err(ReshapeError::DuplicateKeys { count: duplicates });
    }
    for obs in grouped.values_mut() {
        obs.sort_by_key(|(date, _)| *date);
    }
    Ok(grouped)
}
