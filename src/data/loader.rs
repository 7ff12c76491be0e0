use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::RawTable;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a wide sheet from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one row per item, one column per `DD.MM.YYYY` date
/// * `.json`    – `[{ "Item": "Milk", "01.01.2024": "30,5", ... }, ...]`
/// * `.parquet` – any flat schema; every cell is rendered to text
///
/// At most `max_rows` rows are accepted.
pub fn load_file(path: &Path, max_rows: usize) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path, max_rows),
        "json" => load_json(path, max_rows),
        "parquet" | "pq" => load_parquet(path, max_rows),
        other => bail!("Unsupported file extension: .{other}"),
    }?;
    log::info!(
        "Loaded {} rows × {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

fn check_row_cap(rows: usize, max_rows: usize) -> Result<()> {
    if rows > max_rows {
        bail!("sheet has more than {max_rows} rows");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path, max_rows: usize) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        check_row_cap(row_no + 1, max_rows)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    RawTable::new(columns, rows).context("CSV layout")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns appear in
/// first-seen key order; a key missing from a record is an empty cell.
fn load_json(path: &Path, max_rows: usize) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;
    check_row_cap(records.len(), max_rows)?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    RawTable::new(columns, rows).context("JSON layout")
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export of the sheet. Nulls become empty cells; every other
/// value is rendered with Arrow's display formatting.
fn load_parquet(path: &Path, max_rows: usize) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        check_row_cap(rows.len() + batch.num_rows(), max_rows)?;

        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        Ok(String::new())
                    } else {
                        array_value_to_string(col.as_ref(), row)
                    }
                })
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Row {}: failed to render cell", rows.len()))?;
            rows.push(cells);
        }
    }

    RawTable::new(columns, rows).context("parquet layout")
}
