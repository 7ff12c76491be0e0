use super::model::{LongRecord, LongTable, Variant};
use super::reshape::MeltedCell;

/// What to do with a cell whose text holds no number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingValue {
    /// Drop the record: a price needs a real observation.
    Drop,
    /// Keep the record as zero: an absent quantity means none in stock.
    Zero,
}

impl Variant {
    pub fn missing_value(self) -> MissingValue {
        match self {
            Variant::Price => MissingValue::Drop,
            Variant::Quantity => MissingValue::Zero,
        }
    }
}

/// Coerce loosely formatted text into a number.
///
/// Decimal commas become points first, then every character other than a
/// digit or point is stripped. Whatever is left must parse as a finite
/// number. Signs are stripped along with everything else.
pub fn clean_numeric(raw: &str) -> Option<f64> {
    let kept: String = raw
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    kept.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Counters describing what normalization discarded or invented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub dropped_dates: usize,
    pub dropped_values: usize,
    pub zero_filled: usize,
}

/// Turn melted cells into long records under the variant's missing-value
/// policy. Cells without a calendar date are always dropped.
pub fn normalize(
    cells: Vec<MeltedCell>,
    id_columns: Vec<String>,
    grouping: usize,
    variant: Variant,
) -> (LongTable, NormalizeStats) {
    let policy = variant.missing_value();
    let mut stats = NormalizeStats::default();
    let mut records = Vec::with_capacity(cells.len());

    for cell in cells {
        let Some(date) = cell.date else {
            stats.dropped_dates += 1;
            continue;
        };
        let value = match (clean_numeric(&cell.raw), policy) {
            (Some(v), _) => v,
            (None, MissingValue::Zero) => {
                stats.zero_filled += 1;
                0.0
            }
            (None, MissingValue::Drop) => {
                stats.dropped_values += 1;
                continue;
            }
        };
        records.push(LongRecord {
            row: cell.row,
            ids: cell.ids,
            date,
            value,
        });
    }

    log::debug!(
        "normalized {} records ({variant}): {stats:?}",
        records.len()
    );
    (
        LongTable {
            id_columns,
            grouping,
            records,
        },
        stats,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::rc::Rc;

    #[test]
    fn locale_decimals_and_units() {
        assert_eq!(clean_numeric("1,5kg"), Some(1.5));
        assert_eq!(clean_numeric(" 12.40 грн"), Some(12.4));
        assert_eq!(clean_numeric("7"), Some(7.0));
    }

    #[test]
    fn unparseable_text_is_missing() {
        assert_eq!(clean_numeric("--"), None);
        assert_eq!(clean_numeric(""), None);
        assert_eq!(clean_numeric("n/a"), None);
        assert_eq!(clean_numeric("."), None);
        // Thousands separators collapse into two points.
        assert_eq!(clean_numeric("1.234,5"), None);
    }

    #[test]
    fn minus_sign_is_stripped() {
        assert_eq!(clean_numeric("-3"), Some(3.0));
    }

    fn cells() -> Vec<MeltedCell> {
        let ids: Rc<[String]> = Rc::from(vec!["A".to_string()]);
        let day = NaiveDate::from_ymd_opt(2024, 1, 1);
        vec![
            MeltedCell { row: 0, ids: ids.clone(), date: day, raw: "10".into() },
            MeltedCell { row: 0, ids: ids.clone(), date: day, raw: "".into() },
            MeltedCell { row: 0, ids: ids.clone(), date: day, raw: "--".into() },
            MeltedCell { row: 0, ids, date: None, raw: "5".into() },
        ]
    }

    #[test]
    fn price_drops_missing_values() {
        let (long, stats) = normalize(cells(), vec!["Item".into()], 0, Variant::Price);
        assert_eq!(long.records.len(), 1);
        assert_eq!(long.records[0].value, 10.0);
        assert_eq!(
            stats,
            NormalizeStats { dropped_dates: 1, dropped_values: 2, zero_filled: 0 }
        );
    }

    #[test]
    fn quantity_zeroes_missing_values() {
        let (long, stats) = normalize(cells(), vec!["Item".into()], 0, Variant::Quantity);
        let values: Vec<f64> = long.records.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![10.0, 0.0, 0.0]);
        assert_eq!(stats.dropped_dates, 1);
        assert_eq!(stats.zero_filled, 2);
    }
}
