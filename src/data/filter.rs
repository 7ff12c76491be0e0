use std::collections::HashMap;

use super::model::LongTable;

// ---------------------------------------------------------------------------
// Item selection: which items the summary and chart cover
// ---------------------------------------------------------------------------

/// Selected items, kept in the order they were picked.
pub type ItemSelection = Vec<String>;

/// Distinct items in order of their first source row.
pub fn available_items(long: &LongTable) -> Vec<String> {
    let mut first_row: HashMap<&str, usize> = HashMap::new();
    for r in &long.records {
        let row = first_row.entry(long.item(r)).or_insert(r.row);
        *row = (*row).min(r.row);
    }
    let mut items: Vec<(usize, &str)> =
        first_row.into_iter().map(|(item, row)| (row, item)).collect();
    items.sort_unstable();
    items.into_iter().map(|(_, item)| item.to_string()).collect()
}

/// The first `n` available items.
pub fn default_selection(available: &[String], n: usize) -> ItemSelection {
    available.iter().take(n).cloned().collect()
}

/// Add or remove one item; newly added items go to the end.
pub fn toggle(selection: &mut ItemSelection, item: &str) {
    if let Some(pos) = selection.iter().position(|s| s == item) {
        selection.remove(pos);
    } else {
        selection.push(item.to_string());
    }
}

pub fn select_all(available: &[String]) -> ItemSelection {
    available.to_vec()
}

/// Drop selected items that are no longer available (e.g. after a reload).
pub fn retain_available(selection: &mut ItemSelection, available: &[String]) {
    selection.retain(|s| available.contains(s));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LongRecord;
    use chrono::NaiveDate;
    use std::rc::Rc;

    fn long(items: &[&str]) -> LongTable {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        LongTable {
            id_columns: vec!["Category".into(), "Item".into()],
            grouping: 1,
            records: items
                .iter()
                .enumerate()
                .map(|(row, item)| LongRecord {
                    row,
                    ids: Rc::from(vec!["Food".to_string(), item.to_string()]),
                    date,
                    value: 1.0,
                })
                .collect(),
        }
    }

    #[test]
    fn items_in_first_appearance_order() {
        let l = long(&["Milk", "Bread", "Milk", "Eggs", "Bread"]);
        assert_eq!(available_items(&l), ["Milk", "Bread", "Eggs"]);
    }

    #[test]
    fn items_follow_source_rows_not_record_order() {
        // Bread's first dated value sits in a later column than Eggs'.
        let mut l = long(&["Milk", "Bread", "Eggs"]);
        l.records.swap(1, 2);
        assert_eq!(available_items(&l), ["Milk", "Bread", "Eggs"]);
    }

    #[test]
    fn default_takes_first_two() {
        let avail: Vec<String> = ["Milk", "Bread", "Eggs"].map(String::from).to_vec();
        assert_eq!(default_selection(&avail, 2), ["Milk", "Bread"]);
        assert_eq!(default_selection(&avail[..1], 2), ["Milk"]);
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut sel = vec!["Milk".to_string()];
        toggle(&mut sel, "Eggs");
        toggle(&mut sel, "Milk");
        assert_eq!(sel, ["Eggs"]);
    }

    #[test]
    fn retain_drops_vanished_items() {
        let mut sel: ItemSelection = vec!["Milk".into(), "Tea".into()];
        retain_available(&mut sel, &["Milk".to_string()]);
        assert_eq!(sel, ["Milk"]);
    }
}
