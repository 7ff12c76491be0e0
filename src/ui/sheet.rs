use eframe::egui::{ScrollArea, TextEdit, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::RawTable;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Raw sheet grid (central panel, "Sheet" tab)
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 20.0;

/// Which parts of the loaded sheet the grid shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetView {
    /// Column kept at the left edge while the others scroll.
    pub pinned: usize,
    /// Remaining visible columns, in sheet order.
    pub scrolling: Vec<usize>,
    /// Rows whose pinned cell matches the filter.
    pub rows: Vec<usize>,
}

/// Lay out the sheet: configured columns hidden, the first remaining column
/// pinned, rows kept when their pinned cell contains `filter`
/// (case-insensitive). `None` when every column is hidden.
pub fn sheet_view(table: &RawTable, hidden: &[String], filter: &str) -> Option<SheetView> {
    let columns = table.columns();
    let mut visible = (0..columns.len()).filter(|&i| !hidden.contains(&columns[i]));
    let pinned = visible.next()?;
    let scrolling = visible.collect();

    let needle = filter.trim().to_lowercase();
    let rows = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, cells)| {
            needle.is_empty() || cells[pinned].to_lowercase().contains(&needle)
        })
        .map(|(i, _)| i)
        .collect();

    Some(SheetView {
        pinned,
        scrolling,
        rows,
    })
}

/// Render the loaded sheet as a grid with a filter on the item column.
pub fn sheet_grid(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sheet to view it  (File → Open…)");
        });
        return;
    };
    if table.is_empty() {
        ui.label("The sheet has no rows.");
        return;
    }
    let hidden = &state.config().drop_columns;
    let Some(view) = sheet_view(table, hidden, &state.sheet_filter) else {
        ui.label("Every column of the sheet is hidden.");
        return;
    };

    let pinned_name = &table.columns()[view.pinned];
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Filter {pinned_name}"));
        ui.add(TextEdit::singleline(&mut state.sheet_filter).desired_width(180.0));
        ui.label(format!("{} of {} rows", view.rows.len(), table.len()));
    });
    ui.separator();

    ScrollArea::vertical()
        .id_salt("sheet_rows")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_top(|ui: &mut Ui| {
                grid(ui, table, "sheet_pinned", &[view.pinned], &view.rows, true);
                ScrollArea::horizontal()
                    .id_salt("sheet_columns")
                    .show(ui, |ui: &mut Ui| {
                        grid(ui, table, "sheet_scrolling", &view.scrolling, &view.rows, false);
                    });
            });
        });
}

/// One table over the given columns. Both halves share row heights so the
/// pinned column lines up with the scrolling part.
fn grid(
    ui: &mut Ui,
    table: &RawTable,
    id: &str,
    columns: &[usize],
    rows: &[usize],
    strong: bool,
) {
    if columns.is_empty() {
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(70.0).resizable(true), columns.len())
            .header(HEADER_HEIGHT, |mut header| {
                for &c in columns {
                    header.col(|ui| {
                        ui.strong(&table.columns()[c]);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let cells = &table.rows()[rows[row.index()]];
                    for &c in columns {
                        row.col(|ui| {
                            if strong {
                                ui.strong(&cells[c]);
                            } else {
                                ui.label(&cells[c]);
                            }
                        });
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> RawTable {
        RawTable::new(
            ["id", "Item", "Unit", "01.01.2024"].map(String::from).to_vec(),
            vec![
                ["1", "Milk", "l", "30"].map(String::from).to_vec(),
                ["2", "Oat milk", "l", "45"].map(String::from).to_vec(),
                ["3", "Bread", "pcs", "12"].map(String::from).to_vec(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn first_visible_column_is_pinned() {
        let view = sheet_view(&sheet(), &["id".to_string()], "").unwrap();
        assert_eq!(view.pinned, 1);
        assert_eq!(view.scrolling, [2, 3]);
        assert_eq!(view.rows, [0, 1, 2]);
    }

    #[test]
    fn filter_matches_pinned_cells_ignoring_case() {
        let view = sheet_view(&sheet(), &["id".to_string()], " MILK").unwrap();
        assert_eq!(view.rows, [0, 1]);
        let none = sheet_view(&sheet(), &["id".to_string()], "pcs").unwrap();
        assert!(none.rows.is_empty());
    }

    #[test]
    fn nothing_hidden_pins_the_first_column() {
        let view = sheet_view(&sheet(), &[], "2").unwrap();
        assert_eq!(view.pinned, 0);
        assert_eq!(view.rows, [1]);
    }

    #[test]
    fn all_columns_hidden() {
        let t = RawTable::new(vec!["id".to_string()], vec![vec!["1".to_string()]]).unwrap();
        assert_eq!(sheet_view(&t, &["id".to_string()], ""), None);
    }
}
