use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::change_color;
use crate::data::model::format_date;
use crate::data::summary::{render_row, summary_headers};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Summary table (bottom panel)
// ---------------------------------------------------------------------------

/// Index of the percent-change cell in a rendered row.
const PERCENT_COLUMN: usize = 3;

/// Render one row per selected item, headed by the effective window.
pub fn summary_table(ui: &mut Ui, state: &AppState) {
    let Some(output) = &state.output else {
        ui.label("No summary available.");
        return;
    };

    ui.heading(format!(
        "Changes from {} to {}",
        format_date(output.window.start()),
        format_date(output.window.end())
    ));

    if output.summaries.is_empty() {
        ui.label("No items selected.");
        return;
    }

    let headers = summary_headers(output.variant, &output.grouping_column);
    let rows: Vec<_> = output
        .summaries
        .iter()
        .map(|s| {
            let percent = s.stats().and_then(|st| st.percent_change);
            (render_row(s, output.variant), percent)
        })
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::initial(160.0).resizable(true))
        .columns(Column::initial(110.0).resizable(true), headers.len() - 1)
        .header(20.0, |mut header| {
            for title in &headers {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (row, percent) in &rows {
                body.row(18.0, |mut table_row| {
                    for (i, cell) in row.cells().into_iter().enumerate() {
                        table_row.col(|ui| {
                            let mut text = RichText::new(cell);
                            if i == PERCENT_COLUMN {
                                let (color, bold) = change_color(output.variant, *percent);
                                if let Some(c) = color {
                                    text = text.color(c);
                                }
                                if bold {
                                    text = text.strong();
                                }
                            }
                            ui.label(text);
                        });
                    }
                });
            }
        });
}
