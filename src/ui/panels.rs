use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::{format_date, Variant, DATE_FORMAT};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – window and item selection
// ---------------------------------------------------------------------------

/// Render the left query panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.variant.to_string());
    ui.separator();

    if state.table.is_none() {
        ui.label("No sheet loaded.");
        return;
    }

    // ---- Date window ----
    ui.strong("Window");
    let mut start = state.start;
    let mut end = state.end;
    let mut window_changed = false;
    egui::Grid::new("window_grid")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            window_changed |= ui
                .add(
                    DatePickerButton::new(&mut start)
                        .id_salt("window_start")
                        .format(DATE_FORMAT),
                )
                .changed();
            ui.end_row();

            ui.label("To");
            window_changed |= ui
                .add(
                    DatePickerButton::new(&mut end)
                        .id_salt("window_end")
                        .format(DATE_FORMAT),
                )
                .changed();
            ui.end_row();
        });
    if let Some(out) = &state.output {
        let (first, last) = out.observed;
        ui.small(format!("Data available {} – {}", format_date(first), format_date(last)));
    }
    if window_changed {
        state.set_window(start, end);
    }
    ui.separator();

    // ---- Items ----
    let header_text = format!(
        "{}  ({}/{})",
        state.output.as_ref().map_or("Items", |o| o.grouping_column.as_str()),
        state.selected.len(),
        state.available.len()
    );
    ui.strong(header_text);
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let mut toggled: Option<String> = None;
    ScrollArea::vertical()
        .id_salt("item_list")
        .max_height(ui.available_height() * 0.6)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for item in &state.available {
                let mut text = RichText::new(item);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(item));
                }
                let mut checked = state.selected.contains(item);
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(item.clone());
                }
            }
        });
    // Mutate after the loop; the list above borrows state.
    if let Some(item) = toggled {
        state.toggle_item(&item);
    }

    // ---- Warnings ----
    let Some(out) = &state.output else {
        return;
    };
    if out.warnings.is_empty() {
        return;
    }
    ui.separator();
    ui.strong(format!("Warnings ({})", out.warnings.len()));
    ScrollArea::vertical()
        .id_salt("warning_list")
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for warning in &out.warnings {
                ui.label(RichText::new(warning.to_string()).color(Color32::YELLOW));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for variant in Variant::ALL {
            if ui
                .selectable_label(state.variant == variant, variant.to_string())
                .clicked()
            {
                state.set_variant(variant);
            }
        }

        ui.separator();

        if let (Some(source), Some(table)) = (&state.source, &state.table) {
            ui.label(format!("{source}: {} rows", table.len()));
        }
        if let Some(out) = &state.output {
            let stats = &out.normalize;
            ui.label(format!(
                "{} observations, {} unreadable values",
                out.long.records.len(),
                stats.dropped_values + stats.zero_filled
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sheet")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path, state.config().max_rows) {
            Ok(table) => {
                let source = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                state.set_table(table, source);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
