use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::data::chart::x_to_date;
use crate::data::model::format_date;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trend plot (central panel)
// ---------------------------------------------------------------------------

/// Render the filled series of the selected items, one line per item.
pub fn trend_plot(ui: &mut Ui, state: &AppState) {
    let output = match &state.output {
        Some(out) => out,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                if state.table.is_none() {
                    ui.heading("Open a sheet to view trends  (File → Open…)");
                } else {
                    ui.heading("Nothing to plot for this window");
                }
            });
            return;
        }
    };

    let chart = &output.chart;
    if chart.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No items selected");
        });
        return;
    }

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label(output.variant.noun())
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value).map(format_date).unwrap_or_default()
        })
        .label_formatter(|name, value| {
            let date = x_to_date(value.x).map(format_date).unwrap_or_default();
            if name.is_empty() {
                format!("{date}\n{:.2}", value.y)
            } else {
                format!("{name}\n{date}\n{:.2}", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, item) in chart.items.iter().enumerate() {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(item))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points = PlotPoints::from(chart.points(idx));
                let line = Line::new(points).name(item).color(color).width(1.5);

                plot_ui.line(line);
            }
        });
}
