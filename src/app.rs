use eframe::egui;

use crate::config::Config;
use crate::state::{AppState, CentralView};
use crate::ui::{panels, plot, sheet, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TrendsheetApp {
    pub state: AppState,
}

impl TrendsheetApp {
    pub fn new(config: Config) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for TrendsheetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: window and items ----
        egui::SidePanel::left("query_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: summary table ----
        egui::TopBottomPanel::bottom("summary_panel")
            .resizable(true)
            .default_height(260.0)
            .show(ctx, |ui| {
                table::summary_table(ui, &self.state);
            });

        // ---- Central panel: chart or raw sheet ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                let view = &mut self.state.central_view;
                ui.selectable_value(view, CentralView::Chart, "Chart");
                ui.selectable_value(view, CentralView::Sheet, "Sheet");
            });
            ui.separator();
            match self.state.central_view {
                CentralView::Chart => plot::trend_plot(ui, &self.state),
                CentralView::Sheet => sheet::sheet_grid(ui, &mut self.state),
            }
        });
    }
}
