use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::filter::{retain_available, select_all, toggle, ItemSelection};
use crate::data::model::{RawTable, Variant};
use crate::data::pipeline::{Pipeline, PipelineOutput, Query};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CentralView {
    #[default]
    Chart,
    Sheet,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pipeline: Pipeline,

    /// Loaded sheet (None until user loads a file).
    pub table: Option<RawTable>,

    /// File name shown in the top bar.
    pub source: Option<String>,

    pub variant: Variant,

    /// Date picker values; applied with [`AppState::set_window`].
    pub start: NaiveDate,
    pub end: NaiveDate,

    pub selected: ItemSelection,

    /// Items of the last successful run, kept when a later run fails.
    pub available: Vec<String>,

    /// Result of the last run; None when it failed.
    pub output: Option<PipelineOutput>,

    pub color_map: Option<ColorMap>,

    pub central_view: CentralView,

    /// Text filter on the pinned column of the sheet grid.
    pub sheet_filter: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            pipeline: Pipeline::new(config),
            table: None,
            source: None,
            variant: Variant::default(),
            start: today,
            end: today,
            selected: Vec::new(),
            available: Vec::new(),
            output: None,
            color_map: None,
            central_view: CentralView::default(),
            sheet_filter: String::new(),
            status_message: None,
        }
    }

    pub fn config(&self) -> &Config {
        self.pipeline.config()
    }

    /// Ingest a newly loaded sheet and run it with the default query.
    pub fn set_table(&mut self, table: RawTable, source: String) {
        self.table = Some(table);
        self.source = Some(source);
        self.sheet_filter.clear();
        self.reset_query();
    }

    pub fn set_variant(&mut self, variant: Variant) {
        if variant != self.variant {
            self.variant = variant;
            self.reset_query();
        }
    }

    /// Apply the date pickers.
    pub fn set_window(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start = start;
        self.end = end;
        self.recompute();
    }

    pub fn toggle_item(&mut self, item: &str) {
        toggle(&mut self.selected, item);
        self.recompute();
    }

    pub fn select_all(&mut self) {
        self.selected = select_all(&self.available);
        self.recompute();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
        self.recompute();
    }

    /// Re-run with the default window and selection for the current variant.
    fn reset_query(&mut self) {
        self.run(Query {
            variant: self.variant,
            window: None,
            items: None,
        });
        if let Some(out) = &self.output {
            self.start = out.window.start();
            self.end = out.window.end();
            self.selected = out.selected.clone();
        }
    }

    /// Re-run with the current pickers and selection.
    pub fn recompute(&mut self) {
        retain_available(&mut self.selected, &self.available);
        self.run(Query {
            variant: self.variant,
            window: Some((self.start, self.end)),
            items: Some(self.selected.clone()),
        });
    }

    fn run(&mut self, query: Query) {
        let Some(table) = &self.table else {
            return;
        };
        match self.pipeline.run(table, &query) {
            Ok(out) => {
                if out.available_items != self.available {
                    self.color_map = Some(ColorMap::new(&out.available_items));
                    self.available = out.available_items.clone();
                }
                self.status_message = None;
                self.output = Some(out);
            }
            Err(e) => {
                log::warn!("pipeline stopped ({}): {e}", e.reason_code());
                self.status_message = Some(format!("{e}"));
                self.output = None;
            }
        }
    }
}
