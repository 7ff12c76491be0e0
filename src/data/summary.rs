use super::error::{ItemError, PipelineWarning};
use super::fill::{fill_series, FillOutcome, FillPolicy, FilledSeries};
use super::model::{format_date, DateWindow, Variant};
use super::reshape::Observations;
use super::stats::{compute, round1, SeriesStats};

/// Placeholder rendered for any missing value.
pub const MISSING: &str = "-";
pub const NO_DATA: &str = "no data";
pub const PROCESSING_ERROR: &str = "processing error";

#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Computed(SeriesStats),
    /// The item has no observations to work from.
    NoData,
    /// Processing this item failed; other items are unaffected.
    Failed(String),
}

/// Per-item result row, built fresh for every query.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub item: String,
    pub outcome: ItemOutcome,
}

impl ItemSummary {
    pub fn stats(&self) -> Option<&SeriesStats> {
        match &self.outcome {
            ItemOutcome::Computed(stats) => Some(stats),
            _ => None,
        }
    }
}

/// Everything the builder produced for one query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryBuild {
    /// One row per requested item, in request order.
    pub summaries: Vec<ItemSummary>,
    /// Filled series of the items that produced one, in request order.
    pub series: Vec<(String, FilledSeries)>,
    pub warnings: Vec<PipelineWarning>,
}

pub struct SummaryBuilder {
    pub variant: Variant,
    pub window: DateWindow,
    pub policy: FillPolicy,
}

impl SummaryBuilder {
    fn summarize(
        &self,
        observations: &[(chrono::NaiveDate, f64)],
    ) -> Result<Option<(SeriesStats, FilledSeries)>, ItemError> {
        match fill_series(observations, &self.window, &self.policy)? {
            FillOutcome::NoData => Ok(None),
            FillOutcome::Filled(series) => {
                let stats = compute(&series, self.variant)?;
                Ok(Some((stats, series)))
            }
        }
    }

    /// Summarize every requested item.
    ///
    /// Items missing from `observations` (or with an empty list) become
    /// [`ItemOutcome::NoData`]; a failure inside one item becomes
    /// [`ItemOutcome::Failed`] and the rest carry on.
    pub fn build(&self, requested: &[String], observations: &Observations) -> SummaryBuild {
        let mut out = SummaryBuild::default();
        for item in requested {
            let obs = observations.get(item).map(Vec::as_slice).unwrap_or_default();
            let outcome = if obs.is_empty() {
                ItemOutcome::NoData
            } else {
                match self.summarize(obs) {
                    Ok(Some((stats, series))) => {
                        out.series.push((item.clone(), series));
                        ItemOutcome::Computed(stats)
                    }
                    Ok(None) => ItemOutcome::NoData,
                    Err(e) => {
                        log::warn!("processing '{item}' failed: {e}");
                        out.warnings.push(PipelineWarning::ItemFailed {
                            item: item.clone(),
                            reason: e.to_string(),
                        });
                        ItemOutcome::Failed(e.to_string())
                    }
                }
            };
            out.summaries.push(ItemSummary {
                item: item.clone(),
                outcome,
            });
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Column headers in display order; quantities add a status column.
pub fn summary_headers(variant: Variant, grouping_column: &str) -> Vec<String> {
    let noun = variant.noun();
    let mut headers = vec![
        grouping_column.to_string(),
        format!("Initial {noun}"),
        format!("Final {noun}"),
        "Change, %".to_string(),
        format!("Mean {noun}"),
        format!("Max {noun}"),
        "Max date".to_string(),
    ];
    if variant == Variant::Quantity {
        headers.push("Status".to_string());
    }
    headers
}

/// One summary row rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub item: String,
    pub initial: String,
    pub final_value: String,
    pub percent_change: String,
    pub mean: String,
    pub max: String,
    pub max_date: String,
    pub status: Option<String>,
}

impl SummaryRow {
    /// Cells in the same order as [`summary_headers`].
    pub fn cells(&self) -> Vec<&str> {
        let mut cells = vec![
            self.item.as_str(),
            self.initial.as_str(),
            self.final_value.as_str(),
            self.percent_change.as_str(),
            self.mean.as_str(),
            self.max.as_str(),
            self.max_date.as_str(),
        ];
        if let Some(status) = &self.status {
            cells.push(status.as_str());
        }
        cells
    }
}

fn number(value: f64) -> String {
    format!("{value:.2}")
}

pub fn render_row(summary: &ItemSummary, variant: Variant) -> SummaryRow {
    // Only quantities carry a status column.
    let status_cell = |s: Option<String>| {
        (variant == Variant::Quantity).then(|| s.unwrap_or_else(|| MISSING.to_string()))
    };
    match &summary.outcome {
        ItemOutcome::Computed(stats) => SummaryRow {
            item: summary.item.clone(),
            initial: number(stats.initial),
            final_value: number(stats.final_value),
            percent_change: stats
                .percent_change
                .map_or_else(|| MISSING.to_string(), |p| format!("{:.1}%", round1(p))),
            mean: number(round1(stats.mean)),
            max: number(stats.max),
            max_date: stats
                .max_date
                .map_or_else(|| MISSING.to_string(), format_date),
            status: status_cell(stats.status.map(|s| s.to_string())),
        },
        ItemOutcome::NoData | ItemOutcome::Failed(_) => {
            let marker = if matches!(summary.outcome, ItemOutcome::NoData) {
                NO_DATA
            } else {
                PROCESSING_ERROR
            };
            SummaryRow {
                item: summary.item.clone(),
                initial: MISSING.to_string(),
                final_value: MISSING.to_string(),
                percent_change: MISSING.to_string(),
                mean: MISSING.to_string(),
                max: MISSING.to_string(),
                max_date: marker.to_string(),
                status: status_cell(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariantConfig;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn d(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn builder(variant: Variant) -> SummaryBuilder {
        SummaryBuilder {
            variant,
            window: DateWindow::new(d(1, 1, 2024), d(2, 1, 2024)).unwrap(),
            policy: FillPolicy::new(variant, &VariantConfig::default()),
        }
    }

    fn observations() -> Observations {
        let mut obs = HashMap::new();
        obs.insert("A".to_string(), vec![(d(1, 1, 2024), 10.0), (d(2, 1, 2024), 12.0)]);
        obs.insert(
            "Broken".to_string(),
            vec![(d(1, 1, 2024), 1.0), (d(1, 1, 2024), 2.0)],
        );
        obs.insert("Empty".to_string(), Vec::new());
        obs
    }

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn keeps_request_order_and_isolates_failures() {
        let build = builder(Variant::Price)
            .build(&items(&["Ghost", "Broken", "A", "Empty"]), &observations());
        let names: Vec<&str> = build.summaries.iter().map(|s| s.item.as_str()).collect();
        assert_eq!(names, ["Ghost", "Broken", "A", "Empty"]);

        assert_eq!(build.summaries[0].outcome, ItemOutcome::NoData);
        assert!(matches!(build.summaries[1].outcome, ItemOutcome::Failed(_)));
        assert!(build.summaries[2].stats().is_some());
        assert_eq!(build.summaries[3].outcome, ItemOutcome::NoData);

        assert_eq!(build.series.len(), 1);
        assert_eq!(build.series[0].0, "A");
        assert_eq!(build.warnings.len(), 1);
    }

    #[test]
    fn building_twice_is_identical() {
        let b = builder(Variant::Quantity);
        let req = items(&["A", "Broken", "Ghost"]);
        assert_eq!(b.build(&req, &observations()), b.build(&req, &observations()));
    }

    #[test]
    fn computed_row_rendering() {
        let build = builder(Variant::Price).build(&items(&["A"]), &observations());
        let row = render_row(&build.summaries[0], Variant::Price);
        assert_eq!(
            row.cells(),
            ["A", "10.00", "12.00", "20.0%", "11.00", "12.00", "02.01.2024"]
        );
    }

    #[test]
    fn missing_markers_stay_distinct() {
        let build =
            builder(Variant::Quantity).build(&items(&["Ghost", "Broken"]), &observations());
        let no_data = render_row(&build.summaries[0], Variant::Quantity);
        let failed = render_row(&build.summaries[1], Variant::Quantity);
        assert_eq!(no_data.initial, MISSING);
        assert_eq!(no_data.max_date, NO_DATA);
        assert_eq!(failed.max_date, PROCESSING_ERROR);
        assert_eq!(failed.status.as_deref(), Some(MISSING));
    }

    #[test]
    fn quantity_headers_add_status() {
        assert_eq!(summary_headers(Variant::Price, "Item").len(), 7);
        let headers = summary_headers(Variant::Quantity, "Product");
        assert_eq!(headers[0], "Product");
        assert_eq!(headers[1], "Initial quantity");
        assert_eq!(headers.last().map(String::as_str), Some("Status"));
    }

    #[test]
    fn quantity_row_shows_status() {
        let build = builder(Variant::Quantity).build(&items(&["A"]), &observations());
        let row = render_row(&build.summaries[0], Variant::Quantity);
        assert_eq!(row.status.as_deref(), Some("significant increase"));
        assert_eq!(row.cells().len(), 8);
    }
}
