use std::collections::HashMap;

use chrono::NaiveDate;

use super::chart::ChartMatrix;
use super::error::{PipelineError, PipelineWarning, ReshapeError};
use super::fill::FillPolicy;
use super::filter::{available_items, default_selection, ItemSelection};
use super::model::{DateWindow, LongTable, RawTable, Variant};
use super::normalize::{normalize, NormalizeStats};
use super::range::RangeSelector;
use super::reshape::{dedup_keep_last, group_observations, melt, Observations};
use super::schema::classify;
use super::summary::{ItemSummary, SummaryBuilder};
use crate::config::Config;

/// What the user picked. `None` fields fall back to the defaults offered
/// after a load (full observed range, first few items).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub variant: Variant,
    pub window: Option<(NaiveDate, NaiveDate)>,
    pub items: Option<ItemSelection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub variant: Variant,
    pub grouping_column: String,
    pub window: DateWindow,
    /// Earliest and latest dates present in the sheet.
    pub observed: (NaiveDate, NaiveDate),
    pub available_items: Vec<String>,
    pub selected: ItemSelection,
    /// In-window records of the selected items, by item then date.
    pub long: LongTable,
    pub chart: ChartMatrix,
    pub summaries: Vec<ItemSummary>,
    pub warnings: Vec<PipelineWarning>,
    pub normalize: NormalizeStats,
}

/// Runs the whole reshaping and statistics pass for one query.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self, raw: &RawTable, query: &Query) -> Result<PipelineOutput, PipelineError> {
        let variant = query.variant;
        let cfg = self.config.for_variant(variant);
        let mut warnings = Vec::new();

        let table = raw.without_columns(&self.config.drop_columns);
        let partition = classify(table.columns()).require_dates()?;
        let grouping = partition.grouping_index(&cfg.grouping_column)?;
        let cells = melt(&table, &partition)?;
        let (mut long, normalize_stats) =
            normalize(cells, partition.identifiers.clone(), grouping, variant);

        let observed = long.observed_range();
        let selector = RangeSelector::from_config(cfg);
        let (start, end) = match query.window {
            Some(requested) => requested,
            None => {
                let w = selector.default_window(observed)?;
                (w.start(), w.end())
            }
        };
        let selection = selector.select(start, end, observed)?;
        let window = selection.window;
        warnings.extend(selection.warnings);

        // Taken before deduplication so items keep their sheet order.
        let available = available_items(&long);
        let observations = match group_observations(&long) {
            Ok(obs) => obs,
            Err(ReshapeError::DuplicateKeys { count }) => {
                log::warn!("{count} duplicate (item, date) keys; keeping the latest rows");
                let dropped = dedup_keep_last(&mut long);
                warnings.push(PipelineWarning::DuplicatesDropped { count: dropped });
                group_observations(&long)?
            }
            Err(e) => return Err(e.into()),
        };

        let selected = query
            .items
            .clone()
            .unwrap_or_else(|| default_selection(&available, cfg.default_selection));

        let pool = observation_pool(variant, &window, &selected, observations);
        let build = SummaryBuilder {
            variant,
            window,
            policy: FillPolicy::new(variant, cfg),
        }
        .build(&selected, &pool);
        warnings.extend(build.warnings);

        let chart = ChartMatrix::from_series(window.calendar(cfg.max_calendar_days), &build.series);
        let long = selected_records(long, &window, &selected);
        if long.records.is_empty() && !selected.is_empty() {
            warnings.push(PipelineWarning::NoDataInWindow);
        }

        log::info!(
            "{variant}: {} of {} items summarized over {window}",
            selected.len(),
            available.len()
        );

        Ok(PipelineOutput {
            variant,
            grouping_column: long.grouping_column().to_string(),
            window,
            // `select` succeeded, so at least one date was observed.
            observed: observed.unwrap_or((window.start(), window.end())),
            available_items: available,
            selected,
            long,
            chart,
            summaries: build.summaries,
            warnings,
            normalize: normalize_stats,
        })
    }
}

/// Observations each selected item is filled and averaged from.
///
/// Prices only count what falls inside the window; quantities draw on the
/// item's whole history.
fn observation_pool(
    variant: Variant,
    window: &DateWindow,
    selected: &[String],
    mut observations: Observations,
) -> Observations {
    let mut pool = HashMap::with_capacity(selected.len());
    for item in selected {
        let Some(mut obs) = observations.remove(item) else {
            continue;
        };
        if variant == Variant::Price {
            obs.retain(|(date, _)| window.contains(*date));
        }
        pool.insert(item.clone(), obs);
    }
    pool
}

fn selected_records(mut long: LongTable, window: &DateWindow, selected: &[String]) -> LongTable {
    let rank: HashMap<&str, usize> = selected
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();
    let g = long.grouping;
    long.records
        .retain(|r| window.contains(r.date) && rank.contains_key(r.ids[g].as_str()));
    long.records
        .sort_by_key(|r| (rank[r.ids[g].as_str()], r.date));
    long
}
