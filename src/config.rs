use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::model::Variant;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "TRENDSHEET_CONFIG";

const DEFAULT_GROUPING_COLUMN: &str = "Item";
const DEFAULT_FILL_LIMIT_DAYS: usize = 30;
const DEFAULT_MAX_CALENDAR_DAYS: usize = 731;
const DEFAULT_WARN_WINDOW_DAYS: i64 = 730;
const DEFAULT_SELECTION: usize = 2;
const DEFAULT_MAX_ROWS: usize = 100_000;

/// Settings that differ between the price and quantity sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantConfig {
    /// Preferred grouping column; the first identifier column is used when absent.
    pub grouping_column: String,
    #[serde(with = "sheet_date")]
    pub hard_floor: Option<NaiveDate>,
    #[serde(with = "sheet_date")]
    pub hard_ceiling: Option<NaiveDate>,
    pub fill_limit_days: usize,
    pub max_calendar_days: usize,
    pub warn_window_days: i64,
    /// How many items are pre-selected after a load.
    pub default_selection: usize,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            grouping_column: DEFAULT_GROUPING_COLUMN.to_string(),
            hard_floor: None,
            hard_ceiling: None,
            fill_limit_days: DEFAULT_FILL_LIMIT_DAYS,
            max_calendar_days: DEFAULT_MAX_CALENDAR_DAYS,
            warn_window_days: DEFAULT_WARN_WINDOW_DAYS,
            default_selection: DEFAULT_SELECTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub price: VariantConfig,
    pub quantity: VariantConfig,
    /// Columns removed before the sheet is classified.
    pub drop_columns: Vec<String>,
    pub max_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            price: VariantConfig::default(),
            quantity: VariantConfig {
                hard_floor: NaiveDate::from_ymd_opt(2022, 1, 1),
                hard_ceiling: NaiveDate::from_ymd_opt(2025, 12, 31),
                ..VariantConfig::default()
            },
            drop_columns: vec!["id".to_string()],
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl Config {
    pub fn for_variant(&self, variant: Variant) -> &VariantConfig {
        match variant {
            Variant::Price => &self.price,
            Variant::Quantity => &self.quantity,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load from `$TRENDSHEET_CONFIG`, or defaults when it is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}

/// `Option<NaiveDate>` as a `DD.MM.YYYY` string.
mod sheet_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::data::model::{format_date, DATE_FORMAT};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_some(&format_date(*d)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
