//! Data layer: loading, reshaping, gap filling and statistics.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → RawTable (wide, text cells)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────────────┐
//!   │ schema → reshape → normalize │  date columns, melt, clean numbers
//!   └──────────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  range    │  effective DateWindow, warnings, calendar cap
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────────────────┐
//!   │ fill → stats → summary  │  per item, errors isolated per item
//!   └────────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  chart    │  items × dates matrix for plotting
//!   └──────────┘
//! ```
//!
//! [`pipeline::Pipeline`] runs the whole chain for one query.

pub mod chart;
pub mod error;
pub mod fill;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod range;
pub mod reshape;
pub mod schema;
pub mod stats;
pub mod summary;
