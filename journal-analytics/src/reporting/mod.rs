//! Summary rendering and export.

pub mod export;
pub mod summary;

pub use export::{metrics_to_json, trades_to_csv, trades_to_json};
pub use summary::{recommendations, render_summary};
