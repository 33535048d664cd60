//! Journal Analytics — performance metrics, summaries and the oracle-facing layer.
//!
//! This crate builds on `journal-core` to provide:
//! - Performance metrics over imported trades
//! - The plain-text performance summary, plus JSON and CSV export
//! - Reflection metrics over daily discipline scores
//! - COT positioning from the CFTC public reporting feed
//! - A week-ahead economic calendar with impact statistics
//! - Prompt templates and the text-oracle client
//! - TOML configuration

pub mod cftc;
pub mod config;
pub mod cot;
pub mod economic_calendar;
pub mod metrics;
pub mod oracle;
pub mod prompts;
pub mod reflection;
pub mod reporting;

pub use cftc::CftcClient;
pub use config::{ConfigError, CotConfig, ImportConfig, JournalConfig, LoggingConfig, OracleConfig};
pub use cot::{Commodity, CotError, CotRow, Momentum, PositioningSummary, Sentiment, COMMODITIES};
pub use economic_calendar::{fixture_calendar, CalendarEvent, CalendarStatistics, Impact, RiskLevel};
pub use metrics::{compute_metrics, PerformanceMetrics};
pub use oracle::{GeminiClient, InlineImage, OracleError, TextOracle};
pub use prompts::{PromptContext, ReflectionAction};
pub use reflection::ReflectionMetrics;
pub use reporting::{metrics_to_json, recommendations, render_summary, trades_to_csv, trades_to_json};
