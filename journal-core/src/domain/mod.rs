//! Domain types for the trade journal

pub mod daily_score;
pub mod trade;

pub use daily_score::{DailyChecklist, DailyScore, STANDARD_ITEMS};
pub use trade::{TradeRecord, TradeStatus};
