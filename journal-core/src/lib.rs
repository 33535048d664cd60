//! Journal Core — trade records, daily discipline scores, CSV import.
//!
//! - Domain types (`TradeRecord`, `TradeStatus`, `DailyScore`, `DailyChecklist`)
//! - CSV import normalizer: lenient by default, with diagnostics and a strict mode
//! - Record fingerprints for deduplicating repeated imports

pub mod domain;
pub mod fingerprint;
pub mod import;

pub use domain::{DailyChecklist, DailyScore, TradeRecord, TradeStatus};
pub use fingerprint::{dedupe_records, record_fingerprint, RecordFingerprint};
pub use import::{
    parse_csv, parse_csv_strict, parse_csv_with, parse_csv_with_diagnostics, Column,
    ColumnMapping, FieldIssue, ImportError, ImportOptions, ImportReport,
};
