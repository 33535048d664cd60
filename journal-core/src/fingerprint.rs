//! Record fingerprints, for spotting the same trade imported twice.

use crate::domain::TradeRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// blake3 hex digest of a record's canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordFingerprint(pub String);

impl fmt::Display for RecordFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fingerprint every field of a record.
///
/// `json!` objects keep their keys sorted, so the canonical string does not
/// depend on field order. Non-finite numbers serialize as `null` and therefore
/// collide with missing ones.
pub fn record_fingerprint(record: &TradeRecord) -> RecordFingerprint {
    use serde_json::json;

    let canonical = json!({
        "quantity": record.quantity,
        "buy_price": record.buy_price,
        "sell_price": record.sell_price,
        "pnl": record.pnl,
        "bought_time": record.bought_time,
        "sold_time": record.sold_time,
        "duration": record.duration,
        "bias": record.bias,
        "symbol": record.symbol,
        "stop_price": record.stop_price,
        "target_price": record.target_price,
        "entry_class": record.entry_class,
        "execution_model": record.execution_model,
        "variables_used": record.variables_used,
        "outcome_percent": record.outcome_percent,
        "return_amount": record.return_amount,
        "risk_amount": record.risk_amount,
        "risk_reward": record.risk_reward,
        "status": record.status.map(|s| s.to_string()),
    });

    let hash = blake3::hash(canonical.to_string().as_bytes());
    RecordFingerprint(hash.to_hex().to_string())
}

/// Drop records whose fingerprint was already seen, keeping first occurrences
/// in their original order.
pub fn dedupe_records(records: Vec<TradeRecord>) -> Vec<TradeRecord> {
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: Vec<TradeRecord> = records
        .into_iter()
        .filter(|r| seen.insert(record_fingerprint(r)))
        .collect();

    if kept.len() < before {
        tracing::info!(
            removed = before - kept.len(),
            kept = kept.len(),
            "dropped duplicate trade records"
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeStatus;

    fn trade(symbol: &str, pnl: f64) -> TradeRecord {
        TradeRecord {
            symbol: symbol.into(),
            quantity: "1".into(),
            ..TradeRecord::with_pnl(pnl)
        }
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let t = trade("ES", 125.0);
        assert_eq!(record_fingerprint(&t), record_fingerprint(&t.clone()));
        assert_eq!(record_fingerprint(&t).0.len(), 64);
    }

    #[test]
    fn any_field_changes_the_fingerprint() {
        let base = trade("ES", 125.0);
        let mut other = base.clone();
        other.bias = "short".into();
        assert_ne!(record_fingerprint(&base), record_fingerprint(&other));

        let mut closed = base.clone();
        closed.status = Some(TradeStatus::Closed);
        assert_ne!(record_fingerprint(&base), record_fingerprint(&closed));
    }

    #[test]
    fn missing_and_zero_differ() {
        let mut missing = trade("NQ", 0.0);
        missing.stop_price = None;
        let mut zero = missing.clone();
        zero.stop_price = Some(0.0);
        assert_ne!(record_fingerprint(&missing), record_fingerprint(&zero));
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        let records = vec![
            trade("ES", 10.0),
            trade("NQ", -5.0),
            trade("ES", 10.0),
            trade("CL", 3.0),
            trade("NQ", -5.0),
        ];
        let kept = dedupe_records(records);
        let symbols: Vec<&str> = kept.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["ES", "NQ", "CL"]);
    }

    #[test]
    fn dedupe_of_distinct_records_is_identity() {
        let records = vec![trade("ES", 1.0), trade("ES", 2.0)];
        assert_eq!(dedupe_records(records.clone()), records);
    }
}
