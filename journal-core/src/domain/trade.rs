//! TradeRecord — one journaled position, open or closed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a journaled position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

impl TradeStatus {
    /// Parse a status label, ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A single journal entry as captured by hand or imported from a broker CSV.
///
/// Most descriptive fields are free-form text: the journal never validates
/// quantities, timestamps or ratios. Prices and amounts are optional so that
/// "not recorded" stays distinguishable from zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    // ── Size & prices ──
    pub quantity: String,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,

    // ── Result ──
    /// Realized profit or loss. `None` means the trade has no result yet,
    /// which is not the same as a breakeven trade.
    pub pnl: Option<f64>,

    // ── Timing ──
    pub bought_time: String,
    pub sold_time: String,
    pub duration: String,

    // ── Setup ──
    pub bias: String,
    pub symbol: String,
    pub stop_price: Option<f64>,
    pub target_price: Option<f64>,
    pub entry_class: String,
    pub execution_model: String,
    pub variables_used: String,

    // ── Outcome ──
    pub outcome_percent: String,
    pub return_amount: Option<f64>,
    pub risk_amount: Option<f64>,
    pub risk_reward: String,

    pub status: Option<TradeStatus>,
}

impl TradeRecord {
    /// A record carrying only a realized P&L, everything else blank.
    pub fn with_pnl(pnl: f64) -> Self {
        Self {
            pnl: Some(pnl),
            ..Self::default()
        }
    }

    /// The P&L if it is usable for performance statistics.
    ///
    /// Missing and non-finite values are excluded from every computation.
    pub fn qualifying_pnl(&self) -> Option<f64> {
        self.pnl.filter(|p| p.is_finite())
    }

    pub fn is_winner(&self) -> bool {
        self.qualifying_pnl().is_some_and(|p| p > 0.0)
    }

    pub fn is_loser(&self) -> bool {
        self.qualifying_pnl().is_some_and(|p| p < 0.0)
    }

    pub fn is_open(&self) -> bool {
        self.status == Some(TradeStatus::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade() -> TradeRecord {
        TradeRecord {
            quantity: "2".into(),
            buy_price: Some(4510.25),
            sell_price: Some(4522.75),
            pnl: Some(1250.0),
            bought_time: "2024-03-04 09:31".into(),
            sold_time: "2024-03-04 09:58".into(),
            duration: "27m".into(),
            bias: "long".into(),
            symbol: "ES".into(),
            stop_price: Some(4500.0),
            target_price: Some(4530.0),
            entry_class: "A+".into(),
            execution_model: "opening drive".into(),
            variables_used: "VWAP, prior day high".into(),
            outcome_percent: "100%".into(),
            return_amount: Some(1250.0),
            risk_amount: Some(1025.0),
            risk_reward: "1:1.2".into(),
            status: Some(TradeStatus::Closed),
        }
    }

    #[test]
    fn missing_pnl_does_not_qualify() {
        let trade = TradeRecord::default();
        assert_eq!(trade.qualifying_pnl(), None);
        assert!(!trade.is_winner());
        assert!(!trade.is_loser());
    }

    #[test]
    fn nan_pnl_does_not_qualify() {
        assert_eq!(TradeRecord::with_pnl(f64::NAN).qualifying_pnl(), None);
        assert_eq!(TradeRecord::with_pnl(f64::INFINITY).qualifying_pnl(), None);
    }

    #[test]
    fn breakeven_is_neither_winner_nor_loser() {
        let trade = TradeRecord::with_pnl(0.0);
        assert_eq!(trade.qualifying_pnl(), Some(0.0));
        assert!(!trade.is_winner());
        assert!(!trade.is_loser());
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(TradeStatus::parse(" Open "), Some(TradeStatus::Open));
        assert_eq!(TradeStatus::parse("CLOSED"), Some(TradeStatus::Closed));
        assert_eq!(TradeStatus::parse("pending"), None);
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade();
        let json = serde_json::to_string(&trade).unwrap();
        assert!(json.contains("\"status\":\"closed\""));
        let deser: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
