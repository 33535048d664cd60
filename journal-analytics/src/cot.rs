//! Commitments of Traders positioning.
//!
//! Maps futures symbols to CFTC contract codes, works out which weekly
//! report is current, and condenses a raw report row into the large
//! speculator / commercial positioning used by the COT prompt.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CotError {
    #[error("unsupported commodity: {0}")]
    UnsupportedCommodity(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("CFTC API returned HTTP {status} for report {report_date}")]
    Status { status: u16, report_date: NaiveDate },

    #[error("no COT data for {symbol} in the reports of {current} or {previous}")]
    NoData {
        symbol: String,
        current: NaiveDate,
        previous: NaiveDate,
    },
}

// ─── Commodity table ────────────────────────────────────────────────

/// A futures contract covered by the weekly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commodity {
    pub symbol: &'static str,
    pub name: &'static str,
    pub cftc_code: &'static str,
}

pub const COMMODITIES: [Commodity; 12] = [
    Commodity { symbol: "ES", name: "S&P 500 E-mini", cftc_code: "13874A" },
    Commodity { symbol: "NQ", name: "NASDAQ 100 E-mini", cftc_code: "20974P" },
    Commodity { symbol: "YM", name: "Dow Jones E-mini", cftc_code: "12460P" },
    Commodity { symbol: "RTY", name: "Russell 2000 E-mini", cftc_code: "23947A" },
    Commodity { symbol: "CL", name: "Crude Oil", cftc_code: "67651" },
    Commodity { symbol: "GC", name: "Gold", cftc_code: "88691" },
    Commodity { symbol: "SI", name: "Silver", cftc_code: "84691" },
    Commodity { symbol: "ZB", name: "Treasury Bonds", cftc_code: "20977" },
    Commodity { symbol: "ZN", name: "10-Year Notes", cftc_code: "43874A" },
    Commodity { symbol: "6E", name: "Euro FX", cftc_code: "99741" },
    Commodity { symbol: "6J", name: "Japanese Yen", cftc_code: "97741" },
    Commodity { symbol: "6B", name: "British Pound", cftc_code: "96742" },
];

impl Commodity {
    /// Case-insensitive symbol lookup.
    pub fn lookup(symbol: &str) -> Result<Commodity, CotError> {
        let wanted = symbol.trim();
        COMMODITIES
            .iter()
            .find(|c| c.symbol.eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| CotError::UnsupportedCommodity(symbol.to_string()))
    }
}

// ─── Report dates ───────────────────────────────────────────────────

/// The Tuesday whose report is treated as current on `today`.
///
/// Steps back `(weekday_from_sunday + 5) % 7` days: Tuesday maps to itself,
/// Monday to six days earlier.
pub fn report_date(today: NaiveDate) -> NaiveDate {
    let from_sunday = i64::from(today.weekday().num_days_from_sunday());
    today - Duration::days((from_sunday + 5) % 7)
}

/// One week before [`report_date`]; the fallback when the current report is unavailable.
pub fn previous_report_date(today: NaiveDate) -> NaiveDate {
    report_date(today) - Duration::days(7)
}

// ─── Raw report row ─────────────────────────────────────────────────

/// The fields of a report row that positioning needs.
///
/// The feed encodes counts as strings; missing or unreadable counts read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CotRow {
    #[serde(default)]
    pub report_date_as_yyyy_mm_dd: String,
    #[serde(default)]
    pub cftc_contract_market_code: String,
    #[serde(default, deserialize_with = "count")]
    pub noncommercial_positions_long_all: i64,
    #[serde(default, deserialize_with = "count")]
    pub noncommercial_positions_short_all: i64,
    #[serde(default, deserialize_with = "count")]
    pub change_in_noncommercial_long_all: i64,
    #[serde(default, deserialize_with = "count")]
    pub change_in_noncommercial_short_all: i64,
    #[serde(default, deserialize_with = "count")]
    pub commercial_positions_long_all: i64,
    #[serde(default, deserialize_with = "count")]
    pub commercial_positions_short_all: i64,
    #[serde(default, deserialize_with = "count")]
    pub open_interest_all: i64,
}

/// Accepts `"12345"`, `12345`, `12345.0` or `null`; anything else is 0.
/// Strings are read up to the first non-digit, so `"12.5"` is 12.
fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => leading_int(&s),
        _ => 0,
    })
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

// ─── Positioning summary ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Momentum {
    Improving,
    Deteriorating,
    Neutral,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::fmt::Display for Momentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeculativePositions {
    pub long: i64,
    pub short: i64,
    pub net: i64,
    pub change_long: i64,
    pub change_short: i64,
    pub net_change: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommercialPositions {
    pub long: i64,
    pub short: i64,
    pub net: i64,
}

/// Condensed positioning for one contract and report week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositioningSummary {
    pub commodity: String,
    pub symbol: String,
    pub report_date: String,
    pub speculative: SpeculativePositions,
    pub commercial: CommercialPositions,
    pub open_interest: i64,
    pub sentiment: Sentiment,
    pub momentum: Momentum,
}

impl PositioningSummary {
    pub fn from_row(commodity: &Commodity, row: &CotRow) -> Self {
        let long = row.noncommercial_positions_long_all;
        let short = row.noncommercial_positions_short_all;
        // Counts come from an untrusted feed; nets saturate instead of overflowing.
        let net = long.saturating_sub(short);
        let change_long = row.change_in_noncommercial_long_all;
        let change_short = row.change_in_noncommercial_short_all;
        let net_change = change_long.saturating_sub(change_short);

        let commercial_long = row.commercial_positions_long_all;
        let commercial_short = row.commercial_positions_short_all;

        Self {
            commodity: commodity.name.to_string(),
            symbol: commodity.symbol.to_string(),
            report_date: row.report_date_as_yyyy_mm_dd.clone(),
            speculative: SpeculativePositions {
                long,
                short,
                net,
                change_long,
                change_short,
                net_change,
            },
            commercial: CommercialPositions {
                long: commercial_long,
                short: commercial_short,
                net: commercial_long.saturating_sub(commercial_short),
            },
            open_interest: row.open_interest_all,
            sentiment: if net > 0 {
                Sentiment::Bullish
            } else {
                Sentiment::Bearish
            },
            momentum: match net_change {
                n if n > 0 => Momentum::Improving,
                n if n < 0 => Momentum::Deteriorating,
                _ => Momentum::Neutral,
            },
        }
    }
}
