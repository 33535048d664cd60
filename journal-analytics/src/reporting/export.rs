//! JSON and CSV export of trades and metrics.

use anyhow::{Context, Result};
use journal_core::import::{Column, ALL_COLUMNS};
use journal_core::TradeRecord;

use crate::metrics::PerformanceMetrics;

// ─── JSON export ────────────────────────────────────────────────────

/// Pretty JSON in the dashboard's camelCase field names.
pub fn metrics_to_json(metrics: &PerformanceMetrics) -> Result<String> {
    serde_json::to_string_pretty(metrics).context("failed to serialize metrics to JSON")
}

pub fn trades_to_json(trades: &[TradeRecord]) -> Result<String> {
    serde_json::to_string_pretty(trades).context("failed to serialize trades to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export trades in the positional import order, plus a trailing `status`.
///
/// Missing numbers are written as empty cells. The output is never quoted, so
/// it re-imports through [`journal_core::parse_csv_strict`] to equal records
/// as long as no text field contains a comma or a line break.
pub fn trades_to_csv(trades: &[TradeRecord]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(vec![]);

    wtr.write_record(ALL_COLUMNS.iter().map(|c| c.name()))?;

    for t in trades {
        if breaks_row(t) {
            tracing::warn!(
                symbol = %t.symbol,
                "text field contains a comma or line break; exported row will not re-import cleanly"
            );
        }
        wtr.write_record(ALL_COLUMNS.iter().map(|&c| cell(t, c)))?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn cell(t: &TradeRecord, column: Column) -> String {
    match column {
        Column::Quantity => t.quantity.clone(),
        Column::BuyPrice => number(t.buy_price),
        Column::SellPrice => number(t.sell_price),
        Column::Pnl => number(t.pnl),
        Column::BoughtTime => t.bought_time.clone(),
        Column::SoldTime => t.sold_time.clone(),
        Column::Duration => t.duration.clone(),
        Column::Bias => t.bias.clone(),
        Column::Symbol => t.symbol.clone(),
        Column::StopPrice => number(t.stop_price),
        Column::TargetPrice => number(t.target_price),
        Column::EntryClass => t.entry_class.clone(),
        Column::ExecutionModel => t.execution_model.clone(),
        Column::VariablesUsed => t.variables_used.clone(),
        Column::OutcomePercent => t.outcome_percent.clone(),
        Column::ReturnAmount => number(t.return_amount),
        Column::RiskAmount => number(t.risk_amount),
        Column::RiskReward => t.risk_reward.clone(),
        Column::Status => t.status.map(|s| s.to_string()).unwrap_or_default(),
    }
}

/// Whether a text field would split the unquoted row.
fn breaks_row(t: &TradeRecord) -> bool {
    text_fields(t).any(|s| s.contains([',', '\n', '\r']))
}

fn text_fields(t: &TradeRecord) -> impl Iterator<Item = &str> {
    [
        &t.quantity,
        &t.bought_time,
        &t.sold_time,
        &t.duration,
        &t.bias,
        &t.symbol,
        &t.entry_class,
        &t.execution_model,
        &t.variables_used,
        &t.outcome_percent,
        &t.risk_reward,
    ]
    .into_iter()
    .map(String::as_str)
}
