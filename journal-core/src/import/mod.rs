//! CSV import normalizer: broker exports to trade records.
//!
//! The first line is always treated as the header. Every later line that is
//! not blank becomes exactly one [`TradeRecord`]. Lines are split on commas
//! with no quoting or escaping, so a field that itself contains a comma shifts
//! every later column of its row. Existing exporters rely on that behaviour.
//!
//! The default (lenient) mode never fails: numeric fields without a usable
//! number and missing columns become `0`, text fields become empty. Use
//! [`parse_csv_with_diagnostics`] to find out which fields were defaulted, or
//! [`strict::parse_csv_strict`] to reject malformed numbers outright.

pub mod columns;
pub mod numeric;
pub mod strict;

pub use columns::{Column, ColumnLayout, ColumnMapping, ALL_COLUMNS, POSITIONAL};
pub use strict::{parse_csv_strict, ImportError};

use crate::domain::{TradeRecord, TradeStatus};
use serde::{Deserialize, Serialize};

/// Options for a single import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    #[serde(default)]
    pub mapping: ColumnMapping,
}

impl ImportOptions {
    pub fn header_driven() -> Self {
        Self {
            mapping: ColumnMapping::HeaderDriven,
        }
    }
}

/// A numeric field the lenient importer replaced with `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// 1-based line number in the input, header included.
    pub line: usize,
    pub column: Column,
    /// The offending text; `None` when the row was too short to have the column.
    pub raw: Option<String>,
}

/// Records plus a note of every numeric field that was defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub records: Vec<TradeRecord>,
    pub issues: Vec<FieldIssue>,
    /// Input line of each record, parallel to `records`.
    pub record_lines: Vec<usize>,
}

impl ImportReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Issues for one input line.
    pub fn issues_on_line(&self, line: usize) -> impl Iterator<Item = &FieldIssue> {
        self.issues.iter().filter(move |issue| issue.line == line)
    }

    /// Whether the P&L of the record at `index` came from real text rather
    /// than the zero default.
    pub fn pnl_was_recorded(&self, index: usize) -> bool {
        let Some(line) = self.record_lines.get(index) else {
            return false;
        };
        !self
            .issues_on_line(*line)
            .any(|issue| issue.column == Column::Pnl)
    }
}

/// Parse with the positional column contract.
pub fn parse_csv(text: &str) -> Vec<TradeRecord> {
    parse_csv_with(text, &ImportOptions::default())
}

/// Parse with explicit options.
pub fn parse_csv_with(text: &str, options: &ImportOptions) -> Vec<TradeRecord> {
    parse_csv_with_diagnostics(text, options).records
}

/// Parse leniently and report every numeric field that was defaulted.
pub fn parse_csv_with_diagnostics(text: &str, options: &ImportOptions) -> ImportReport {
    let (header, body) = split_header(text);
    let layout = ColumnLayout::resolve(header, options.mapping);

    let mut report = ImportReport::default();
    for row in data_rows(body) {
        let record = lenient_record(&row, &layout, &mut report.issues);
        report.record_lines.push(row.line);
        report.records.push(record);
    }

    tracing::debug!(
        records = report.records.len(),
        defaulted_fields = report.issues.len(),
        "CSV import complete"
    );
    report
}

// ─── Row plumbing (shared with strict mode) ─────────────────────────

/// One data row with its 1-based line number in the original input.
pub(crate) struct Row<'a> {
    pub line: usize,
    pub fields: Vec<&'a str>,
}

impl Row<'_> {
    pub fn get(&self, layout: &ColumnLayout, column: Column) -> Option<&str> {
        layout
            .field_index(column)
            .and_then(|index| self.fields.get(index).copied())
    }
}

/// Split off the header line. Input without a newline is all header.
pub(crate) fn split_header(text: &str) -> (&str, &str) {
    match text.split_once('\n') {
        Some((header, body)) => (header.trim_end_matches('\r'), body),
        None => (text.trim_end_matches('\r'), ""),
    }
}

/// Non-blank rows of the body, split on bare commas. Quotes are not special.
pub(crate) fn data_rows(body: &str) -> impl Iterator<Item = Row<'_>> {
    body.split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| Row {
            // +1 for 1-based, +1 for the header
            line: i + 2,
            fields: line.trim_end_matches('\r').split(',').collect(),
        })
}

fn lenient_record(row: &Row, layout: &ColumnLayout, issues: &mut Vec<FieldIssue>) -> TradeRecord {
    let text = |column: Column| row.get(layout, column).unwrap_or_default().to_string();
    let mut number = |column: Column| -> Option<f64> {
        let raw = row.get(layout, column);
        match raw.and_then(numeric::parse_lenient) {
            Some(value) => Some(value),
            None => {
                issues.push(FieldIssue {
                    line: row.line,
                    column,
                    raw: raw.map(str::to_string),
                });
                Some(0.0)
            }
        }
    };

    TradeRecord {
        quantity: text(Column::Quantity),
        buy_price: number(Column::BuyPrice),
        sell_price: number(Column::SellPrice),
        pnl: number(Column::Pnl),
        bought_time: text(Column::BoughtTime),
        sold_time: text(Column::SoldTime),
        duration: text(Column::Duration),
        bias: text(Column::Bias),
        symbol: text(Column::Symbol),
        stop_price: number(Column::StopPrice),
        target_price: number(Column::TargetPrice),
        entry_class: text(Column::EntryClass),
        execution_model: text(Column::ExecutionModel),
        variables_used: text(Column::VariablesUsed),
        outcome_percent: text(Column::OutcomePercent),
        return_amount: number(Column::ReturnAmount),
        risk_amount: number(Column::RiskAmount),
        risk_reward: text(Column::RiskReward),
        status: row.get(layout, Column::Status).and_then(TradeStatus::parse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_only_yields_nothing() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("qty,buy,sell,pnl").is_empty());
        assert!(parse_csv("qty,buy,sell,pnl\n").is_empty());
        assert!(parse_csv("qty,buy,sell,pnl\n\n   \n").is_empty());
    }

    #[test]
    fn short_row_defaults_missing_columns() {
        let records = parse_csv("qty,buy,sell,pnl\n1,10,12,20\n");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.quantity, "1");
        assert_eq!(r.buy_price, Some(10.0));
        assert_eq!(r.sell_price, Some(12.0));
        assert_eq!(r.pnl, Some(20.0));
        assert_eq!(r.stop_price, Some(0.0));
        assert_eq!(r.symbol, "");
        assert_eq!(r.status, None);
    }

    #[test]
    fn unparsable_numbers_become_zero() {
        let records = parse_csv("h\n1,abc,,n/a\n");
        assert_eq!(records[0].buy_price, Some(0.0));
        assert_eq!(records[0].sell_price, Some(0.0));
        assert_eq!(records[0].pnl, Some(0.0));
    }

    #[test]
    fn embedded_comma_shifts_columns() {
        // "VWAP, PDH" splits in two, so every later column moves one to the right.
        let line = "1,10,12,20,09:30,09:45,15m,long,ES,9,14,A,ORB,VWAP, PDH,100%,20,10,1:2";
        let records = parse_csv(&format!("header\n{line}\n"));
        let r = &records[0];
        assert_eq!(r.variables_used, "VWAP");
        assert_eq!(r.outcome_percent, " PDH");
        assert_eq!(r.return_amount, Some(100.0));
        assert_eq!(r.risk_amount, Some(20.0));
        assert_eq!(r.risk_reward, "10");
    }

    #[test]
    fn crlf_line_endings() {
        let records = parse_csv("qty,buy,sell,pnl\r\n2,5,6,-3.5\r\n3,1,1,0\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pnl, Some(-3.5));
        assert_eq!(records[1].quantity, "3");
    }

    #[test]
    fn quotes_are_literal() {
        let records = parse_csv("h\n\"1,5\",7\n");
        assert_eq!(records[0].quantity, "\"1");
        // `5"` still has a numeric prefix
        assert_eq!(records[0].buy_price, Some(5.0));
        assert_eq!(records[0].sell_price, Some(7.0));
    }

    #[test]
    fn diagnostics_flag_defaulted_fields() {
        let report = parse_csv_with_diagnostics(
            "qty,buy,sell,pnl\n1,10,12,oops\n2,10,11,1\n",
            &ImportOptions::default(),
        );
        assert_eq!(report.records.len(), 2);
        let line2: Vec<_> = report.issues_on_line(2).collect();
        assert!(line2
            .iter()
            .any(|i| i.column == Column::Pnl && i.raw.as_deref() == Some("oops")));
        assert!(!report.pnl_was_recorded(0));
        assert!(report.pnl_was_recorded(1));
        // Short rows: every numeric column past `pnl` is missing.
        assert!(report
            .issues_on_line(3)
            .any(|i| i.column == Column::StopPrice && i.raw.is_none()));
    }

    #[test]
    fn header_driven_reorders_columns() {
        let text = "Symbol,P&L,Qty,Status\nNQ,-125.5,1,closed\nES,80,2,OPEN\n";
        let records = parse_csv_with(text, &ImportOptions::header_driven());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol, "NQ");
        assert_eq!(records[0].pnl, Some(-125.5));
        assert_eq!(records[0].quantity, "1");
        assert_eq!(records[0].status, Some(TradeStatus::Closed));
        assert_eq!(records[1].status, Some(TradeStatus::Open));
        // Columns absent from the header default like short rows do.
        assert_eq!(records[1].buy_price, Some(0.0));
    }

    #[test]
    fn header_driven_without_known_headers_is_positional() {
        let text = "a,b,c,d\n1,10,12,20\n";
        let positional = parse_csv(text);
        let header_driven = parse_csv_with(text, &ImportOptions::header_driven());
        assert_eq!(positional, header_driven);
    }
}
