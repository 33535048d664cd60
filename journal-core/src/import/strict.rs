//! Strict import: rejects what the lenient importer would silently zero.

use super::columns::{Column, ColumnLayout, ColumnMapping};
use super::{data_rows, numeric, split_header, ImportOptions, Row};
use crate::domain::{TradeRecord, TradeStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("line {line}: column '{column}' is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        column: Column,
        value: String,
    },

    #[error("line {line}: expected at most {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Parse, failing on the first malformed numeric field or overlong row.
///
/// Empty numeric fields and columns beyond the end of a short row are `None`
/// rather than `0`. A row wider than the header is an error, since under the
/// positional contract it usually means a stray comma shifted the columns.
pub fn parse_csv_strict(text: &str, options: &ImportOptions) -> Result<Vec<TradeRecord>, ImportError> {
    let (header, body) = split_header(text);
    let layout = ColumnLayout::resolve(header, options.mapping);
    let expected = match options.mapping {
        ColumnMapping::Positional => layout.header_width().max(super::POSITIONAL.len()),
        ColumnMapping::HeaderDriven => layout.header_width(),
    };

    let mut records = Vec::new();
    for row in data_rows(body) {
        if row.fields.len() > expected {
            return Err(ImportError::ColumnCount {
                line: row.line,
                expected,
                found: row.fields.len(),
            });
        }
        records.push(strict_record(&row, &layout)?);
    }

    tracing::debug!(records = records.len(), "strict CSV import complete");
    Ok(records)
}

fn strict_record(row: &Row, layout: &ColumnLayout) -> Result<TradeRecord, ImportError> {
    let text = |column: Column| row.get(layout, column).unwrap_or_default().to_string();
    let number = |column: Column| -> Result<Option<f64>, ImportError> {
        let Some(raw) = row.get(layout, column) else {
            return Ok(None);
        };
        numeric::parse_strict(raw).map_err(|()| ImportError::InvalidNumber {
            line: row.line,
            column,
            value: raw.to_string(),
        })
    };

    Ok(TradeRecord {
        quantity: text(Column::Quantity),
        buy_price: number(Column::BuyPrice)?,
        sell_price: number(Column::SellPrice)?,
        pnl: number(Column::Pnl)?,
        bought_time: text(Column::BoughtTime),
        sold_time: text(Column::SoldTime),
        duration: text(Column::Duration),
        bias: text(Column::Bias),
        symbol: text(Column::Symbol),
        stop_price: number(Column::StopPrice)?,
        target_price: number(Column::TargetPrice)?,
        entry_class: text(Column::EntryClass),
        execution_model: text(Column::ExecutionModel),
        variables_used: text(Column::VariablesUsed),
        outcome_percent: text(Column::OutcomePercent),
        return_amount: number(Column::ReturnAmount)?,
        risk_amount: number(Column::RiskAmount)?,
        risk_reward: text(Column::RiskReward),
        status: row.get(layout, Column::Status).and_then(TradeStatus::parse),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_rows_parse() {
        let records =
            parse_csv_strict("qty,buy,sell,pnl\n1,10,12,20\n2,5,4,-2.5\n", &ImportOptions::default())
                .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].pnl, Some(-2.5));
        // Absent, not zero.
        assert_eq!(records[0].stop_price, None);
    }

    #[test]
    fn empty_numeric_is_none() {
        let records = parse_csv_strict("h\n1,,12,\n", &ImportOptions::default()).unwrap();
        assert_eq!(records[0].buy_price, None);
        assert_eq!(records[0].sell_price, Some(12.0));
        assert_eq!(records[0].pnl, None);
    }

    #[test]
    fn reports_line_and_column_of_bad_number() {
        let err = parse_csv_strict("qty,buy,sell,pnl\n1,10,12,20\n\n1,10,12,12.5%\n", &ImportOptions::default())
            .unwrap_err();
        match err {
            ImportError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 4);
                assert_eq!(column, Column::Pnl);
                assert_eq!(value, "12.5%");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn overlong_row_is_rejected() {
        let header = "qty,buy,sell,pnl";
        let row = vec!["1"; 19].join(",");
        let err = parse_csv_strict(&format!("{header}\n{row}\n"), &ImportOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::ColumnCount {
                line: 2,
                expected: 18,
                found: 19
            }
        ));
    }

    #[test]
    fn header_driven_width_is_the_header() {
        let err = parse_csv_strict("symbol,pnl\nES,10,extra\n", &ImportOptions::header_driven()).unwrap_err();
        assert!(matches!(err, ImportError::ColumnCount { expected: 2, .. }));
    }

    #[test]
    fn error_message_names_the_column() {
        let err = parse_csv_strict("h\n1,abc\n", &ImportOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: column 'buy_price' is not a number: \"abc\""
        );
    }
}
