//! Column identities and the two ways of locating them in a row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A trade-record field that can be read from an import file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Quantity,
    BuyPrice,
    SellPrice,
    Pnl,
    BoughtTime,
    SoldTime,
    Duration,
    Bias,
    Symbol,
    StopPrice,
    TargetPrice,
    EntryClass,
    ExecutionModel,
    VariablesUsed,
    OutcomePercent,
    ReturnAmount,
    RiskAmount,
    RiskReward,
    /// Only reachable through a named header; the positional layout has no status column.
    Status,
}

/// Fixed positional order used by broker exports.
pub const POSITIONAL: [Column; 18] = [
    Column::Quantity,
    Column::BuyPrice,
    Column::SellPrice,
    Column::Pnl,
    Column::BoughtTime,
    Column::SoldTime,
    Column::Duration,
    Column::Bias,
    Column::Symbol,
    Column::StopPrice,
    Column::TargetPrice,
    Column::EntryClass,
    Column::ExecutionModel,
    Column::VariablesUsed,
    Column::OutcomePercent,
    Column::ReturnAmount,
    Column::RiskAmount,
    Column::RiskReward,
];

/// Every importable column, positional ones first.
pub const ALL_COLUMNS: [Column; 19] = [
    Column::Quantity,
    Column::BuyPrice,
    Column::SellPrice,
    Column::Pnl,
    Column::BoughtTime,
    Column::SoldTime,
    Column::Duration,
    Column::Bias,
    Column::Symbol,
    Column::StopPrice,
    Column::TargetPrice,
    Column::EntryClass,
    Column::ExecutionModel,
    Column::VariablesUsed,
    Column::OutcomePercent,
    Column::ReturnAmount,
    Column::RiskAmount,
    Column::RiskReward,
    Column::Status,
];

impl Column {
    /// Canonical header name, as written by the exporter.
    pub fn name(self) -> &'static str {
        match self {
            Column::Quantity => "qty",
            Column::BuyPrice => "buy_price",
            Column::SellPrice => "sell_price",
            Column::Pnl => "pnl",
            Column::BoughtTime => "bought_time",
            Column::SoldTime => "sold_time",
            Column::Duration => "duration",
            Column::Bias => "bias",
            Column::Symbol => "commodity",
            Column::StopPrice => "stop_price",
            Column::TargetPrice => "target_price",
            Column::EntryClass => "entry_class",
            Column::ExecutionModel => "execution_model",
            Column::VariablesUsed => "variables_used",
            Column::OutcomePercent => "win_loss_percent",
            Column::ReturnAmount => "return_amount",
            Column::RiskAmount => "risk_amount",
            Column::RiskReward => "risk_reward",
            Column::Status => "status",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Column::BuyPrice
                | Column::SellPrice
                | Column::Pnl
                | Column::StopPrice
                | Column::TargetPrice
                | Column::ReturnAmount
                | Column::RiskAmount
        )
    }

    /// Resolve a header cell to a column. Case, spacing and punctuation are ignored.
    pub fn from_header(header: &str) -> Option<Column> {
        let key: String = header
            .trim()
            .trim_start_matches('\u{feff}')
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '&' || *c == '%')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let column = match key.as_str() {
            "qty" | "quantity" | "size" | "contracts" => Column::Quantity,
            "buy" | "buyprice" | "entry" | "entryprice" => Column::BuyPrice,
            "sell" | "sellprice" | "exit" | "exitprice" => Column::SellPrice,
            "pnl" | "p&l" | "profitloss" | "profit" => Column::Pnl,
            "boughttime" | "boughttimestamp" | "entrytime" | "opentime" => Column::BoughtTime,
            "soldtime" | "soldtimestamp" | "exittime" | "closetime" => Column::SoldTime,
            "duration" => Column::Duration,
            "bias" | "direction" | "side" => Column::Bias,
            "commodity" | "symbol" | "instrument" | "contract" => Column::Symbol,
            "stop" | "stopprice" | "stoploss" => Column::StopPrice,
            "target" | "targetprice" | "takeprofit" => Column::TargetPrice,
            "entryclass" => Column::EntryClass,
            "executionmodel" | "execution" => Column::ExecutionModel,
            "variablesused" | "variables" => Column::VariablesUsed,
            "winloss%" | "winlosspercent" | "outcome%" | "outcomepercent" => Column::OutcomePercent,
            "return" | "returnamount" => Column::ReturnAmount,
            "risk" | "riskamount" => Column::RiskAmount,
            "riskreward" | "rr" => Column::RiskReward,
            "status" => Column::Status,
            _ => return None,
        };
        Some(column)
    }

    fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How columns are located in a data row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnMapping {
    /// Fixed positional order, header line ignored. The compatibility contract
    /// existing exporters rely on.
    #[default]
    Positional,
    /// Columns are looked up by header name. Falls back to positional when no
    /// header cell is recognised.
    HeaderDriven,
}

/// Resolved field index for every column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    index: [Option<usize>; 19],
    header_width: usize,
}

impl ColumnLayout {
    pub fn positional(header_width: usize) -> Self {
        let mut index = [None; 19];
        for (i, column) in POSITIONAL.iter().enumerate() {
            index[column.ordinal()] = Some(i);
        }
        Self {
            index,
            header_width,
        }
    }

    /// Build a layout from header cells. Returns `None` when nothing matched.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut index = [None; 19];
        let mut width = 0;
        let mut matched = false;
        for (i, header) in headers.into_iter().enumerate() {
            width = i + 1;
            if let Some(column) = Column::from_header(header) {
                let slot = &mut index[column.ordinal()];
                if slot.is_none() {
                    *slot = Some(i);
                    matched = true;
                }
            }
        }
        matched.then_some(Self {
            index,
            header_width: width,
        })
    }

    /// Resolve the layout for a header line under the given mapping.
    pub fn resolve(header_line: &str, mapping: ColumnMapping) -> Self {
        let cells: Vec<&str> = header_line.split(',').collect();
        match mapping {
            ColumnMapping::Positional => Self::positional(cells.len()),
            ColumnMapping::HeaderDriven => match Self::from_headers(cells.iter().copied()) {
                Some(layout) => layout,
                None => {
                    tracing::warn!(
                        header = header_line,
                        "no recognised header names, falling back to positional columns"
                    );
                    Self::positional(cells.len())
                }
            },
        }
    }

    pub fn field_index(&self, column: Column) -> Option<usize> {
        self.index[column.ordinal()]
    }

    /// Number of cells in the header line.
    pub fn header_width(&self) -> usize {
        self.header_width
    }
}
