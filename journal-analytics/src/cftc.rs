//! CFTC Public Reporting client.
//!
//! Fetches the weekly legacy futures-only COT row for one contract. When the
//! current report is not published yet (HTTP failure or an empty result) the
//! previous week's report is tried once.

use chrono::NaiveDate;
use std::time::Duration;

use crate::config::CotConfig;
use crate::cot::{previous_report_date, report_date, Commodity, CotError, CotRow, PositioningSummary};

pub struct CftcClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl CftcClient {
    pub fn new(config: &CotConfig) -> Result<Self, CotError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Query URL for one contract and report date.
    fn report_url(&self, commodity: &Commodity, date: NaiveDate) -> String {
        format!(
            "{}?cftc_contract_market_code={}&report_date_as_yyyy_mm_dd={}",
            self.base_url,
            commodity.cftc_code,
            date.format("%Y-%m-%d")
        )
    }

    fn fetch_week(&self, commodity: &Commodity, date: NaiveDate) -> Result<Vec<CotRow>, CotError> {
        let resp = self.client.get(self.report_url(commodity, date)).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CotError::Status {
                status: status.as_u16(),
                report_date: date,
            });
        }
        Ok(resp.json()?)
    }

    /// Latest available row for `commodity`, relative to `today`.
    pub fn fetch_latest(&self, commodity: &Commodity, today: NaiveDate) -> Result<CotRow, CotError> {
        let current = report_date(today);
        let previous = previous_report_date(today);
        tracing::info!(symbol = commodity.symbol, report_date = %current, "fetching COT report");

        match self.fetch_week(commodity, current) {
            Ok(rows) if !rows.is_empty() => return first_row(rows, commodity, current, previous),
            Ok(_) => {
                tracing::warn!(symbol = commodity.symbol, report_date = %current, "report empty, trying previous week");
            }
            Err(e) => {
                tracing::warn!(symbol = commodity.symbol, report_date = %current, error = %e, "report unavailable, trying previous week");
            }
        }

        let rows = self.fetch_week(commodity, previous)?;
        first_row(rows, commodity, current, previous)
    }

    /// Fetch and condense in one step.
    pub fn positioning(&self, commodity: &Commodity, today: NaiveDate) -> Result<PositioningSummary, CotError> {
        let row = self.fetch_latest(commodity, today)?;
        Ok(PositioningSummary::from_row(commodity, &row))
    }
}

fn first_row(
    rows: Vec<CotRow>,
    commodity: &Commodity,
    current: NaiveDate,
    previous: NaiveDate,
) -> Result<CotRow, CotError> {
    rows.into_iter().next().ok_or_else(|| CotError::NoData {
        symbol: commodity.symbol.to_string(),
        current,
        previous,
    })
}
