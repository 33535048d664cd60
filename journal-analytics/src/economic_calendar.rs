//! Week-ahead economic calendar.
//!
//! There is no live calendar feed yet: [`fixture_calendar`] lays a fixed set
//! of USD, EUR and GBP releases over the six days after `today`. Statistics
//! and prompts only see `&[CalendarEvent]`, so a real feed can replace the
//! fixture without touching them.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Expected market impact of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// 3 for high, 2 for medium, 1 for low.
    pub fn strength(self) -> u8 {
        match self {
            Impact::High => 3,
            Impact::Medium => 2,
            Impact::Low => 1,
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One scheduled release, dated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    /// Local release time, `HH:MM`.
    pub time: &'static str,
    pub currency: &'static str,
    pub event: &'static str,
    pub impact: Impact,
    pub forecast: &'static str,
    pub previous: &'static str,
    pub actual: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub event_id: &'static str,
    pub datetime: String,
    pub week_day: String,
    pub strength: u8,
    pub volatility_expected: Impact,
}

struct Scheduled {
    days_ahead: i64,
    time: &'static str,
    currency: &'static str,
    event: &'static str,
    impact: Impact,
    forecast: &'static str,
    previous: &'static str,
    category: &'static str,
    description: &'static str,
    event_id: &'static str,
}

const SCHEDULE: [Scheduled; 13] = [
    Scheduled {
        days_ahead: 1,
        time: "08:30",
        currency: "USD",
        event: "Core Retail Sales (MoM)",
        impact: Impact::High,
        forecast: "0.3%",
        previous: "0.4%",
        category: "Consumer Spending",
        description: "Measures change in the total value of sales at the retail level, excluding automobiles",
        event_id: "USD_CORE_RETAIL_SALES_001",
    },
    Scheduled {
        days_ahead: 1,
        time: "10:00",
        currency: "USD",
        event: "Business Inventories (MoM)",
        impact: Impact::Medium,
        forecast: "0.2%",
        previous: "0.1%",
        category: "Economic Activity",
        description: "Change in the total value of inventories held by manufacturers, wholesalers and retailers",
        event_id: "USD_BUSINESS_INVENTORIES_001",
    },
    Scheduled {
        days_ahead: 2,
        time: "14:00",
        currency: "USD",
        event: "FOMC Meeting Minutes",
        impact: Impact::High,
        forecast: "",
        previous: "",
        category: "Central Banking",
        description: "Detailed record of the FOMC policy-setting meeting, including vote tallies",
        event_id: "USD_FOMC_MINUTES_001",
    },
    Scheduled {
        days_ahead: 3,
        time: "08:30",
        currency: "USD",
        event: "Initial Jobless Claims",
        impact: Impact::Medium,
        forecast: "225K",
        previous: "231K",
        category: "Employment",
        description: "Number of individuals filing for unemployment insurance for the first time",
        event_id: "USD_INITIAL_JOBLESS_CLAIMS_001",
    },
    Scheduled {
        days_ahead: 3,
        time: "10:00",
        currency: "USD",
        event: "Existing Home Sales",
        impact: Impact::Medium,
        forecast: "4.10M",
        previous: "4.02M",
        category: "Housing",
        description: "Annualized number of existing residential buildings sold during the previous month",
        event_id: "USD_EXISTING_HOME_SALES_001",
    },
    Scheduled {
        days_ahead: 4,
        time: "08:30",
        currency: "USD",
        event: "Flash Manufacturing PMI",
        impact: Impact::High,
        forecast: "49.2",
        previous: "48.5",
        category: "Manufacturing",
        description: "Leading indicator of economic health - businesses react quickly to market conditions",
        event_id: "USD_FLASH_MANUFACTURING_PMI_001",
    },
    Scheduled {
        days_ahead: 4,
        time: "08:30",
        currency: "USD",
        event: "Flash Services PMI",
        impact: Impact::High,
        forecast: "55.1",
        previous: "54.8",
        category: "Services",
        description: "Leading indicator of economic health - services sector activity",
        event_id: "USD_FLASH_SERVICES_PMI_001",
    },
    Scheduled {
        days_ahead: 5,
        time: "08:30",
        currency: "USD",
        event: "Durable Goods Orders (MoM)",
        impact: Impact::Medium,
        forecast: "1.2%",
        previous: "0.8%",
        category: "Manufacturing",
        description: "Change in the total value of orders for manufactured durable goods",
        event_id: "USD_DURABLE_GOODS_ORDERS_001",
    },
    Scheduled {
        days_ahead: 6,
        time: "10:00",
        currency: "USD",
        event: "New Home Sales",
        impact: Impact::Medium,
        forecast: "685K",
        previous: "662K",
        category: "Housing",
        description: "Annualized number of new single-family homes sold during the previous month",
        event_id: "USD_NEW_HOME_SALES_001",
    },
    Scheduled {
        days_ahead: 2,
        time: "09:00",
        currency: "EUR",
        event: "ECB President Lagarde Speaks",
        impact: Impact::High,
        forecast: "",
        previous: "",
        category: "Central Banking",
        description: "ECB President speech can provide insights into future monetary policy",
        event_id: "EUR_ECB_LAGARDE_SPEECH_001",
    },
    Scheduled {
        days_ahead: 3,
        time: "10:00",
        currency: "EUR",
        event: "Flash Manufacturing PMI",
        impact: Impact::High,
        forecast: "45.8",
        previous: "45.2",
        category: "Manufacturing",
        description: "Leading indicator of economic health in the Eurozone manufacturing sector",
        event_id: "EUR_FLASH_MANUFACTURING_PMI_001",
    },
    Scheduled {
        days_ahead: 1,
        time: "07:00",
        currency: "GBP",
        event: "CPI (YoY)",
        impact: Impact::High,
        forecast: "2.1%",
        previous: "2.3%",
        category: "Inflation",
        description: "Consumer Price Index measures changes in the price level of consumer goods and services",
        event_id: "GBP_CPI_YOY_001",
    },
    Scheduled {
        days_ahead: 4,
        time: "09:30",
        currency: "GBP",
        event: "BOE Governor Bailey Speaks",
        impact: Impact::High,
        forecast: "",
        previous: "",
        category: "Central Banking",
        description: "Bank of England Governor speech on monetary policy and economic outlook",
        event_id: "GBP_BOE_BAILEY_SPEECH_001",
    },
];

/// The fixture week after `today`, in chronological order.
pub fn fixture_calendar(today: NaiveDate) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = SCHEDULE
        .iter()
        .map(|s| {
            let date = today + Duration::days(s.days_ahead);
            CalendarEvent {
                date,
                time: s.time,
                currency: s.currency,
                event: s.event,
                impact: s.impact,
                forecast: s.forecast,
                previous: s.previous,
                actual: "",
                category: s.category,
                description: s.description,
                event_id: s.event_id,
                datetime: format!("{} {}:00", date.format("%Y-%m-%d"), s.time),
                week_day: date.format("%A").to_string(),
                strength: s.impact.strength(),
                volatility_expected: s.impact,
            }
        })
        .collect();
    events.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
    events
}

// ─── Statistics ─────────────────────────────────────────────────────

/// Alert level for the week, from the number of high-impact releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Critical,
    High,
    Moderate,
}

impl RiskLevel {
    /// Critical at 5 or more high-impact events, High at 3 or more.
    pub fn from_high_impact(count: usize) -> Self {
        match count {
            n if n >= 5 => RiskLevel::Critical,
            n if n >= 3 => RiskLevel::High,
            _ => RiskLevel::Moderate,
        }
    }

    /// Volatility expectation paired with the alert level.
    pub fn volatility(self) -> &'static str {
        match self {
            RiskLevel::Critical => "EXTREME",
            RiskLevel::High => "HIGH",
            RiskLevel::Moderate => "MODERATE",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::High => "HIGH",
            RiskLevel::Moderate => "MODERATE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarStatistics {
    pub high_impact_events: usize,
    pub medium_impact_events: usize,
    pub low_impact_events: usize,
    pub total_events: usize,
    /// The date with the most high-impact releases; earliest on a tie.
    pub most_volatile_day: Option<NaiveDate>,
    /// Currencies in order of first appearance.
    pub primary_currencies: Vec<&'static str>,
    pub week_risk_level: RiskLevel,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
}

impl CalendarStatistics {
    pub fn compute(events: &[CalendarEvent]) -> Self {
        let count = |impact: Impact| events.iter().filter(|e| e.impact == impact).count();
        let high = count(Impact::High);

        let mut high_per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for e in events.iter().filter(|e| e.impact == Impact::High) {
            *high_per_day.entry(e.date).or_default() += 1;
        }
        // BTreeMap iterates by date; keep the first maximum.
        let most_volatile_day = high_per_day
            .iter()
            .fold(None, |best: Option<(NaiveDate, usize)>, (&date, &n)| match best {
                Some((_, max)) if max >= n => best,
                _ => Some((date, n)),
            })
            .map(|(date, _)| date);

        let mut primary_currencies: Vec<&'static str> = Vec::new();
        for e in events {
            if !primary_currencies.contains(&e.currency) {
                primary_currencies.push(e.currency);
            }
        }

        Self {
            high_impact_events: high,
            medium_impact_events: count(Impact::Medium),
            low_impact_events: count(Impact::Low),
            total_events: events.len(),
            most_volatile_day,
            primary_currencies,
            week_risk_level: RiskLevel::from_high_impact(high),
            first_day: events.iter().map(|e| e.date).min(),
            last_day: events.iter().map(|e| e.date).max(),
        }
    }
}
