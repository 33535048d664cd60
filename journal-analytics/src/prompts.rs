//! Prompt templates for the text oracle.
//!
//! Pure string construction: each template embeds a compact view of the
//! journal and a fixed response layout the oracle is asked to follow.

use journal_core::{DailyScore, TradeRecord};
use serde_json::json;

use crate::cot::PositioningSummary;
use crate::economic_calendar::{CalendarEvent, CalendarStatistics};
use crate::reflection::ReflectionMetrics;

/// Journal data shared by the reflection prompts.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub trades: &'a [TradeRecord],
    pub scores: &'a [DailyScore],
    pub insight_count: usize,
    pub reflection: ReflectionMetrics,
}

impl PromptContext<'_> {
    /// Winners over all records, missing P&L counted as non-winners.
    fn win_rate_label(&self) -> String {
        let winners = self.trades.iter().filter(|t| t.is_winner()).count();
        format!(
            "{:.1}",
            winners as f64 / self.trades.len().max(1) as f64 * 100.0
        )
    }
}

/// Which reflection prompt to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionAction {
    Comprehensive,
    Pattern,
    Chat,
    /// Chart screenshot review; the image travels beside the prompt.
    Image,
}

pub fn comprehensive_analysis(ctx: &PromptContext<'_>) -> String {
    let data = json!({
        "totalTrades": ctx.trades.len(),
        "winRate": ctx.win_rate_label(),
        "avgDailyScore": ctx.reflection.avg_daily_score,
        "consistencyScore": ctx.reflection.consistency_score,
        "daysTracked": ctx.reflection.days_tracked,
        "dailyScores": ctx.scores.len(),
        "insights": ctx.insight_count,
    });

    format!(
        "You are a professional trading psychologist and performance analyst. \
Analyze the following trading data and provide comprehensive insights.

Trading Performance Data:
{data:#}

Provide analysis in this format:

## 🔍 COMPREHENSIVE TRADING INSIGHTS ANALYSIS

### 📊 PERFORMANCE OVERVIEW
[Statistical analysis of trading performance with specific metrics]

### 🧠 BEHAVIORAL PATTERNS IDENTIFIED
[Analysis of consistency, discipline, and behavioral trends]

### 🎯 KEY OBSERVATIONS
[Important patterns and correlations in the data]

### 📈 STRENGTH AREAS
[Specific strengths based on the data]

### ⚠️ IMPROVEMENT OPPORTUNITIES
[Specific areas needing attention with actionable focus]

### 💡 PERSONALIZED RECOMMENDATIONS

#### IMMEDIATE ACTIONS (Next 7 days):
[Specific, actionable steps]

#### SHORT-TERM GOALS (Next 30 days):
[Measurable objectives]

#### LONG-TERM DEVELOPMENT (Next 90 days):
[Strategic development goals]

### 🔬 DATA QUALITY ASSESSMENT
[Assessment of data reliability and suggestions for improvement]

### 📅 NEXT REVIEW MILESTONE
[When to reassess progress]

Focus on actionable insights, specific recommendations, and professional trading psychology principles."
    )
}

pub fn chat(ctx: &PromptContext<'_>, question: &str) -> String {
    format!(
        "You are a professional trading coach and analyst. A trader is asking a specific question \
about their trading performance and data. Provide a helpful, detailed response.

Trader's Trading Context:
- Total Trades: {total}
- Win Rate: {win_rate}%
- Average Daily Score: {avg:.1}%
- Consistency Score: {consistency:.1}%
- Days Tracked: {days}

Trader's Question: \"{question}\"

Provide a comprehensive response that:
- Directly addresses their question
- References their specific data when relevant
- Offers actionable advice
- Includes specific next steps
- Maintains a professional, supportive tone

Format your response clearly with headers and bullet points for easy reading.",
        total = ctx.trades.len(),
        win_rate = ctx.win_rate_label(),
        avg = ctx.reflection.avg_daily_score,
        consistency = ctx.reflection.consistency_score,
        days = ctx.reflection.days_tracked,
    )
}

pub fn pattern_analysis(ctx: &PromptContext<'_>) -> String {
    let trades: Vec<serde_json::Value> = ctx
        .trades
        .iter()
        .map(|t| {
            json!({
                "pnl": t.pnl,
                "symbol": t.symbol,
                "duration": t.duration,
                "bias": t.bias,
                "timestamp": t.bought_time,
                "status": t.status,
            })
        })
        .collect();
    let data = json!({
        "trades": trades,
        "dailyPerformance": ctx.scores,
        "metrics": ctx.reflection,
    });

    format!(
        "You are a quantitative trading analyst specializing in pattern recognition. \
Analyze the trader's performance data and identify key patterns.

Detailed Trading Data:
{data:#}

Provide analysis in this format:

## 🔄 TRADING PATTERN ANALYSIS

### 📈 PERFORMANCE PATTERNS
[Analysis of winning vs losing streaks, timing patterns]

### 🕒 TEMPORAL ANALYSIS
[Best/worst trading times, days of week patterns]

### 💰 RISK/REWARD PATTERNS
[Analysis of risk management consistency]

### 🎯 PSYCHOLOGICAL PATTERNS
[Behavioral patterns affecting performance]

### 📊 STATISTICAL INSIGHTS
[Key statistical observations and correlations]

### 🔮 PREDICTIVE INDICATORS
[Patterns that might predict future performance]

### 💡 ACTIONABLE RECOMMENDATIONS
[Specific steps to leverage positive patterns and address negative ones]

Focus on identifying exploitable patterns and providing data-driven recommendations."
    )
}

/// Build a reflection prompt. `question` is only used by [`ReflectionAction::Chat`].
pub fn reflection(action: ReflectionAction, ctx: &PromptContext<'_>, question: &str) -> String {
    match action {
        ReflectionAction::Comprehensive => comprehensive_analysis(ctx),
        ReflectionAction::Pattern => pattern_analysis(ctx),
        ReflectionAction::Chat => chat(ctx, question),
        ReflectionAction::Image => image_analysis(),
    }
}

/// Instructions sent alongside a chart screenshot. The image itself is
/// attached by the oracle client.
pub fn image_analysis() -> String {
    "You are a professional trading analyst specializing in chart analysis and trading screenshot \
interpretation. Analyze the uploaded image and provide detailed insights.

Provide analysis in this format:

## 📈 TRADING IMAGE ANALYSIS

### 🔍 VISUAL ELEMENTS IDENTIFIED
[What you can see in the image - charts, indicators, timeframes, etc.]

### 📊 TECHNICAL ANALYSIS
[Analysis of any technical patterns, support/resistance, indicators]

### 🎯 TRADING SETUP ASSESSMENT
[Evaluation of the trading setup or position if visible]

### 💡 INSIGHTS & OBSERVATIONS
[Key insights about the trading approach shown]

### ⚠️ AREAS FOR IMPROVEMENT
[Suggestions for better chart setup, risk management, etc.]

### 📚 EDUCATIONAL NOTES
[Learning points and technical concepts]

Focus on practical trading insights and educational value."
        .to_string()
}

/// Large-speculator analysis of one week's positioning.
pub fn cot_analysis(summary: &PositioningSummary) -> String {
    let speculative = &summary.speculative;
    format!(
        "You are a professional COT (Commitment of Traders) analyst specializing in LARGE SPECULATORS \
analysis. Analyze ONLY the Large Speculators data and provide a comprehensive weekly bias and \
market implications analysis.

IMPORTANT: Focus your entire analysis on LARGE SPECULATORS (Non-Commercial traders) ONLY. \
Ignore Commercial and Small Traders data.

Large Speculators COT Data for {name} ({symbol}):
- Report Date: {date}
- Large Speculator Long Positions: {long}
- Large Speculator Short Positions: {short}
- Net Large Speculator Position: {net} ({sentiment})
- Weekly Position Change: {net_change}
- Large Spec Long Change: {change_long}
- Large Spec Short Change: {change_short}
- Total Open Interest: {oi}

Provide analysis in this format focusing ONLY on Large Speculators:

## Executive Summary
[Overall Large Speculator positioning theme and key changes]

## Large Speculator Positioning Analysis
**Current Large Spec Stance:** [Detailed analysis of Large Speculator positioning only]
**Large Spec Story:** [What Large Speculator positioning tells us about smart money sentiment]
**Weekly Large Spec Changes:** [Interpretation of Large Speculator position changes only]

## Market Implications & Large Spec Bias
**Large Spec Weekly Bias:** [Bullish/Bearish/Neutral based on Large Speculator positioning]
**Large Spec Conviction Level:** [High/Medium/Low based on position size and changes]
**Smart Money Signal:** [What Large Speculators are indicating about market direction]
**Large Spec Pain Trade:** [Direction that would cause most Large Speculator pain]

## Large Speculator Trading Insights
[Specific trading insights based ONLY on Large Speculator COT data]

Keep the analysis professional, data-driven, and actionable. Focus EXCLUSIVELY on Large \
Speculators (Non-Commercial traders) - ignore all Commercial and Small Trader data.",
        name = summary.commodity,
        symbol = summary.symbol,
        date = summary.report_date,
        long = group_thousands(speculative.long),
        short = group_thousands(speculative.short),
        net = group_thousands(speculative.net),
        sentiment = summary.sentiment,
        net_change = group_thousands(speculative.net_change),
        change_long = group_thousands(speculative.change_long),
        change_short = group_thousands(speculative.change_short),
        oi = group_thousands(summary.open_interest),
    )
}

// ─── Economic calendar ──────────────────────────────────────────────

fn event_statistics(stats: &CalendarStatistics) -> String {
    format!(
        "- High Impact Events: {}\n- Medium Impact Events: {}\n- Low Impact Events: {}",
        stats.high_impact_events, stats.medium_impact_events, stats.low_impact_events
    )
}

fn day_label(day: Option<chrono::NaiveDate>) -> String {
    day.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Week-ahead positioning analysis over the full calendar.
pub fn weekly_analysis(events: &[CalendarEvent], stats: &CalendarStatistics) -> String {
    let calendar = json!(events);
    format!(
        "You are a professional economic analyst and trading strategist. Analyze the following \
economic calendar data and provide comprehensive weekly positioning analysis.

Week Ahead Economic Calendar:
{calendar:#}

Event Statistics:
{statistics}

Provide analysis in this format:

## 📊 WEEKLY ECONOMIC POSITIONING ANALYSIS

### 🔥 HIGH IMPACT WEEK OVERVIEW
Week of {first} - {last}

**Market Alert Level**: {level}
**Volatility Expectation**: {volatility}

### 📅 KEY EVENT BREAKDOWN

#### 🚨 CRITICAL EVENTS (High Impact)
[List and analyze each high-impact event with specific trading implications]

#### ⚠️ IMPORTANT EVENTS (Medium Impact)
[Analyze medium-impact events and their potential market effects]

### 💱 CURRENCY-SPECIFIC ANALYSIS

#### USD FOCUS
[Detailed analysis of USD events and dollar strength implications]

#### EUR FOCUS
[Analysis of Eurozone events and EUR positioning]

#### GBP FOCUS
[UK events and Sterling outlook]

### 🎯 TRADING STRATEGY RECOMMENDATIONS

#### RISK MANAGEMENT
[Specific risk management strategies for the week]

#### POSITION SIZING
[Guidance on position sizing given the event calendar]

#### TIMING CONSIDERATIONS
[Best and worst times to trade during the week]

### 📈 SECTOR & INSTRUMENT FOCUS

#### FOREX PAIRS TO WATCH
[Specific currency pairs likely to be most affected]

#### COMMODITIES IMPACT
[How economic events might affect gold, oil, etc.]

#### INDICES OUTLOOK
[Stock index implications from the economic calendar]

### ⏰ DAY-BY-DAY BREAKDOWN
[Brief analysis of each trading day's key events and timing]

### 🔮 WEEK AHEAD PREDICTIONS
[Specific predictions for market reactions and key levels to watch]

Focus on actionable trading insights, specific risk management guidance, and professional \
market positioning strategies.",
        statistics = event_statistics(stats),
        first = day_label(stats.first_day),
        last = day_label(stats.last_day),
        level = stats.week_risk_level,
        volatility = stats.week_risk_level.volatility(),
    )
}

/// Answer a trader's question against the first five releases of the week.
pub fn news_chat(events: &[CalendarEvent], stats: &CalendarStatistics, question: &str) -> String {
    let context = json!(&events[..events.len().min(5)]);
    format!(
        "You are a professional economic analyst and trading strategist. A trader is asking a \
specific question about economic events, market positioning, or news analysis.

Current Week's Economic Calendar Context:
{context:#}

Week Statistics:
{statistics}

Trader's Question: \"{question}\"

Provide a comprehensive response that:
- Directly addresses their question with specific insights
- References relevant economic events from this week's calendar
- Offers actionable trading advice and risk management guidance
- Includes specific timing and positioning recommendations
- Maintains a professional, expert tone

Format your response clearly with headers and bullet points for easy reading.",
        statistics = event_statistics(stats),
    )
}

/// `-1234567` → `"-1,234,567"`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cot::{Commodity, CotRow};
    use chrono::NaiveDate;
    use journal_core::TradeStatus;

    fn sample_trades() -> Vec<TradeRecord> {
        vec![
            TradeRecord {
                symbol: "ES".into(),
                bias: "long".into(),
                duration: "27m".into(),
                bought_time: "2024-06-10 09:31".into(),
                status: Some(TradeStatus::Closed),
                ..TradeRecord::with_pnl(250.0)
            },
            TradeRecord::with_pnl(-100.0),
            TradeRecord::default(),
        ]
    }

    fn context<'a>(trades: &'a [TradeRecord], scores: &'a [DailyScore]) -> PromptContext<'a> {
        PromptContext {
            trades,
            scores,
            insight_count: 3,
            reflection: ReflectionMetrics {
                days_tracked: 3,
                avg_daily_score: 62.5,
                consistency_score: 42.857142857142854,
            },
        }
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(-60_000), "-60,000");
        assert_eq!(group_thousands(2_100_000), "2,100,000");
    }

    #[test]
    fn comprehensive_embeds_counts_and_layout() {
        let trades = sample_trades();
        let prompt = comprehensive_analysis(&context(&trades, &[]));
        assert!(prompt.contains("\"totalTrades\": 3"));
        // one winner out of three records
        assert!(prompt.contains("\"winRate\": \"33.3\""));
        assert!(prompt.contains("\"insights\": 3"));
        assert!(prompt.contains("### 📅 NEXT REVIEW MILESTONE"));
    }

    #[test]
    fn chat_quotes_the_question() {
        let trades = sample_trades();
        let prompt = chat(&context(&trades, &[]), "Why do I overtrade on Mondays?");
        assert!(prompt.contains("Trader's Question: \"Why do I overtrade on Mondays?\""));
        assert!(prompt.contains("- Average Daily Score: 62.5%"));
        assert!(prompt.contains("- Consistency Score: 42.9%"));
    }

    #[test]
    fn pattern_analysis_lists_each_trade() {
        let trades = sample_trades();
        let scores = [DailyScore {
            score_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            scores: Default::default(),
        }];
        let prompt = pattern_analysis(&context(&trades, &scores));
        assert!(prompt.contains("\"symbol\": \"ES\""));
        assert!(prompt.contains("\"status\": \"closed\""));
        assert!(prompt.contains("\"pnl\": null"));
        assert!(prompt.contains("\"score_date\": \"2024-06-10\""));
        assert!(prompt.contains("\"avgDailyScore\": 62.5"));
    }

    #[test]
    fn reflection_dispatches_by_action() {
        let trades = sample_trades();
        let ctx = context(&trades, &[]);
        assert_eq!(
            reflection(ReflectionAction::Pattern, &ctx, ""),
            pattern_analysis(&ctx)
        );
        assert_eq!(reflection(ReflectionAction::Chat, &ctx, "q"), chat(&ctx, "q"));
    }

    #[test]
    fn image_prompt_is_fixed_and_dispatched() {
        let trades = sample_trades();
        let ctx = context(&trades, &[]);
        let prompt = reflection(ReflectionAction::Image, &ctx, "ignored");
        assert_eq!(prompt, image_analysis());
        assert!(prompt.starts_with("You are a professional trading analyst specializing in chart analysis"));
        assert!(prompt.contains("### 📚 EDUCATIONAL NOTES"));
    }

    // ── Economic calendar ──

    fn calendar() -> (Vec<CalendarEvent>, CalendarStatistics) {
        let events = crate::economic_calendar::fixture_calendar(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let stats = CalendarStatistics::compute(&events);
        (events, stats)
    }

    #[test]
    fn weekly_analysis_embeds_calendar_and_alert_level() {
        let (events, stats) = calendar();
        let prompt = weekly_analysis(&events, &stats);
        assert!(prompt.contains("\"event_id\": \"USD_FOMC_MINUTES_001\""));
        assert!(prompt.contains("- High Impact Events: 8\n- Medium Impact Events: 5\n- Low Impact Events: 0"));
        assert!(prompt.contains("Week of 2024-06-11 - 2024-06-16"));
        assert!(prompt.contains("**Market Alert Level**: CRITICAL"));
        assert!(prompt.contains("**Volatility Expectation**: EXTREME"));
    }

    #[test]
    fn news_chat_uses_first_five_events() {
        let (events, stats) = calendar();
        let prompt = news_chat(&events, &stats, "Should I hold EURUSD into Lagarde?");
        assert!(prompt.contains("Trader's Question: \"Should I hold EURUSD into Lagarde?\""));
        for e in &events[..5] {
            assert!(prompt.contains(e.event_id));
        }
        assert!(!prompt.contains(events[5].event_id));
    }

    #[test]
    fn news_chat_with_short_calendar() {
        let (events, stats) = calendar();
        let prompt = news_chat(&events[..2], &stats, "q");
        assert!(prompt.contains(events[1].event_id));
    }

    #[test]
    fn cot_prompt_formats_positions() {
        let row = CotRow {
            report_date_as_yyyy_mm_dd: "2024-06-11".into(),
            noncommercial_positions_long_all: 250_000,
            noncommercial_positions_short_all: 310_000,
            change_in_noncommercial_long_all: -4_500,
            change_in_noncommercial_short_all: 1_200,
            open_interest_all: 2_100_000,
            ..CotRow::default()
        };
        let summary = PositioningSummary::from_row(&Commodity::lookup("ES").unwrap(), &row);
        let prompt = cot_analysis(&summary);
        assert!(prompt.contains("Large Speculators COT Data for S&P 500 E-mini (ES):"));
        assert!(prompt.contains("- Net Large Speculator Position: -60,000 (Bearish)"));
        assert!(prompt.contains("- Weekly Position Change: -5,700"));
        assert!(prompt.contains("- Total Open Interest: 2,100,000"));
    }
}
