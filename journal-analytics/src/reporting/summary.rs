//! Plain-text performance summary.
//!
//! Ratings and recommendations are decision tables: ordered
//! (predicate, message) rows evaluated top to bottom.

use crate::metrics::PerformanceMetrics;

type Rule = (fn(&PerformanceMetrics) -> bool, &'static str);

/// First matching row wins. The last row of each table always matches.
const WIN_RATE_RATING: &[Rule] = &[
    (|m| m.win_rate >= 60.0, "✅ Excellent win rate (>60%)"),
    (|m| m.win_rate >= 50.0, "✅ Good win rate (50-60%)"),
    (|_| true, "⚠️ Win rate needs improvement (<50%)"),
];

const PROFIT_FACTOR_RATING: &[Rule] = &[
    (|m| m.profit_factor >= 2.0, "✅ Excellent profit factor (>2.0)"),
    (|m| m.profit_factor >= 1.5, "✅ Good profit factor (1.5-2.0)"),
    (|m| m.profit_factor >= 1.0, "⚠️ Marginal profit factor (1.0-1.5)"),
    (|_| true, "❌ Poor profit factor (<1.0)"),
];

const EXPECTANCY_RATING: &[Rule] = &[
    (|m| m.expectancy > 0.0, "✅ Positive expectancy"),
    (|_| true, "❌ Negative expectancy"),
];

/// Every matching row is emitted, in order.
const RECOMMENDATIONS: &[Rule] = &[
    (
        |m| m.win_rate < 50.0,
        "Focus on improving entry criteria and setup quality",
    ),
    (
        |m| m.profit_factor < 1.5,
        "Work on letting winners run and cutting losses quickly",
    ),
    (
        |m| m.avg_loss > m.avg_win,
        "Improve risk:reward ratio by targeting larger wins",
    ),
    (
        |m| m.max_drawdown > m.total_pnl.abs() * 0.3,
        "Implement better risk management to reduce drawdowns",
    ),
    (
        |m| m.total_trades < 20,
        "Increase sample size for more reliable statistics",
    ),
];

fn first_match(table: &[Rule], metrics: &PerformanceMetrics) -> &'static str {
    table
        .iter()
        .find(|(applies, _)| applies(metrics))
        .map(|(_, message)| *message)
        .unwrap_or_default()
}

/// The three rating lines: win rate, profit factor, expectancy.
pub fn ratings(metrics: &PerformanceMetrics) -> [&'static str; 3] {
    [
        first_match(WIN_RATE_RATING, metrics),
        first_match(PROFIT_FACTOR_RATING, metrics),
        first_match(EXPECTANCY_RATING, metrics),
    ]
}

/// Every recommendation whose condition holds.
pub fn recommendations(metrics: &PerformanceMetrics) -> Vec<&'static str> {
    RECOMMENDATIONS
        .iter()
        .filter(|(applies, _)| applies(metrics))
        .map(|(_, message)| *message)
        .collect()
}

/// Render the multi-section summary. Empty when there are no trades.
pub fn render_summary(metrics: &PerformanceMetrics) -> String {
    if metrics.total_trades == 0 {
        return String::new();
    }

    let total = metrics.total_trades as f64;
    let [win_rating, pf_rating, expectancy_rating] = ratings(metrics);

    let mut summary = format!(
        "PERFORMANCE ANALYSIS SUMMARY:\n\n\
📊 OVERALL PERFORMANCE:\n\
• Total P&L: ${:.2}\n\
• Win Rate: {:.1}%\n\
• Total Trades: {}\n\
• Profit Factor: {:.2}\n\n\
📈 TRADE ANALYSIS:\n\
• Winning Trades: {} ({:.1}%)\n\
• Losing Trades: {} ({:.1}%)\n\
• Average Win: ${:.2}\n\
• Average Loss: ${:.2}\n\n\
💰 RISK METRICS:\n\
• Gross Profit: ${:.2}\n\
• Gross Loss: ${:.2}\n\
• Maximum Drawdown: ${:.2}\n\
• Expectancy per Trade: ${:.2}\n\n\
🎯 PERFORMANCE RATING:\n\
{}\n\
{}\n\
{}\n\n\
💡 RECOMMENDATIONS:\n",
        metrics.total_pnl,
        metrics.win_rate,
        metrics.total_trades,
        metrics.profit_factor,
        metrics.winning_trades,
        metrics.winning_trades as f64 / total * 100.0,
        metrics.losing_trades,
        metrics.losing_trades as f64 / total * 100.0,
        metrics.avg_win,
        metrics.avg_loss,
        metrics.gross_profit,
        metrics.gross_loss,
        metrics.max_drawdown,
        metrics.expectancy,
        win_rating,
        pf_rating,
        expectancy_rating,
    );

    for line in recommendations(metrics) {
        summary.push_str("• ");
        summary.push_str(line);
        summary.push('\n');
    }
    summary
}
