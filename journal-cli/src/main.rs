//! Journal CLI — import, metrics, summary, reflection, COT and news commands.
//!
//! Commands:
//! - `import` — normalise a broker CSV and print the records
//! - `metrics` — print performance metrics for a CSV
//! - `summary` — print the plain-text performance summary
//! - `reflect` — build a reflection prompt and relay the oracle's answer
//! - `cot` — fetch COT positioning and relay the oracle's analysis
//! - `news` — week-ahead economic calendar analysis
//! - `score` — print reflection metrics for saved daily checklists

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use journal_analytics::prompts::{self, PromptContext, ReflectionAction};
use journal_analytics::{
    compute_metrics, fixture_calendar, metrics_to_json, render_summary, trades_to_csv,
    trades_to_json, CalendarStatistics, CftcClient, Commodity, GeminiClient, InlineImage,
    JournalConfig, ReflectionMetrics, TextOracle,
};
use journal_core::{
    dedupe_records, parse_csv_strict, parse_csv_with_diagnostics, DailyScore, ImportOptions,
    TradeRecord,
};

#[derive(Parser)]
#[command(name = "journal", about = "Trading journal — CSV import, performance metrics and reflection")]
struct Cli {
    /// Path to a TOML config file. Missing file means defaults.
    #[arg(long, global = true, default_value = "journal.toml")]
    config: PathBuf,

    /// Log at debug level regardless of the configured filter.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalise a broker CSV export and print the records.
    Import {
        csv: PathBuf,

        /// Map columns by header name instead of position.
        #[arg(long, default_value_t = false)]
        header_driven: bool,

        /// Fail on unparsable numbers instead of defaulting them to zero.
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Drop repeated records.
        #[arg(long, default_value_t = false)]
        dedupe: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print performance metrics for a CSV.
    Metrics {
        csv: PathBuf,

        /// Print as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the performance summary for a CSV.
    Summary { csv: PathBuf },
    /// Ask the oracle for a reflection on the journal.
    Reflect {
        csv: PathBuf,

        #[arg(long, value_enum, default_value_t = ActionArg::Comprehensive)]
        action: ActionArg,

        /// Question for `--action chat`.
        #[arg(long)]
        message: Option<String>,

        /// Chart screenshot for `--action image` (png, jpeg, webp, heic).
        #[arg(long)]
        image: Option<PathBuf>,

        /// JSON array of saved daily checklists.
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Number of saved insights.
        #[arg(long, default_value_t = 0)]
        insights: usize,

        /// Print the prompt instead of sending it.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Fetch large-speculator positioning and ask the oracle for a weekly bias.
    Cot {
        /// Futures symbol, e.g. ES, GC, 6E.
        symbol: String,

        /// Print the prompt instead of sending it.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Ask the oracle about the week-ahead economic calendar.
    News {
        #[arg(long, value_enum, default_value_t = NewsAction::Weekly)]
        action: NewsAction,

        /// Question for `--action chat`.
        #[arg(long)]
        message: Option<String>,

        /// Print the prompt instead of sending it.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print reflection metrics for saved daily checklists.
    Score {
        scores: PathBuf,

        /// Number of saved insights.
        #[arg(long, default_value_t = 0)]
        insights: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Comprehensive,
    Pattern,
    Chat,
    Image,
}

#[derive(Clone, Copy, ValueEnum)]
enum NewsAction {
    Weekly,
    Chat,
}

impl From<ActionArg> for ReflectionAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Comprehensive => ReflectionAction::Comprehensive,
            ActionArg::Pattern => ReflectionAction::Pattern,
            ActionArg::Chat => ReflectionAction::Chat,
            ActionArg::Image => ReflectionAction::Image,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = JournalConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    init_logging(&config.logging.filter, cli.verbose)?;

    match cli.command {
        Commands::Import {
            csv,
            header_driven,
            strict,
            dedupe,
            format,
        } => {
            let mut options = config.import.options();
            if header_driven {
                options = ImportOptions::header_driven();
            }
            let trades = load_trades(&csv, &options, strict, dedupe || config.import.dedupe)?;
            print_trades(&trades, format)
        }
        Commands::Metrics { csv, json } => {
            let trades = load_trades(&csv, &config.import.options(), false, config.import.dedupe)?;
            let metrics = compute_metrics(&trades);
            if json {
                println!("{}", metrics_to_json(&metrics)?);
            } else {
                print_metrics(&metrics);
            }
            Ok(())
        }
        Commands::Summary { csv } => {
            let trades = load_trades(&csv, &config.import.options(), false, config.import.dedupe)?;
            let summary = render_summary(&compute_metrics(&trades));
            if summary.is_empty() {
                println!("No qualifying trades: nothing to summarise.");
            } else {
                print!("{summary}");
            }
            Ok(())
        }
        Commands::Reflect {
            csv,
            action,
            message,
            image,
            scores,
            insights,
            dry_run,
        } => {
            let trades = load_trades(&csv, &config.import.options(), false, config.import.dedupe)?;
            let scores = match scores {
                Some(path) => load_scores(&path)?,
                None => Vec::new(),
            };
            let action = ReflectionAction::from(action);
            if action == ReflectionAction::Chat && message.is_none() {
                bail!("--action chat needs a --message");
            }
            let image = match (action, image) {
                (ReflectionAction::Image, Some(path)) => Some(load_image(&path)?),
                (ReflectionAction::Image, None) => bail!("--action image needs an --image"),
                (_, Some(_)) => bail!("--image is only used with --action image"),
                (_, None) => None,
            };
            let ctx = PromptContext {
                trades: &trades,
                scores: &scores,
                insight_count: insights,
                reflection: ReflectionMetrics::compute(insights, &scores, today()),
            };
            let prompt = prompts::reflection(action, &ctx, message.as_deref().unwrap_or_default());
            match image {
                Some(image) => relay_with_image(&config, &prompt, &image, dry_run),
                None => relay(&config, &prompt, dry_run),
            }
        }
        Commands::Cot { symbol, dry_run } => {
            let commodity = Commodity::lookup(&symbol)?;
            let cftc = CftcClient::new(&config.cot).context("failed to build CFTC client")?;
            let positioning = cftc
                .positioning(&commodity, today())
                .with_context(|| format!("failed to fetch COT data for {}", commodity.symbol))?;
            tracing::info!(
                symbol = commodity.symbol,
                report_date = %positioning.report_date,
                sentiment = %positioning.sentiment,
                momentum = %positioning.momentum,
                "positioning computed"
            );
            relay(&config, &prompts::cot_analysis(&positioning), dry_run)
        }
        Commands::News {
            action,
            message,
            dry_run,
        } => {
            let events = fixture_calendar(today());
            let stats = CalendarStatistics::compute(&events);
            tracing::info!(
                events = stats.total_events,
                high_impact = stats.high_impact_events,
                risk_level = %stats.week_risk_level,
                "economic calendar loaded"
            );
            let prompt = match (action, message) {
                (NewsAction::Weekly, _) => prompts::weekly_analysis(&events, &stats),
                (NewsAction::Chat, Some(question)) => prompts::news_chat(&events, &stats, &question),
                (NewsAction::Chat, None) => bail!("--action chat needs a --message"),
            };
            relay(&config, &prompt, dry_run)
        }
        Commands::Score { scores, insights } => {
            let scores = load_scores(&scores)?;
            let reflection = ReflectionMetrics::compute(insights, &scores, today());
            println!("Days tracked:       {}", reflection.days_tracked);
            println!("Avg daily score:    {:.1}%", reflection.avg_daily_score);
            println!("Consistency score:  {:.1}%", reflection.consistency_score);
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over the configured filter; `--verbose` wins over both.
fn init_logging(filter: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(filter))?
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

fn load_trades(path: &Path, options: &ImportOptions, strict: bool, dedupe: bool) -> Result<Vec<TradeRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let trades = if strict {
        parse_csv_strict(&text, options).with_context(|| format!("failed to import {}", path.display()))?
    } else {
        let report = parse_csv_with_diagnostics(&text, options);
        for issue in &report.issues {
            tracing::warn!(
                line = issue.line,
                column = issue.column.name(),
                raw = issue.raw.as_deref().unwrap_or("<missing>"),
                "numeric field defaulted to 0"
            );
        }
        report.records
    };

    Ok(if dedupe { dedupe_records(trades) } else { trades })
}

fn load_scores(path: &Path) -> Result<Vec<DailyScore>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse daily scores in {}", path.display()))
}

/// Print the prompt on a dry run, otherwise send it and print the answer.
fn relay(config: &JournalConfig, prompt: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("{prompt}");
        return Ok(());
    }
    let oracle = GeminiClient::from_env(&config.oracle)?;
    let answer = oracle.complete(prompt).context("oracle request failed")?;
    println!("{answer}");
    Ok(())
}

fn relay_with_image(config: &JournalConfig, prompt: &str, image: &InlineImage, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("{prompt}");
        println!("[attached: {}, {} base64 chars]", image.mime_type, image.data.len());
        return Ok(());
    }
    let oracle = GeminiClient::from_env(&config.oracle)?;
    let answer = oracle
        .complete_with_image(prompt, image)
        .context("oracle request failed")?;
    println!("{answer}");
    Ok(())
}

fn load_image(path: &Path) -> Result<InlineImage> {
    let Some(mime_type) = InlineImage::mime_for_path(path) else {
        bail!("unsupported image type: {}", path.display());
    };
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(InlineImage::from_bytes(mime_type, &bytes))
}

fn print_trades(trades: &[TradeRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", trades_to_json(trades)?),
        OutputFormat::Csv => print!("{}", trades_to_csv(trades)?),
        OutputFormat::Table => {
            println!(
                "{:>4}  {:<8} {:>6} {:>12} {:>12} {:>12}  {:<8}",
                "#", "Symbol", "Qty", "Buy", "Sell", "P&L", "Status"
            );
            for (i, t) in trades.iter().enumerate() {
                println!(
                    "{:>4}  {:<8} {:>6} {:>12} {:>12} {:>12}  {:<8}",
                    i + 1,
                    t.symbol,
                    t.quantity,
                    cell(t.buy_price),
                    cell(t.sell_price),
                    cell(t.pnl),
                    t.status.map(|s| s.to_string()).unwrap_or_default(),
                );
            }
            println!("{} record(s)", trades.len());
        }
    }
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into())
}

fn print_metrics(m: &journal_analytics::PerformanceMetrics) {
    println!();
    println!("=== Performance ===");
    println!("Trades:         {} ({} won, {} lost)", m.total_trades, m.winning_trades, m.losing_trades);
    println!("Total P&L:      ${:.2}", m.total_pnl);
    println!("Win Rate:       {:.1}%", m.win_rate);
    println!("Profit Factor:  {:.2}", m.profit_factor);
    println!("Avg Win:        ${:.2}", m.avg_win);
    println!("Avg Loss:       ${:.2}", m.avg_loss);
    println!();
    println!("--- Risk ---");
    println!("Gross Profit:   ${:.2}", m.gross_profit);
    println!("Gross Loss:     ${:.2}", m.gross_loss);
    println!("Max Drawdown:   ${:.2}", m.max_drawdown);
    println!("Expectancy:     ${:.2}", m.expectancy);
    println!("Sharpe:         {:.3}", m.sharpe_ratio);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_accepts_image_action() {
        let cli = Cli::try_parse_from([
            "journal", "reflect", "trades.csv", "--action", "image", "--image", "chart.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Reflect { action, image, .. } => {
                assert_eq!(ReflectionAction::from(action), ReflectionAction::Image);
                assert_eq!(image, Some(PathBuf::from("chart.png")));
            }
            _ => panic!("expected reflect"),
        }
    }

    #[test]
    fn news_defaults_to_weekly() {
        let cli = Cli::try_parse_from(["journal", "news", "--dry-run"]).unwrap();
        match cli.command {
            Commands::News { action, message, dry_run } => {
                assert!(matches!(action, NewsAction::Weekly));
                assert!(message.is_none());
                assert!(dry_run);
            }
            _ => panic!("expected news"),
        }
    }

    #[test]
    fn news_chat_takes_a_message() {
        let cli = Cli::try_parse_from(["journal", "news", "--action", "chat", "--message", "NFP?"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::News { action: NewsAction::Chat, message: Some(ref m), .. } if m == "NFP?"
        ));
    }

    #[test]
    fn load_image_encodes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let image = load_image(&path).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw==");
    }

    #[test]
    fn load_image_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"text").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported image type"));
    }
}
