//! basket CLI
//!
//! Command-line front end: reads a transactions CSV, runs the analysis, and
//! prints ranked association rules plus the most purchased items.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use basket_analysis::export::to_csv_report;
use basket_analysis::{AnalysisEngine, AnalysisResult};
use basket_core::config::{OutputFormat, TransactionLayout};
use basket_core::events::LevelCompleteEvent;
use basket_core::{
    AnalysisEventHandler, BasketConfig, BasketErrorCode, CancellationToken, EventDispatcher,
};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "basket")]
#[command(about = "Market-basket analysis: frequent itemsets and association rules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine association rules from a transactions CSV
    Analyze(AnalyzeArgs),
    /// Print the effective configuration as TOML
    Config {
        /// Config file (defaults to ./basket.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// CSV file to analyze, or `-` for stdin
    input: String,
    /// Minimum support ratio, in (0, 1]
    #[arg(long)]
    min_support: Option<f64>,
    /// Minimum rule confidence, in [0, 1]
    #[arg(long)]
    min_confidence: Option<f64>,
    /// Number of rules and items to report
    #[arg(long)]
    top_n: Option<usize>,
    /// Largest itemset size to mine
    #[arg(long)]
    max_itemset_size: Option<usize>,
    /// Row layout: auto, basket, or grouped
    #[arg(long)]
    layout: Option<TransactionLayout>,
    /// Output format: json, csv, or table
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Write the report here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    /// Config file (defaults to ./basket.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Cancel the analysis after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl AnalyzeArgs {
    fn overrides(&self) -> BasketConfig {
        let mut config = BasketConfig::default();
        config.mining.min_support = self.min_support;
        config.mining.min_confidence = self.min_confidence;
        config.mining.top_n = self.top_n;
        config.mining.max_itemset_size = self.max_itemset_size;
        config.parse.layout = self.layout;
        config.output.format = self.format;
        config
    }
}

/// Logs each mined level so long runs show progress on stderr.
struct ProgressLogger;

impl AnalysisEventHandler for ProgressLogger {
    fn on_level_complete(&self, event: &LevelCompleteEvent) {
        tracing::info!(
            level = event.level,
            candidates = event.candidates,
            frequent = event.frequent,
            "level mined"
        );
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze(args) => handle_analyze(&args),
        Commands::Config { config } => handle_config(config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// File (or ./basket.toml) ← `BASKET_*` environment ← command line.
fn load_config(path: Option<&Path>, overrides: Option<&BasketConfig>) -> Result<BasketConfig> {
    let config = match path {
        Some(path) => {
            let mut config = BasketConfig::load_file(path)
                .map_err(|e| anyhow!(e.coded_message()))?;
            config
                .apply_env_overrides()
                .map_err(|e| anyhow!(e.coded_message()))?;
            if let Some(overrides) = overrides {
                config.merge(overrides);
            }
            config
        }
        None => {
            let root = std::env::current_dir().context("Failed to resolve working directory")?;
            BasketConfig::load(&root, overrides).map_err(|e| anyhow!(e.coded_message()))?
        }
    };
    Ok(config)
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), Some(&args.overrides()))?;
    basket_core::tracing::init_tracing(&config.logging);

    let mut events = EventDispatcher::new();
    events.register(Arc::new(ProgressLogger));
    let engine = AnalysisEngine::new(&config).with_event_handler(Arc::new(events));
    if let Some(secs) = args.timeout_secs {
        spawn_watchdog(engine.cancellation(), Duration::from_secs(secs));
    }

    let result = if args.input == "-" {
        engine.analyze_reader(io::stdin().lock())
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("Failed to open {}", args.input))?;
        engine.analyze_reader(file)
    }
    .map_err(|e| anyhow!(e.coded_message()))?;

    let rendered = render(&result, config.output.effective_format(), config.output.effective_pretty())?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn handle_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path, None)?;
    let toml = config.to_toml().map_err(|e| anyhow!(e.coded_message()))?;
    print!("{toml}");
    Ok(())
}

fn spawn_watchdog(token: CancellationToken, timeout: Duration) {
    thread::spawn(move || {
        thread::sleep(timeout);
        if !token.is_cancelled() {
            tracing::warn!(timeout_secs = timeout.as_secs(), "analysis timed out, cancelling");
            token.cancel();
        }
    });
}

/// Render the full report before anything is written, so a failure never
/// leaves partial output.
fn render(result: &AnalysisResult, format: OutputFormat, pretty: bool) -> Result<String> {
    let mut rendered = match format {
        OutputFormat::Json => result.to_json(pretty).context("Failed to serialize result")?,
        OutputFormat::Csv => to_csv_report(result).map_err(|e| anyhow!(e.coded_message()))?,
        OutputFormat::Table => render_table(result),
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

fn render_table(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let rule_cells: Vec<(String, String)> = result
        .rules
        .iter()
        .map(|r| (r.antecedents.join(", "), r.consequents.join(", ")))
        .collect();
    let lhs_width = rule_cells
        .iter()
        .map(|(a, _)| a.len())
        .chain(["Antecedents".len()])
        .max()
        .unwrap_or(0);
    let rhs_width = rule_cells
        .iter()
        .map(|(_, c)| c.len())
        .chain(["Consequents".len()])
        .max()
        .unwrap_or(0);

    out.push_str(&format!("Association Rules ({})\n", result.rules.len()));
    out.push_str(&format!(
        "{:<lhs_width$}  {:<rhs_width$}  {:>7}  {:>10}  {:>7}\n",
        "Antecedents", "Consequents", "Lift", "Confidence", "Support"
    ));
    for (rule, (lhs, rhs)) in result.rules.iter().zip(&rule_cells) {
        out.push_str(&format!(
            "{lhs:<lhs_width$}  {rhs:<rhs_width$}  {:>7.3}  {:>10.3}  {:>7.3}\n",
            rule.lift, rule.confidence, rule.support
        ));
    }

    let item_width = result
        .top_items
        .iter()
        .map(|i| i.item.len())
        .chain(["Item".len()])
        .max()
        .unwrap_or(0);
    out.push_str(&format!("\nTop {} Frequent Items\n", result.top_items.len()));
    out.push_str(&format!("{:<item_width$}  {:>14}\n", "Item", "Purchase Count"));
    for item in &result.top_items {
        out.push_str(&format!("{:<item_width$}  {:>14}\n", item.item, item.count));
    }

    let stats = &result.stats;
    out.push_str(&format!(
        "\n{} transactions, {} distinct items, {} frequent itemsets, {} rules ({} ms)\n",
        stats.transactions,
        stats.distinct_items,
        stats.frequent_itemsets,
        stats.rules_generated,
        stats.duration_ms
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_analysis::run_analysis;

    const GROCERY: &str = "milk;bread\nmilk;bread;eggs\nmilk\nbread;eggs\n";

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "basket",
            "analyze",
            "tx.csv",
            "--min-support",
            "0.5",
            "--layout",
            "basket",
            "--format",
            "table",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        let overrides = args.overrides();
        assert_eq!(overrides.mining.min_support, Some(0.5));
        assert_eq!(overrides.mining.min_confidence, None);
        assert_eq!(overrides.parse.layout, Some(TransactionLayout::Basket));
        assert_eq!(overrides.output.format, Some(OutputFormat::Table));
    }

    #[test]
    fn config_file_is_layered_under_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[mining]\nmin_support = 0.2\ntop_n = 5\n").unwrap();

        let mut overrides = BasketConfig::default();
        overrides.mining.top_n = Some(3);
        let config = load_config(Some(&path), Some(&overrides)).unwrap();
        assert_eq!(config.mining.min_support, Some(0.2));
        assert_eq!(config.mining.top_n, Some(3));
    }

    #[test]
    fn table_lists_rules_and_items() {
        let result = run_analysis(GROCERY, 0.5, 0.5).unwrap();
        let table = render_table(&result);
        assert!(table.starts_with("Association Rules (4)\n"));
        assert!(table.contains("Top 3 Frequent Items"));
        assert!(table.contains("eggs"));
    }

    #[test]
    fn render_always_ends_with_newline() {
        let result = run_analysis(GROCERY, 0.5, 0.5).unwrap();
        for format in [OutputFormat::Json, OutputFormat::Csv, OutputFormat::Table] {
            assert!(render(&result, format, false).unwrap().ends_with('\n'));
        }
    }
}
