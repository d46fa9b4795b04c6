//! Deal Engine CLI
//!
//! Evaluates transaction snapshots stored as JSON

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use deal_engine::projection::IrrConfig;
use deal_engine::transaction::load_batch;
use deal_engine::{EngineConfig, FinancialEngine, FinancialResult, TransactionInput};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "deal_engine",
    version,
    about = "Financial evaluation of telecom sales transactions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Newton-Raphson iteration budget for IRR
    #[arg(long, env = "DEAL_ENGINE_IRR_MAX_ITERATIONS", global = true)]
    irr_max_iterations: Option<u32>,

    /// |NPV| below which an IRR guess is accepted
    #[arg(long, env = "DEAL_ENGINE_IRR_TOLERANCE", global = true)]
    irr_tolerance: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single transaction snapshot
    Evaluate {
        /// JSON file with one transaction
        #[arg(long)]
        input: PathBuf,

        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Also write the monthly timeline to this CSV file
        #[arg(long)]
        timeline_csv: Option<PathBuf>,

        /// Override the annual cost of capital used for NPV
        #[arg(long)]
        capital_cost: Option<f64>,
    },
    /// Evaluate a JSON array of snapshots in parallel
    Batch {
        #[arg(long)]
        input: PathBuf,

        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut irr = IrrConfig::default();
    if let Some(max_iterations) = cli.irr_max_iterations {
        irr.max_iterations = max_iterations;
    }
    if let Some(tolerance) = cli.irr_tolerance {
        irr.tolerance = tolerance;
    }
    let engine = FinancialEngine::new(EngineConfig {
        irr,
        ..EngineConfig::default()
    });

    match cli.command {
        Commands::Evaluate {
            input,
            format,
            timeline_csv,
            capital_cost,
        } => {
            let mut transaction = TransactionInput::from_path(&input)
                .with_context(|| format!("failed to load transaction from {}", input.display()))?;
            if let Some(rate) = capital_cost {
                transaction.annual_capital_cost = rate;
            }

            let result = engine.evaluate(&transaction);

            match format {
                OutputFormat::Json => println!("{}", result.to_json_pretty()?),
                OutputFormat::Table => print_table(&result),
            }

            if let Some(path) = timeline_csv {
                result
                    .timeline
                    .write_csv_path(&path)
                    .with_context(|| format!("failed to write timeline to {}", path.display()))?;
                eprintln!("Timeline written to {}", path.display());
            }
        }
        Commands::Batch { input, format } => {
            let start = Instant::now();
            let transactions = load_batch(&input)
                .with_context(|| format!("failed to load batch from {}", input.display()))?;
            let results = engine.evaluate_batch(&transactions);
            log::info!("evaluated {} transactions in {:?}", results.len(), start.elapsed());

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
                OutputFormat::Table => print_batch_table(&results),
            }
        }
    }

    Ok(())
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Fixed-precision amount, `-` when the figure is unavailable
fn fmt_amount(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", decimals, v))
}

fn fmt_percent(ratio: Option<f64>) -> String {
    fmt_amount(ratio.map(|r| r * 100.0), 2)
}

fn print_table(result: &FinancialResult) {
    println!("Deal Evaluation");
    println!("===============\n");
    println!(
        "  MRC:            {:>14} {:?} ({} base)",
        fmt_amount(result.mrc_original, 2),
        result.mrc_currency,
        fmt_amount(result.mrc_base, 2)
    );
    println!(
        "  NRC:            {:>14} {:?} ({} base)",
        fmt_amount(result.nrc_original, 2),
        result.nrc_currency,
        fmt_amount(result.nrc_base, 2)
    );
    println!("  Total revenue:  {:>14}", fmt_amount(result.total_revenue, 2));
    println!("  Total expense:  {:>14}", fmt_amount(result.total_expense, 2));
    println!(
        "  Gross margin:   {:>14} ({}%)",
        fmt_amount(result.gross_margin, 2),
        fmt_percent(result.gross_margin_ratio)
    );
    println!(
        "  Commission:     {:>14} ({:?}, rate {:.4})",
        fmt_amount(result.commission, 2),
        result.commission_detail.rule,
        result.commission_detail.rate
    );
    println!("  Installation:   {:>14}", fmt_amount(result.installation_cost, 2));
    println!("  Bond:           {:>14}", fmt_amount(result.bond_cost, 2));
    println!(
        "  NPV: {}  IRR (monthly): {}  Payback: {}",
        fmt_amount(result.npv, 2),
        fmt_amount(result.irr, 6),
        fmt_opt(result.payback)
    );
    println!();

    println!(
        "{:>6} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Period", "NRC", "MRC", "Commission", "Recurring", "Fixed", "Net", "Cumulative"
    );
    println!("{}", "-".repeat(100));
    for p in &result.timeline.periods {
        println!(
            "{:>6} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            p.period,
            p.nrc,
            p.mrc,
            p.commission,
            p.recurring_expense,
            p.fixed_costs,
            p.net_cash_flow,
            p.cumulative_cash_flow
        );
    }
}

fn print_batch_table(results: &[FinancialResult]) {
    println!(
        "{:>5} {:>14} {:>14} {:>10} {:>12} {:>14} {:>10} {:>8}",
        "#", "Revenue", "Expense", "Margin%", "Commission", "NPV", "IRR", "Payback"
    );
    println!("{}", "-".repeat(95));
    for (i, r) in results.iter().enumerate() {
        println!(
            "{:>5} {:>14} {:>14} {:>10} {:>12} {:>14} {:>10} {:>8}",
            i,
            fmt_amount(r.total_revenue, 2),
            fmt_amount(r.total_expense, 2),
            fmt_percent(r.gross_margin_ratio),
            fmt_amount(r.commission, 2),
            fmt_amount(r.npv, 2),
            fmt_amount(r.irr, 6),
            fmt_opt(r.payback)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_figures_print_as_dash() {
        assert_eq!(fmt_amount(Some(1234.5), 2), "1234.50");
        assert_eq!(fmt_amount(Some(0.0123456789), 6), "0.012346");
        assert_eq!(fmt_amount(None, 2), "-");
        assert_eq!(fmt_percent(Some(0.25)), "25.00");
        assert_eq!(fmt_percent(None), "-");
        assert_eq!(fmt_opt::<u32>(None), "-");
    }
}
