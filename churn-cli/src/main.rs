//! Churn prediction CLI
//!
//! Command-line interface for the training batch job and data inspection.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use churn_core::data;
use churn_core::training::{train, TrainingConfig};

#[derive(Parser)]
#[command(name = "churn")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Customer churn prediction pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the churn model and persist the artifact
    Train {
        /// Input customer CSV
        #[arg(short, long, default_value = "data/raw/churn.csv")]
        data: PathBuf,

        /// Output model artifact
        #[arg(short, long, default_value = "models/churn_model.json")]
        output: PathBuf,

        /// Experiment store directory
        #[arg(long, default_value = "experiments")]
        tracking_dir: PathBuf,

        /// Held-out fraction for evaluation
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Seed for the train/test split
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Classifier iteration cap
        #[arg(long, default_value = "500")]
        max_iter: usize,
    },

    /// Show data information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "churn=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            output,
            tracking_dir,
            test_fraction,
            seed,
            max_iter,
        } => {
            cmd_train(data, output, tracking_dir, test_fraction, seed, max_iter)?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
    }

    Ok(())
}

fn cmd_train(
    data: PathBuf,
    output: PathBuf,
    tracking_dir: PathBuf,
    test_fraction: f64,
    seed: u64,
    max_iter: usize,
) -> anyhow::Result<()> {
    println!("{}", "🚀 Churn Prediction - Training".blue().bold());
    println!();

    let config = TrainingConfig::new()
        .with_data_path(data)
        .with_model_path(output)
        .with_tracking_dir(tracking_dir)
        .with_test_fraction(test_fraction)
        .with_seed(seed)
        .with_max_iter(max_iter);

    print!("Training on {}... ", config.data_path.display());
    let start = Instant::now();
    let report = train(&config)?;
    println!("{} ({:?})", "✓".green(), start.elapsed());

    println!();
    println!("{}", "📊 Results".yellow().bold());
    println!("─────────────────────────────");
    println!("Train rows: {}", report.n_train);
    println!("Test rows:  {}", report.n_test);
    println!("Features:   {}", report.n_features);
    println!("AUC:        {:.4}", report.metrics.auc);
    println!("Accuracy:   {:.4}", report.metrics.accuracy);
    println!();
    println!("Model: {}", report.model_path.display().to_string().green());

    Ok(())
}

fn cmd_info(data_path: &PathBuf) -> anyhow::Result<()> {
    println!("{}", "📋 Churn Prediction - Data Info".blue().bold());
    println!();

    let df = data::load_csv(data_path)?;

    println!("File: {}", data_path.display());
    println!("Rows: {}", df.height());
    println!("Columns: {}", df.width());
    println!("Memory: {:.2} MB", df.estimated_size() as f64 / 1024.0 / 1024.0);
    println!();

    println!("{:<20} {:<15} {:>10} {:>10}", "Column", "Type", "Nulls", "Unique");
    println!("{}", "─".repeat(60));

    for col in df.get_columns() {
        let null_count = col.null_count();
        let unique_count = col.as_materialized_series().n_unique().unwrap_or(0);
        println!(
            "{:<20} {:<15} {:>10} {:>10}",
            col.name(),
            format!("{:?}", col.dtype()),
            null_count,
            unique_count
        );
    }

    Ok(())
}
