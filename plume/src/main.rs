//! plume - AI-drafted posts for X with a monthly quota

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use libplume::service::{PublishReceipt, UsageReport};
use libplume::types::Period;
use libplume::{Config, Database, PlumeError, PlumeService, Result};

#[derive(Parser, Debug)]
#[command(name = "plume")]
#[command(version, about = "AI-drafted posts for X with a monthly quota")]
#[command(long_about = r#"Generate short social posts with Gemini and publish them to X, keeping a
local monthly counter so the account stays under its posting quota.

EXAMPLES:
    # Draft, review, then publish (recommended)
    plume copilot "debugging async Rust"

    # Publish without review
    plume post "the borrow checker" --auto

    # Draft and review (same as copilot)
    plume post "unsafe fn myths"

    # Quota usage and posting statistics
    plume stats
    plume stats --format json
    plume stats --period 2026-07

CONFIGURATION:
    Credentials come from the environment (a .env file is honored):
        X_API_KEY, X_API_SECRET_KEY, X_ACCESS_TOKEN, X_ACCESS_TOKEN_SECRET
        GEMINI_API_KEY
    Optional:
        GEMINI_MODEL, PLUME_DB, PLUME_QUOTA_CEILING, PLUME_QUOTA_THRESHOLD,
        PLUME_PERSONA

EXIT CODES:
    0 - Success
    1 - Generation, publish, or database failure
    2 - Configuration error (missing or invalid environment variables)
    3 - Invalid input or duplicate content
    4 - Monthly quota exceeded
    5 - Draft discarded at review
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a draft and review it before publishing (recommended)
    Copilot {
        /// Topic for the post
        #[arg(required = true)]
        topic: Vec<String>,
    },

    /// Generate and publish a post
    Post {
        /// Topic for the post
        #[arg(required = true)]
        topic: Vec<String>,

        /// Skip the review prompt and publish immediately
        #[arg(long)]
        auto: bool,
    },

    /// Show quota usage and posting statistics
    Stats {
        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Period to report on (YYYY-MM, defaults to the current month)
        #[arg(long, value_name = "PERIOD")]
        period: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        if e.is_cancellation() {
            eprintln!("Discarded. Nothing was published.");
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    let db = Database::new(&config.database.path).await?;
    let service = PlumeService::new(&config, db);

    match cli.command {
        Command::Copilot { topic } => {
            let receipt = service.post_with_review(&topic.join(" ")).await?;
            print_receipt(&receipt);
        }
        Command::Post { topic, auto } => {
            let topic = topic.join(" ");
            let receipt = if auto {
                service.post_auto(&topic).await?
            } else {
                service.post_with_review(&topic).await?
            };
            print_receipt(&receipt);
        }
        Command::Stats { format, period } => {
            let report = match period {
                Some(period) => service.stats_for(period.parse::<Period>()?).await?,
                None => service.stats().await?,
            };
            print_report(&report, &format)?;
        }
    }

    Ok(())
}

fn print_receipt(receipt: &PublishReceipt) {
    println!("Published: {}", receipt.post_id);
    if let Some(url) = &receipt.url {
        println!("{}", url);
    }
    println!("Posts this month: {}/{}", receipt.used, receipt.ceiling);
}

fn print_report(report: &UsageReport, format: &str) -> Result<()> {
    if format == "json" {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| PlumeError::InvalidInput(format!("failed to render JSON: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    println!("Posting statistics");
    println!("{}", "=".repeat(40));
    println!("Period:           {}", report.period);
    println!("Posts used:       {}/{}", report.used, report.ceiling);
    println!("Remaining:        {}", report.remaining);
    println!("Total published:  {}", report.total_published);
    println!("{}", "=".repeat(40));

    if report.near_limit {
        println!("Warning: only {} posts remaining this month", report.remaining);
    }

    Ok(())
}
