use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;

use momo_core::FilterCriteria;
use momo_dash::client::ApiClient;
use momo_dash::config::{self, Config};
use momo_dash::dashboard::{self, App};
use momo_dash::format::{format_date, format_opt_amount};
use momo_dash::logging;
use momo_dash::worker::run_worker;

#[derive(Parser, Debug)]
#[command(name = "momo", version, about = "Mobile-money transaction dashboard")]
struct Cli {
    /// Override the API base url from the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the interactive dashboard
    Dash,

    /// One-shot filtered fetch, printed to stdout
    Fetch {
        /// Exact transaction type (payment, incoming, bank_deposit, ...)
        #[arg(long = "type")]
        transaction_type: Option<String>,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        date_start: Option<String>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        date_end: Option<String>,

        /// Minimum amount, whole RWF
        #[arg(long)]
        amount_min: Option<i64>,

        /// Maximum amount, whole RWF
        #[arg(long)]
        amount_max: Option<i64>,

        /// Print the raw JSON array instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file if none exists
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config()?;
    if let Some(url) = cli.api_url {
        cfg.api.base_url = url;
    }

    match cli.command {
        Command::Dash => run_dash(cfg).await,

        Command::Fetch {
            transaction_type,
            date_start,
            date_end,
            amount_min,
            amount_max,
            json,
        } => {
            let criteria = FilterCriteria {
                transaction_type,
                date_start,
                date_end,
                amount_min,
                amount_max,
            };
            run_fetch(cfg, criteria, json).await
        }

        Command::InitConfig => config::init_config(),
    }
}

async fn run_dash(cfg: Config) -> Result<()> {
    logging::init()?;

    let client = ApiClient::new(&cfg.api.base_url, Duration::from_secs(cfg.api.timeout_secs))
        .context("building API client")?;

    let (req_tx, req_rx) = tokio::sync::mpsc::unbounded_channel();
    let (ev_tx, ev_rx) = std::sync::mpsc::channel();

    let debounce = Duration::from_millis(cfg.dashboard.debounce_ms);
    let worker = tokio::spawn(run_worker(client, req_rx, ev_tx, debounce));

    let mut app = App::new(&cfg, req_tx, ev_rx);
    app.apply_filters(); // initial unfiltered load

    let res = dashboard::run_dashboard(&mut app);

    drop(app); // closes the request channel; the worker loop exits
    worker.await.ok();

    res
}

async fn run_fetch(cfg: Config, criteria: FilterCriteria, json: bool) -> Result<()> {
    let client = ApiClient::new(&cfg.api.base_url, Duration::from_secs(cfg.api.timeout_secs))
        .context("building API client")?;

    let records = client
        .fetch_transactions(&criteria)
        .await
        .context("fetching transactions")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("Fetched {} transactions from {}\n", records.len(), cfg.api.base_url);
    for tx in &records {
        println!(
            "{} | {:<14} | {:>12} {} | {} | {}",
            format_date(&tx.timestamp),
            tx.transaction_type,
            format_opt_amount(tx.amount),
            cfg.dashboard.currency,
            tx.recipient.as_deref().unwrap_or("-"),
            tx.status,
        );
    }

    Ok(())
}
