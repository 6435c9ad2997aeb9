//! Poe bot pricing crawler
//!
//! Fetches today's catalog and pricing, stores the snapshot and regenerates
//! the catalog and timeline pages.

use chrono::{Local, NaiveDate};
use clap::Parser;
use poe_crawler::{
    client::PoeClient,
    config::{Config, Cookies},
    crawler::Crawler,
    logging,
    store::DATE_FORMAT,
};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poe-crawler")]
#[command(about = "Crawl Poe official bots and their pricing")]
struct Cli {
    /// Config file path (defaults to poe_crawler.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot date, YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Output directory, overrides output.base_dir
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(output) = cli.output {
        config.output.base_dir = output;
    }
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());

    let log_file = config
        .output
        .logs()
        .join(format!("poe_crawler_{}.log", date.format(DATE_FORMAT)));
    logging::init(&log_file)?;

    let cookies = Cookies::from_env()?;
    let client = PoeClient::new(config.api.clone(), &cookies)?;
    let crawler = Crawler::new(client, &config.output).with_progress(std::io::stderr().is_terminal());

    match crawler.run(date).await {
        Ok(report) => {
            println!("\nResults saved to:");
            println!("- Bot list: {}", report.snapshot_path.display());
            println!("- HTML display: {}", report.bots_page.display());
            println!("- Timeline: {}", report.timeline_page.display());
            println!("- Log file: {}", log_file.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
