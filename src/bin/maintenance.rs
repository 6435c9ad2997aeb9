//! Maintenance utilities: refresh entry pages and prune old files.
//!
//! Runs without Poe cookies.

use clap::Parser;
use poe_crawler::{
    config::Config,
    logging,
    maintenance::{self, MaintenanceTasks},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poe-maintenance")]
#[command(about = "Poe crawler maintenance utilities")]
struct Cli {
    /// Copy the newest pages to index.html and timeline.html
    #[arg(long)]
    update_index: bool,

    /// Delete files older than --days
    #[arg(long)]
    clean_old_files: bool,

    /// Number of days to keep files (defaults to maintenance.keep_days)
    #[arg(long)]
    days: Option<u64>,

    /// Run all maintenance tasks (default when no task is given)
    #[arg(long)]
    all: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn tasks(&self, default_days: u64) -> MaintenanceTasks {
        let days = self.days.unwrap_or(default_days);
        if self.all || !(self.update_index || self.clean_old_files) {
            return MaintenanceTasks::all(days);
        }
        MaintenanceTasks {
            update_index: self.update_index,
            clean_old_files: self.clean_old_files,
            days,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config.output.logs().join("maintenance.log"))?;

    let tasks = cli.tasks(config.maintenance.keep_days);
    let report = maintenance::run(&tasks, &config.output);

    if tasks.update_index && report.index.is_none() {
        tracing::warn!("Failed to update index.html");
    }
    tracing::info!("Maintenance finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_runs_everything() {
        let cli = Cli::parse_from(["poe-maintenance"]);
        assert_eq!(cli.tasks(7), MaintenanceTasks::all(7));
    }

    #[test]
    fn test_single_task_with_days() {
        let cli = Cli::parse_from(["poe-maintenance", "--clean-old-files", "--days", "3"]);
        let tasks = cli.tasks(7);
        assert!(!tasks.update_index);
        assert!(tasks.clean_old_files);
        assert_eq!(tasks.days, 3);
    }

    #[test]
    fn test_all_overrides_single_flag() {
        let cli = Cli::parse_from(["poe-maintenance", "--update-index", "--all"]);
        assert_eq!(cli.tasks(14), MaintenanceTasks::all(14));
    }
}
