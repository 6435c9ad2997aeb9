//! One crawl: catalog → pricing → snapshot → timeline → pages

use crate::catalog::process_bots_data;
use crate::client::{BotDetails, BotDetailsResponse, BotSource};
use crate::config::OutputConfig;
use crate::error::Result;
use crate::pricing::{assistant_details, extract_bot_pricing, extract_creator_info, ASSISTANT_BOT_ID};
use crate::render::{render_bots_page_with_updates, render_timeline_page, PageWriter};
use crate::store::SnapshotStore;
use crate::timeline::build_timeline;
use crate::types::BotRecord;
use chrono::{Datelike, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Outcome of a run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub date: NaiveDate,
    pub total_bots: usize,
    /// Bots whose details were merged
    pub priced_bots: usize,
    /// Bots whose details could not be fetched or decoded
    pub failed_bots: usize,
    pub catalog_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub bots_page: PathBuf,
    pub timeline_page: PathBuf,
    /// Dates with at least one change
    pub timeline_dates: usize,
}

#[derive(Debug, Default)]
struct EnrichStats {
    priced: usize,
    failed: usize,
}

/// Runs the pipeline against a [`BotSource`]
pub struct Crawler<S: BotSource> {
    source: S,
    store: SnapshotStore,
    pages: PageWriter,
    show_progress: bool,
}

impl<S: BotSource> Crawler<S> {
    pub fn new(source: S, output: &OutputConfig) -> Self {
        Self {
            source,
            store: SnapshotStore::new(output),
            pages: PageWriter::new(output),
            show_progress: false,
        }
    }

    /// Draw a progress bar over the per-bot loop
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn run(&self, date: NaiveDate) -> Result<RunReport> {
        info!("Starting Poe crawler for {}", date);
        self.store.ensure_dirs().await?;

        let raw = self.source.fetch_bot_list().await?;
        let mut bots = process_bots_data(&raw)?;
        info!("Retrieved {} bots", bots.len());
        let catalog_path = self.store.save_catalog(date, &bots).await?;

        let stats = self.enrich(&mut bots, date).await;
        info!(
            "Details merged for {} bots, {} failed",
            stats.priced, stats.failed
        );
        let snapshot_path = self.store.save_snapshot(date, &bots).await?;

        let snapshots = self.store.load_all().await?;
        let timeline = build_timeline(&snapshots);
        info!(
            "Timeline built from {} snapshots, {} dates with changes",
            snapshots.len(),
            timeline.len()
        );

        let has_updates = timeline.contains_key(&date);
        let bots_html = render_bots_page_with_updates(&bots, date, date.year(), has_updates);
        let bots_page = self.pages.write_bots_page(date, &bots_html).await?;
        let timeline_page = self
            .pages
            .write_timeline_page(date, &render_timeline_page(&timeline, date))
            .await?;

        info!("Poe crawler completed successfully");
        Ok(RunReport {
            date,
            total_bots: bots.len(),
            priced_bots: stats.priced,
            failed_bots: stats.failed,
            catalog_path,
            snapshot_path,
            bots_page,
            timeline_page,
            timeline_dates: timeline.len(),
        })
    }

    /// Merge pricing and creator into each bot. A failing bot keeps its
    /// empty pricing and the loop continues.
    async fn enrich(&self, bots: &mut [BotRecord], date: NaiveDate) -> EnrichStats {
        let mut stats = EnrichStats::default();
        let progress = self.progress_bar(bots.len() as u64);

        for bot in bots.iter_mut() {
            progress.inc(1);
            if bot.bot_id == 0 {
                debug!("Skipping {:?}: no bot ID", bot.display_name);
                continue;
            }
            progress.set_message(bot.display_name.clone());

            match self.load_details(bot.bot_id, date).await {
                Ok(details) => {
                    bot.points_price = extract_bot_pricing(&details);
                    bot.creator = extract_creator_info(&details);
                    stats.priced += 1;
                    debug!("Processed details for bot ID {}", bot.bot_id);
                }
                Err(e) => {
                    error!("Error processing details for bot ID {}: {}", bot.bot_id, e);
                    stats.failed += 1;
                }
            }
        }

        progress.finish_and_clear();
        stats
    }

    /// Built-in details for the Assistant, the day's cache, or the API
    async fn load_details(&self, bot_id: i64, date: NaiveDate) -> Result<BotDetails> {
        if bot_id == ASSISTANT_BOT_ID {
            info!("Using built-in pricing for Assistant bot (ID {})", ASSISTANT_BOT_ID);
            return Ok(assistant_details());
        }

        let raw = match self.store.cached_details(bot_id, date).await {
            Some(raw) => raw,
            None => {
                let raw = self.source.fetch_bot_details(bot_id).await?;
                self.store.save_details(bot_id, date, &raw).await?;
                raw
            }
        };

        let response: BotDetailsResponse = serde_json::from_value(raw)?;
        Ok(response.into_bot().unwrap_or_default())
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        ProgressBar::new(len).with_style(style)
    }
}
