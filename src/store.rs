//! Dated JSON snapshots on disk
//!
//! Layout under the output directory:
//! - `json/official_bots_list_{date}.json`: catalog as fetched
//! - `json/official_bots_with_prices_{date}.json`: catalog with pricing (the snapshot)
//! - `bots/bot_{id}_{date}.json`: raw details responses, reused within a day

use crate::config::OutputConfig;
use crate::error::{CrawlerError, Result};
use crate::types::BotRecord;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const CATALOG_PREFIX: &str = "official_bots_list_";
const SNAPSHOT_PREFIX: &str = "official_bots_with_prices_";

/// Reads and writes dated catalog snapshots
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    json_dir: PathBuf,
    bots_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            json_dir: output.json_dir(),
            bots_dir: output.bots_dir(),
        }
    }

    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.json_dir).await?;
        tokio::fs::create_dir_all(&self.bots_dir).await?;
        Ok(())
    }

    pub fn catalog_path(&self, date: NaiveDate) -> PathBuf {
        self.json_dir
            .join(format!("{}{}.json", CATALOG_PREFIX, date.format(DATE_FORMAT)))
    }

    pub fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
        self.json_dir
            .join(format!("{}{}.json", SNAPSHOT_PREFIX, date.format(DATE_FORMAT)))
    }

    pub fn details_path(&self, bot_id: i64, date: NaiveDate) -> PathBuf {
        self.bots_dir
            .join(format!("bot_{}_{}.json", bot_id, date.format(DATE_FORMAT)))
    }

    /// Save the catalog as fetched, before pricing is merged
    pub async fn save_catalog(&self, date: NaiveDate, bots: &[BotRecord]) -> Result<PathBuf> {
        let path = self.catalog_path(date);
        write_json(&path, bots).await?;
        info!("Saved official bot list to {}", path.display());
        Ok(path)
    }

    /// Save the priced catalog for `date`
    pub async fn save_snapshot(&self, date: NaiveDate, bots: &[BotRecord]) -> Result<PathBuf> {
        let path = self.snapshot_path(date);
        write_json(&path, bots).await?;
        info!("Saved {} priced bots to {}", bots.len(), path.display());
        Ok(path)
    }

    /// Load a snapshot written as a list, or in the legacy index-keyed layout
    pub async fn load_snapshot(path: &Path) -> Result<Vec<BotRecord>> {
        let content = tokio::fs::read_to_string(path).await?;
        let raw: Value = serde_json::from_str(&content)?;
        parse_snapshot(raw).map_err(|e| match e {
            CrawlerError::Snapshot(msg) => {
                CrawlerError::Snapshot(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Priced snapshots on disk, oldest first
    pub async fn list_snapshots(&self) -> Result<Vec<(NaiveDate, PathBuf)>> {
        let mut snapshots = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.json_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(snapshots),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(date) = snapshot_date(name) {
                snapshots.push((date, path));
            }
        }

        snapshots.sort_by_key(|(date, _)| *date);
        Ok(snapshots)
    }

    /// Every readable snapshot, oldest first; unreadable files are skipped
    pub async fn load_all(&self) -> Result<Vec<(NaiveDate, Vec<BotRecord>)>> {
        let mut loaded = Vec::new();
        for (date, path) in self.list_snapshots().await? {
            match Self::load_snapshot(&path).await {
                Ok(bots) => loaded.push((date, bots)),
                Err(e) => warn!("Skipping snapshot {}: {}", path.display(), e),
            }
        }
        Ok(loaded)
    }

    /// Raw details saved earlier the same day, if any
    pub async fn cached_details(&self, bot_id: i64, date: NaiveDate) -> Option<Value> {
        let path = self.details_path(bot_id, date);
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => {
                debug!("Using cached details for bot ID {}", bot_id);
                Some(value)
            }
            Err(e) => {
                warn!("Ignoring corrupt cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    pub async fn save_details(&self, bot_id: i64, date: NaiveDate, details: &Value) -> Result<PathBuf> {
        let path = self.details_path(bot_id, date);
        write_json(&path, details).await?;
        debug!("Saved details for bot ID {} to {}", bot_id, path.display());
        Ok(path)
    }
}

/// Date encoded in a priced snapshot file name
fn snapshot_date(file_name: &str) -> Option<NaiveDate> {
    let date = file_name
        .strip_prefix(SNAPSHOT_PREFIX)?
        .strip_suffix(".json")?;
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

fn parse_snapshot(raw: Value) -> Result<Vec<BotRecord>> {
    match raw {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(CrawlerError::from))
            .collect(),
        Value::Object(map) => {
            let mut indexed = Vec::with_capacity(map.len());
            for (key, item) in map {
                let index: usize = key.parse().map_err(|_| {
                    CrawlerError::Snapshot(format!("unexpected key {:?}", key))
                })?;
                indexed.push((index, serde_json::from_value::<BotRecord>(item)?));
            }
            indexed.sort_by_key(|(index, _)| *index);
            Ok(indexed.into_iter().map(|(_, bot)| bot).collect())
        }
        other => Err(CrawlerError::Snapshot(format!(
            "expected a list or object, found {}",
            other
        ))),
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(data)?;
    tokio::fs::write(path, json.as_bytes()).await?;
    Ok(())
}
