//! Snapshot diffing and the change timeline
//!
//! Two snapshots are compared by `bot_ID`. A bot that only exists in the
//! newer snapshot is a new bot; a bot whose numeric standard message price
//! differs between the two is a price change. Placeholder prices (`N/A`)
//! never produce a change, and removed bots are not reported.

use crate::types::BotRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// Changes detected on one date, keyed by that date in [`Timeline`]
pub type Timeline = BTreeMap<NaiveDate, TimelineEntry>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub new_bots: Vec<NewBot>,
    pub price_changes: Vec<PriceChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBot {
    /// Handle, used for the bot's URL
    pub id: String,
    pub bot_id: i64,
    pub name: String,
    /// Standard message price; zero when free or unknown
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub id: String,
    pub bot_id: i64,
    pub name: String,
    pub old_price: Decimal,
    pub new_price: Decimal,
}

impl TimelineEntry {
    pub fn is_empty(&self) -> bool {
        self.new_bots.is_empty() && self.price_changes.is_empty()
    }
}

impl PriceChange {
    pub fn is_increase(&self) -> bool {
        self.new_price > self.old_price
    }
}

/// Compare two snapshots; entries follow the newer snapshot's order.
///
/// Bots without an ID cannot be matched and are skipped; a repeated ID in
/// the newer snapshot is reported once.
pub fn diff_snapshots(old: &[BotRecord], new: &[BotRecord]) -> TimelineEntry {
    let previous: HashMap<i64, &BotRecord> = old
        .iter()
        .filter(|bot| bot.bot_id != 0)
        .map(|bot| (bot.bot_id, bot))
        .collect();
    let mut seen = HashSet::new();
    let mut entry = TimelineEntry::default();

    for bot in new {
        if bot.bot_id == 0 || !seen.insert(bot.bot_id) {
            continue;
        }
        match previous.get(&bot.bot_id) {
            None => entry.new_bots.push(NewBot {
                id: bot.handle.clone(),
                bot_id: bot.bot_id,
                name: bot.display_name.clone(),
                price: bot.points_price.standard_price().unwrap_or(Decimal::ZERO),
            }),
            Some(before) => {
                let (Some(old_price), Some(new_price)) = (
                    before.points_price.standard_price(),
                    bot.points_price.standard_price(),
                ) else {
                    continue;
                };
                if old_price != new_price {
                    entry.price_changes.push(PriceChange {
                        id: bot.handle.clone(),
                        bot_id: bot.bot_id,
                        name: bot.display_name.clone(),
                        old_price,
                        new_price,
                    });
                }
            }
        }
    }

    entry
}

/// Diff each consecutive pair of dated snapshots.
///
/// Input order does not matter. The oldest snapshot has no predecessor and
/// dates with no changes are left out.
pub fn build_timeline(snapshots: &[(NaiveDate, Vec<BotRecord>)]) -> Timeline {
    let mut ordered: Vec<&(NaiveDate, Vec<BotRecord>)> = snapshots.iter().collect();
    ordered.sort_by_key(|(date, _)| *date);

    let mut timeline = Timeline::new();
    for pair in ordered.windows(2) {
        let (_, old) = pair[0];
        let (date, new) = pair[1];
        let entry = diff_snapshots(old, new);
        if entry.is_empty() {
            debug!("No changes on {}", date);
            continue;
        }
        info!(
            "{}: {} new bots, {} price changes",
            date,
            entry.new_bots.len(),
            entry.price_changes.len()
        );
        timeline.insert(*date, entry);
    }

    timeline
}
