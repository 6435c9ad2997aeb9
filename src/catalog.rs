//! Official bot catalog extraction

use crate::client::ExploreBotsResponse;
use crate::error::Result;
use crate::types::{BotRecord, Creator, PointsPrice};
use serde_json::Value;
use tracing::{info, warn};

/// Turn a raw explore-bots response into catalog records, in API order.
///
/// Nodes without a `botId` are kept so the rendered page matches the API
/// listing; they are skipped when details are fetched.
pub fn process_bots_data(raw: &Value) -> Result<Vec<BotRecord>> {
    let response: ExploreBotsResponse = serde_json::from_value(raw.clone())?;

    let Some(connection) = response.data.and_then(|d| d.connection) else {
        warn!("Response has no exploreBotsConnection; catalog is empty");
        return Ok(Vec::new());
    };

    let bots: Vec<BotRecord> = connection
        .edges
        .into_iter()
        .filter_map(|edge| edge.node)
        .map(|node| BotRecord {
            display_name: node.display_name.unwrap_or_default(),
            description: node.description.unwrap_or_default(),
            bot_id: node.bot_id.unwrap_or_default(),
            handle: node.handle.unwrap_or_default(),
            picture_url: node.picture.and_then(|p| p.url).unwrap_or_default(),
            creator: Creator::default(),
            points_price: PointsPrice::default(),
        })
        .collect();

    info!("Processed {} bots", bots.len());
    Ok(bots)
}
