//! Raw response shapes of the Poe GraphQL API
//!
//! Every field is optional: the API omits or nulls fields freely and the
//! crawler treats absence as "unknown" rather than an error.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct ExploreBotsResponse {
    #[serde(default)]
    pub data: Option<ExploreBotsData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExploreBotsData {
    #[serde(rename = "exploreBotsConnection", default)]
    pub connection: Option<BotConnection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BotConnection {
    #[serde(default)]
    pub edges: Vec<BotEdge>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BotEdge {
    #[serde(default)]
    pub node: Option<BotNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BotNode {
    #[serde(rename = "botId", default)]
    pub bot_id: Option<i64>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub picture: Option<Picture>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Picture {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BotDetailsResponse {
    #[serde(default)]
    pub data: Option<BotDetailsData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BotDetailsData {
    #[serde(rename = "botById", default)]
    pub bot: Option<BotDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotDetails {
    #[serde(rename = "botId", default)]
    pub bot_id: Option<i64>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "botPricing", default)]
    pub pricing: Option<BotPricing>,
    #[serde(default)]
    pub creator: Option<RawCreator>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotPricing {
    #[serde(rename = "rateMenuMarkdown", default)]
    pub rate_menu_markdown: Option<String>,
    #[serde(rename = "botPricingType", default)]
    pub pricing_type: Option<String>,
    /// Number in practice, occasionally a string
    #[serde(rename = "standardMessagePrice", default)]
    pub standard_message_price: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCreator {
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    #[serde(rename = "profilePhotoUrl", default)]
    pub profile_photo_url: Option<String>,
}

impl BotDetailsResponse {
    /// The `botById` node, if the response carried one
    pub fn into_bot(self) -> Option<BotDetails> {
        self.data.and_then(|d| d.bot)
    }
}

impl BotPricing {
    /// Standard message price as text, e.g. `150`
    pub fn standard_price_text(&self) -> Option<String> {
        match self.standard_message_price.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}
