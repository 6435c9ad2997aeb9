//! Bot pricing extraction
//!
//! Turns a bot details payload into a normalized [`PointsPrice`]:
//! - Known per-character bots are special-cased by display name
//! - Everything else goes through the rate-menu markdown parser
//! - Every record that has pricing ends up with a `standard_message`

mod markdown;

pub use markdown::parse_rate_menu;

use markdown::nonzero_price;

use crate::client::types::{BotDetails, BotPricing, RawCreator};
use crate::types::{Creator, Per, PointsPrice, PricingType, Rate};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// The Assistant bot's pricing is not served by the details query
pub const ASSISTANT_BOT_ID: i64 = 3002;

const ASSISTANT_RATE_MENU: &str = "**Non-Subscribers**\n\n\
| Service | Rate |\n|---------|------|\n\
| Text Output | 15 points/message |\n\
| Image Output | 62 points/message |\n\n\
**Subscribers**\n\n\
| Service | Rate |\n|---------|------|\n\
| Input | 90 points/1k tokens (max) |\n\
| Text Output | 267 points/message |\n\
| Image Output | 1334 points/message |";

const ASSISTANT_CREATOR: &str = "Poe";
const ASSISTANT_PHOTO_URL: &str =
    "https://qph.cf2.poecdn.net/main-thumb-2187163946-50-eexyawnwrihdoupubqqzwkbjvasbkqhd.jpeg";

static RE_ELEVENLABS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Input \(text\) \| (\d+) points? / character").expect("elevenlabs regex is valid")
});
static RE_CARTESIA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Text input \| (\d+) points / 1k characters").expect("cartesia regex is valid")
});

/// Extract normalized pricing from a bot details payload.
///
/// Returns an empty record when the payload has no pricing block at all.
pub fn extract_bot_pricing(details: &BotDetails) -> PointsPrice {
    let Some(pricing) = details.pricing.as_ref() else {
        warn!(
            "No bot pricing information found for bot {}",
            details.bot_id.unwrap_or_default()
        );
        return PointsPrice::default();
    };

    let markdown = pricing.rate_menu_markdown.as_deref().unwrap_or("");
    let name = details.display_name.as_deref().unwrap_or("");

    if let Some(price) = per_character_override(name, markdown) {
        return price;
    }

    let mut pricing_type = pricing.pricing_type.as_deref().and_then(PricingType::from_api);
    if pricing_type == Some(PricingType::Undefined)
        && markdown.to_lowercase().contains("subscriber")
    {
        pricing_type = Some(PricingType::Mixed);
    }

    let standard_price = pricing.standard_price_text();
    let standard_price = nonzero_price(standard_price.as_deref());
    let mut info = parse_rate_menu(markdown, pricing_type.clone(), standard_price);

    if info.standard_message.is_none() {
        info.standard_message = Some(fallback_standard_message(&info, pricing_type, standard_price));
    }

    info
}

/// Bots whose tables name the vendor layout rather than a generic one
fn per_character_override(name: &str, markdown: &str) -> Option<PointsPrice> {
    let (re, per_label, per_value): (&Regex, &str, &str) = match name {
        "ElevenLabs" => (&*RE_ELEVENLABS, "character", "1"),
        "Cartesia" => (&*RE_CARTESIA, "1k characters", "1k"),
        _ => return None,
    };

    let caps = re.captures(markdown)?;
    let value = caps.get(1)?.as_str();

    Some(PointsPrice {
        pricing_type: Some(PricingType::PerCharacter),
        standard_message: Some(Rate::points(value, Per::Unit(per_label.to_string()))),
        text_input: Some(Rate::points(value, Per::quantity(per_value, "characters"))),
        ..Default::default()
    })
}

/// Standard message price for records the parser left without one.
///
/// Walks the type-specific sources first, then any text input rate, and
/// finally settles on the `N/A` placeholder.
fn fallback_standard_message(
    info: &PointsPrice,
    pricing_type: Option<PricingType>,
    standard_price: Option<&str>,
) -> Rate {
    let by_type = match pricing_type {
        Some(PricingType::Flat) => standard_price.map(Rate::per_message),
        Some(PricingType::Variable) => info
            .output
            .clone()
            .or_else(|| standard_price.map(Rate::per_message)),
        Some(PricingType::Mixed) => info
            .non_subscriber
            .as_ref()
            .and_then(|tier| tier.text_output.as_ref())
            .map(|rate| Rate::per_message(rate.value.clone())),
        _ => None,
    };

    by_type
        .or_else(|| {
            info.text_input
                .as_ref()
                .map(|rate| Rate::per_message(rate.value.clone()))
        })
        .unwrap_or_else(Rate::unavailable)
}

/// Creator name and avatar; empty strings when absent
pub fn extract_creator_info(details: &BotDetails) -> Creator {
    details
        .creator
        .as_ref()
        .map(|c| Creator {
            full_name: c.full_name.clone().unwrap_or_default(),
            profile_photo_url: c.profile_photo_url.clone().unwrap_or_default(),
        })
        .unwrap_or_default()
}

/// Built-in details for the Assistant bot
pub fn assistant_details() -> BotDetails {
    BotDetails {
        bot_id: Some(ASSISTANT_BOT_ID),
        display_name: Some("Assistant".to_string()),
        pricing: Some(BotPricing {
            rate_menu_markdown: Some(ASSISTANT_RATE_MENU.to_string()),
            pricing_type: Some("mixed".to_string()),
            standard_message_price: None,
        }),
        creator: Some(RawCreator {
            full_name: Some(ASSISTANT_CREATOR.to_string()),
            profile_photo_url: Some(ASSISTANT_PHOTO_URL.to_string()),
        }),
    }
}
