//! Core data types shared across the crawler

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Placeholder used when no price could be determined
pub const PRICE_UNAVAILABLE: &str = "N/A";

/// Older snapshots carry `null` wherever the API returned null
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One bot in the official catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "bot_ID", default, deserialize_with = "null_as_default")]
    pub bot_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub handle: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub picture_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: Creator,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points_price: PointsPrice,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_photo_url: String,
}

impl Creator {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty() && self.profile_photo_url.is_empty()
    }
}

/// How a bot bills messages. Serialized as its snake_case name; types the
/// crawler does not know keep the API's own string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PricingType {
    Flat,
    Variable,
    Mixed,
    PerCharacter,
    TextInputOnly,
    Undefined,
    Unknown(String),
}

impl PricingType {
    /// Map the API's `botPricingType`. Empty means "not reported".
    pub fn from_api(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.to_ascii_lowercase().as_str() {
            "flat" => Self::Flat,
            "variable" => Self::Variable,
            "mixed" => Self::Mixed,
            "undefined" => Self::Undefined,
            _ => Self::Unknown(raw.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Flat => "flat",
            Self::Variable => "variable",
            Self::Mixed => "mixed",
            Self::PerCharacter => "per_character",
            Self::TextInputOnly => "text_input_only",
            Self::Undefined => "undefined",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for PricingType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "flat" => Self::Flat,
            "variable" => Self::Variable,
            "mixed" => Self::Mixed,
            "per_character" => Self::PerCharacter,
            "text_input_only" => Self::TextInputOnly,
            "undefined" => Self::Undefined,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<PricingType> for String {
    fn from(pricing_type: PricingType) -> Self {
        match pricing_type {
            PricingType::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// What a rate is charged against: either a bare word (`"message"`) or a
/// quantity such as `{ "value": "1k", "unit": "tokens" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Per {
    Quantity { value: String, unit: String },
    Unit(String),
}

impl Per {
    pub fn message() -> Self {
        Per::Unit("message".to_string())
    }

    pub fn quantity(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Per::Quantity {
            value: value.into(),
            unit: unit.into(),
        }
    }

    /// Human-readable form, e.g. `1k tokens` or `message`
    pub fn label(&self) -> String {
        match self {
            Per::Unit(unit) => unit.clone(),
            Per::Quantity { value, unit } if value == "1" => unit.clone(),
            Per::Quantity { value, unit } => format!("{} {}", value, unit),
        }
    }
}

/// Normalized cost rate: `value` points per `per`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub value: String,
    pub unit: String,
    pub per: Per,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_max: Option<bool>,
}

impl Rate {
    pub fn points(value: impl Into<String>, per: Per) -> Self {
        Self {
            value: value.into(),
            unit: "points".to_string(),
            per,
            is_max: None,
        }
    }

    pub fn per_message(value: impl Into<String>) -> Self {
        Self::points(value, Per::message())
    }

    pub fn unavailable() -> Self {
        Self::per_message(PRICE_UNAVAILABLE)
    }

    /// Numeric value, `None` for placeholders
    pub fn amount(&self) -> Option<Decimal> {
        Decimal::from_str(self.value.trim()).ok()
    }
}

/// Rates for one audience of a mixed-pricing bot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPrice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_output: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_output: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Rate>,
}

impl TierPrice {
    pub fn is_empty(&self) -> bool {
        self.text_output.is_none() && self.image_output.is_none() && self.input.is_none()
    }
}

/// Normalized pricing of a bot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsPrice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_type: Option<PricingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_message: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_input: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_input: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_input: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_subscriber: Option<TierPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<TierPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_history_discount: Option<u32>,
}

impl PointsPrice {
    pub fn is_empty(&self) -> bool {
        *self == PointsPrice::default()
    }

    /// Standard message price when it is a number
    pub fn standard_price(&self) -> Option<Decimal> {
        self.standard_message.as_ref().and_then(Rate::amount)
    }

    /// A bot is paid when its standard message costs more than zero points
    pub fn is_paid(&self) -> bool {
        self.standard_price().is_some_and(|p| p > Decimal::ZERO)
    }

    /// Whether any itemized rate (input/output/cache) is present
    pub fn has_breakdown(&self) -> bool {
        self.text_input.is_some()
            || self.image_input.is_some()
            || self.cached_input.is_some()
            || self.output.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bot_record_uses_original_keys() {
        let bot = BotRecord {
            display_name: "GPT-4o".to_string(),
            bot_id: 42,
            handle: "GPT-4o".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&bot).unwrap();
        assert_eq!(json["bot_ID"], 42);
        assert_eq!(json["display_name"], "GPT-4o");
        // empty pricing serializes as an empty object
        assert_eq!(json["points_price"], serde_json::json!({}));
    }

    #[test]
    fn test_per_untagged_forms() {
        let bare: Per = serde_json::from_str(r#""message""#).unwrap();
        assert_eq!(bare, Per::message());

        let qty: Per = serde_json::from_str(r#"{"value":"1k","unit":"tokens"}"#).unwrap();
        assert_eq!(qty, Per::quantity("1k", "tokens"));
        assert_eq!(qty.label(), "1k tokens");
        assert_eq!(Per::quantity("1", "characters").label(), "characters");
    }

    #[test]
    fn test_pricing_type_from_api() {
        assert_eq!(PricingType::from_api("flat"), Some(PricingType::Flat));
        assert_eq!(PricingType::from_api("Variable"), Some(PricingType::Variable));
        assert_eq!(PricingType::from_api(""), None);
        assert_eq!(
            PricingType::from_api("tiered"),
            Some(PricingType::Unknown("tiered".to_string()))
        );
    }

    #[test]
    fn test_unknown_pricing_type_keeps_api_value() {
        let price: PointsPrice =
            serde_json::from_str(r#"{"pricing_type":"something_new"}"#).unwrap();
        assert_eq!(
            price.pricing_type,
            Some(PricingType::Unknown("something_new".to_string()))
        );
        let json = serde_json::to_value(&price).unwrap();
        assert_eq!(json["pricing_type"], "something_new");
    }

    #[test]
    fn test_pricing_type_names_round_trip() {
        let price: PointsPrice =
            serde_json::from_str(r#"{"pricing_type":"per_character"}"#).unwrap();
        assert_eq!(price.pricing_type, Some(PricingType::PerCharacter));
        let json = serde_json::to_value(&price).unwrap();
        assert_eq!(json["pricing_type"], "per_character");
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let bot: BotRecord = serde_json::from_str(
            r#"{"display_name": "Legacy", "description": null, "bot_ID": null,
                "handle": null, "picture_url": null, "creator": null, "points_price": null}"#,
        )
        .unwrap();
        assert_eq!(bot.display_name, "Legacy");
        assert_eq!(bot.description, "");
        assert_eq!(bot.bot_id, 0);
        assert!(bot.creator.is_empty());
        assert!(bot.points_price.is_empty());
    }

    #[test]
    fn test_standard_price_and_paid() {
        let mut price = PointsPrice {
            standard_message: Some(Rate::per_message("150")),
            ..Default::default()
        };
        assert_eq!(price.standard_price(), Some(dec!(150)));
        assert!(price.is_paid());

        price.standard_message = Some(Rate::unavailable());
        assert_eq!(price.standard_price(), None);
        assert!(!price.is_paid());

        price.standard_message = Some(Rate::per_message("0"));
        assert!(!price.is_paid());
    }

    #[test]
    fn test_rate_is_max_omitted_when_unset() {
        let json = serde_json::to_string(&Rate::per_message("10")).unwrap();
        assert!(!json.contains("is_max"));
    }
}
