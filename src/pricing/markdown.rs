//! Rate-menu markdown parsing
//!
//! Poe publishes pricing as loosely formatted markdown tables. Each known
//! row layout has a pattern below; [`parse_rate_menu`] tries the table
//! shapes in a fixed order and the first shape that matches wins.

use crate::types::{Per, PointsPrice, PricingType, Rate, TierPrice};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

macro_rules! re {
    ($pat:expr) => {
        LazyLock::new(|| Regex::new($pat).expect("rate menu regex is valid"))
    };
}

// Per-character tables
static RE_CHAR_RATE: LazyLock<Regex> = re!(
    r"(?i)\|\s*(?:text\s+)?input\s*\|\s*(\d+)\s*points?\s*/\s*(?:(\d+)k\s*)?(characters?)\s*\|"
);
static RE_SINGLE_CHAR: LazyLock<Regex> =
    re!(r"(?i)\|\s*(?:text\s+)?input\s*\(?.*?\)?\s*\|\s*(\d+)\s*points?\s*/\s*character\s*\|");

// Mixed subscriber / non-subscriber tables
static RE_NON_SUB_HEADER: LazyLock<Regex> = re!(r"(?i)\*\*non-subscribers?\*\*");
static RE_SUB_HEADER: LazyLock<Regex> = re!(r"(?i)\*\*subscribers?\*\*");
static RE_TEXT_OUTPUT: LazyLock<Regex> =
    re!(r"(?i)\|\s*text output\s*\|\s*(\d+)\s*points/message\s*\|");
static RE_IMAGE_OUTPUT: LazyLock<Regex> =
    re!(r"(?i)\|\s*image output\s*\|\s*(\d+)\s*points/message\s*\|");
static RE_TIER_INPUT: LazyLock<Regex> = re!(
    r"(?i)\|\s*input\s*\|\s*(up to\s*)?(\d+)\s*points/(\d+)k\s*(tokens|characters)\s*(\(max\))?\s*\|"
);

// Flat tables
static RE_TOTAL_COST: LazyLock<Regex> =
    re!(r"(?i)\|\s*total cost\s*\|\s*(\d+)\s*points/message\s*\|");

// Variable tables
static RE_TEXT_INPUT_ONLY: LazyLock<Regex> =
    re!(r"(?i)\|\s*text input\s*\|\s*(\d+)\s*points\s*/\s*(\d+)k\s*(tokens|characters)\s*\|");
static RE_INPUT_TEXT: LazyLock<Regex> =
    re!(r"(?i)\|\s*input\s*\(text\)\s*\|\s*(\d+)\s*points/(\d+)k\s*(tokens|characters)\s*\|");
static RE_TEXT_INPUT: LazyLock<Regex> =
    re!(r"(?i)\|\s*text input\s*\|\s*(\d+)\s*points/(\d+)k\s*(tokens|characters)\s*\|");
static RE_INPUT: LazyLock<Regex> =
    re!(r"(?i)\|\s*input\s*\|\s*(\d+)\s*points/(\d+)k\s*(tokens|characters)\s*\|");
static RE_INPUT_IMAGE: LazyLock<Regex> =
    re!(r"(?i)\|\s*input\s*\(image\)\s*\|\s*(\d+)\s*points/(\d+)k\s*tokens\s*\|");
static RE_IMAGE_INPUT: LazyLock<Regex> =
    re!(r"(?i)\|\s*image input\s*\|\s*(\d+)\s*points/(\d+)k\s*tokens\s*\|");
static RE_CACHE_APPLIED: LazyLock<Regex> =
    re!(r"(?i)\|\s*chat history(?:\s*cache)?\s*\|\s*input rates are applied\s*\|");
static RE_CACHE_DISCOUNT: LazyLock<Regex> =
    re!(r"(?i)\|\s*chat history(?:\s*cache)?\s*discount\s*\|\s*(\d+)%\s*discount");
static RE_BOT_MESSAGE: LazyLock<Regex> =
    re!(r"(?i)\|\s*bot message\s*\|\s*(\d+)\s*points/message\s*\|");
static RE_OUTPUT: LazyLock<Regex> = re!(r"(?i)\|\s*output\s*\|\s*(\d+)\s*points/message\s*\|");

fn group<'t>(caps: &Captures<'t>, i: usize) -> &'t str {
    caps.get(i).map_or("", |m| m.as_str())
}

/// Captures of the first pattern that matches
fn first_match<'t>(patterns: &[&LazyLock<Regex>], text: &'t str) -> Option<Captures<'t>> {
    patterns.iter().find_map(|re| re.captures(text))
}

/// `N points / Mk <unit>` from groups (value, multiplier, unit)
fn per_thousand(caps: &Captures<'_>, value: usize, mult: usize, unit: usize) -> Rate {
    Rate::points(
        group(caps, value),
        Per::quantity(format!("{}k", group(caps, mult)), group(caps, unit).to_lowercase()),
    )
}

/// Parse a rate menu into a pricing record.
///
/// `pricing_type` and `standard_price` come from the same API payload and
/// steer the flat/variable shapes; character and mixed tables are detected
/// from the markdown alone. Never fails: unknown layouts produce a sparse
/// record.
pub fn parse_rate_menu(
    markdown: &str,
    pricing_type: Option<PricingType>,
    standard_price: Option<&str>,
) -> PointsPrice {
    if markdown.is_empty() {
        return PointsPrice::default();
    }
    let standard_price = nonzero_price(standard_price);

    if let Some(price) = parse_per_character(markdown) {
        return price;
    }

    if markdown.to_lowercase().contains("non-subscriber") {
        return parse_mixed(markdown);
    }

    if pricing_type == Some(PricingType::Flat) {
        return parse_flat(markdown, standard_price);
    }

    parse_variable(markdown, pricing_type, standard_price)
}

fn parse_per_character(markdown: &str) -> Option<PointsPrice> {
    if let Some(caps) = RE_CHAR_RATE.captures(markdown) {
        let value = group(&caps, 1);
        let (per_value, standard_per) = match caps.get(2) {
            Some(mult) => (
                format!("{}k", mult.as_str()),
                format!("{}k characters", mult.as_str()),
            ),
            None => ("1".to_string(), "characters".to_string()),
        };
        return Some(PointsPrice {
            text_input: Some(Rate::points(value, Per::quantity(per_value, "characters"))),
            standard_message: Some(Rate::points(value, Per::Unit(standard_per))),
            ..Default::default()
        });
    }

    let caps = RE_SINGLE_CHAR.captures(markdown)?;
    let value = group(&caps, 1);
    Some(PointsPrice {
        text_input: Some(Rate::points(value, Per::quantity("1", "characters"))),
        standard_message: Some(Rate::points(value, Per::Unit("character".to_string()))),
        ..Default::default()
    })
}

/// Split a mixed menu into its non-subscriber and subscriber sections.
///
/// The non-subscriber section runs from its header to the subscriber
/// header (or the end); the subscriber section runs to the end.
fn split_sections(markdown: &str) -> (Option<&str>, Option<&str>) {
    let non_sub = RE_NON_SUB_HEADER.find(markdown).map(|header| {
        let rest = &markdown[header.end()..];
        let end = RE_SUB_HEADER.find(rest).map_or(rest.len(), |m| m.start());
        &rest[..end]
    });
    let sub = RE_SUB_HEADER
        .find(markdown)
        .map(|header| &markdown[header.end()..]);
    (non_sub, sub)
}

fn message_rate(re: &Regex, section: &str) -> Option<Rate> {
    re.captures(section).map(|caps| Rate::per_message(group(&caps, 1)))
}

fn parse_tier(section: &str) -> TierPrice {
    let input = RE_TIER_INPUT.captures(section).map(|caps| {
        let mut rate = per_thousand(&caps, 2, 3, 4);
        rate.is_max = Some(caps.get(1).is_some() || caps.get(5).is_some());
        rate
    });

    TierPrice {
        text_output: message_rate(&RE_TEXT_OUTPUT, section),
        image_output: message_rate(&RE_IMAGE_OUTPUT, section),
        input,
    }
}

fn parse_mixed(markdown: &str) -> PointsPrice {
    let (non_sub, sub) = split_sections(markdown);
    let non_subscriber = non_sub.map(parse_tier).unwrap_or_default();
    let subscriber = sub.map(parse_tier).unwrap_or_default();

    let standard_message = non_subscriber
        .text_output
        .as_ref()
        .map(|rate| Rate::per_message(rate.value.clone()));

    PointsPrice {
        pricing_type: Some(PricingType::Mixed),
        standard_message,
        non_subscriber: Some(non_subscriber),
        subscriber: Some(subscriber),
        ..Default::default()
    }
}

fn parse_flat(markdown: &str, standard_price: Option<&str>) -> PointsPrice {
    let standard_message = RE_TOTAL_COST
        .captures(markdown)
        .map(|caps| Rate::per_message(group(&caps, 1)))
        .or_else(|| standard_price.map(Rate::per_message));

    PointsPrice {
        pricing_type: Some(PricingType::Flat),
        standard_message,
        ..Default::default()
    }
}

fn parse_variable(
    markdown: &str,
    pricing_type: Option<PricingType>,
    standard_price: Option<&str>,
) -> PointsPrice {
    let undefined = pricing_type == Some(PricingType::Undefined);
    let mut result = PointsPrice {
        pricing_type: Some(pricing_type.unwrap_or(PricingType::Variable)),
        ..Default::default()
    };

    // Undefined bots that only bill text input (e.g. TTS voices)
    if undefined {
        if let Some(caps) = RE_TEXT_INPUT_ONLY.captures(markdown) {
            result.pricing_type = Some(PricingType::TextInputOnly);
            result.text_input = Some(per_thousand(&caps, 1, 2, 3));
            result.standard_message = Some(Rate::per_message(group(&caps, 1)));
        }
    }

    if let Some(price) = standard_price {
        result.standard_message = Some(Rate::per_message(price));
    }

    if let Some(caps) = first_match(&[&RE_INPUT_TEXT, &RE_TEXT_INPUT, &RE_INPUT], markdown) {
        result.text_input = Some(per_thousand(&caps, 1, 2, 3));
    }

    if let Some(caps) = first_match(&[&RE_INPUT_IMAGE, &RE_IMAGE_INPUT], markdown) {
        result.image_input = Some(Rate::points(
            group(&caps, 1),
            Per::quantity(format!("{}k", group(&caps, 2)), "tokens"),
        ));
    }

    let discount: Option<u32> = RE_CACHE_DISCOUNT
        .captures(markdown)
        .and_then(|caps| group(&caps, 1).parse().ok());

    if RE_CACHE_APPLIED.is_match(markdown) {
        if let (Some(discount), Some(text_input)) = (discount, result.text_input.as_ref()) {
            result.cached_input = cached_rate(text_input, discount);
        }
    }

    if let Some(caps) = first_match(&[&RE_BOT_MESSAGE, &RE_OUTPUT], markdown) {
        result.output = Some(Rate::per_message(group(&caps, 1)));
    }

    if result.standard_message.is_none() {
        result.standard_message = result.output.clone();
    }

    result.chat_history_discount = discount.filter(|d| *d > 0);
    result
}

/// Cached input rate: the discount percentage of the text input rate,
/// rounded half up
fn cached_rate(text_input: &Rate, discount_pct: u32) -> Option<Rate> {
    let base: u64 = text_input.value.parse().ok()?;
    let cached = (base * u64::from(discount_pct) + 50) / 100;
    Some(Rate::points(cached.to_string(), text_input.per.clone()))
}

/// The API reports "no standard price" as 0; only other values count
pub(super) fn nonzero_price(price: Option<&str>) -> Option<&str> {
    price.filter(|p| Decimal::from_str(p.trim()).map_or(true, |v| !v.is_zero()))
}
