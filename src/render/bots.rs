//! Bot catalog page

use super::{bot_url, escape, footer, BASE_STYLE, THEME_SCRIPT};
use crate::types::{BotRecord, PointsPrice, PricingType, Rate, TierPrice};
use chrono::NaiveDate;

const PAGE_STYLE: &str = r#"
        .search-container { margin-bottom: 30px; }
        #searchInput {
            width: 100%;
            padding: 12px 20px;
            font-size: 16px;
            border: 1px solid var(--border-color);
            border-radius: 30px;
            background-color: var(--card-bg);
            color: var(--text-color);
            box-sizing: border-box;
        }
        .bot-grid {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(350px, 1fr));
            gap: 25px;
        }
        .bot-card {
            background-color: var(--card-bg);
            border-radius: 12px;
            box-shadow: var(--card-shadow);
            padding: 20px;
            transition: all 0.3s ease;
            display: flex;
            flex-direction: column;
        }
        .bot-card:hover { box-shadow: var(--card-hover-shadow); transform: translateY(-5px); }
        .bot-header { display: flex; align-items: center; margin-bottom: 15px; }
        .bot-avatar { width: 56px; height: 56px; border-radius: 50%; margin-right: 15px; object-fit: cover; }
        .bot-name { margin: 0; font-size: 1.3rem; }
        .bot-handle { color: var(--light-text); font-size: 0.9rem; }
        .bot-description { color: var(--light-text); flex-grow: 1; line-height: 1.5; }
        .bot-creator { font-size: 0.85rem; color: var(--light-text); margin-top: 10px; }
        .pricing { border-top: 1px solid var(--border-color); margin-top: 15px; padding-top: 15px; }
        .price-main { font-size: 1.2rem; font-weight: bold; color: var(--primary-color); }
        .price-type { display: inline-block; font-size: 0.75rem; padding: 2px 8px; border-radius: 10px;
            background-color: var(--info-bg); margin-left: 8px; font-weight: normal; }
        .price-details { list-style: none; padding: 0; margin: 10px 0 0; font-size: 0.9rem; }
        .price-details li { padding: 3px 0; }
        .price-tier { margin-top: 10px; }
        .price-tier h4 { margin: 0 0 5px; font-size: 0.95rem; }
        .price-unknown { color: var(--light-text); font-style: italic; }
        .filter-options { display: flex; gap: 10px; margin-top: 12px; flex-wrap: wrap; }
        .filter-select {
            padding: 8px 14px;
            border: 1px solid var(--border-color);
            border-radius: 20px;
            background-color: var(--card-bg);
            color: var(--text-color);
        }
        .update-badge { margin-left: 8px; font-size: 0.8rem; padding: 2px 8px; border-radius: 10px;
            background-color: var(--price-change-bg); }
        .hidden { display: none; }
"#;

const FILTER_SCRIPT: &str = r#"
        const searchInput = document.getElementById('searchInput');
        const priceFilter = document.getElementById('priceFilter');
        const sortOptions = document.getElementById('sortOptions');
        const botGrid = document.getElementById('botGrid');
        const cards = Array.from(document.querySelectorAll('.bot-card'));
        const visibleCount = document.getElementById('visibleCount');
        const price = card => parseFloat(card.dataset.price) || 0;
        const matchesPrice = (card, filter) => {
            if (filter === 'all') return true;
            if (filter === 'free') return price(card) <= 0;
            if (filter === 'paid') return price(card) > 0;
            return card.dataset.pricingType === filter;
        };
        const filterAndSortBots = () => {
            const term = searchInput.value.trim().toLowerCase();
            const filter = priceFilter.value;
            const sort = sortOptions.value;
            const ordered = cards.slice();
            if (sort === 'name-asc') ordered.sort((a, b) => a.dataset.name.localeCompare(b.dataset.name));
            if (sort === 'name-desc') ordered.sort((a, b) => b.dataset.name.localeCompare(a.dataset.name));
            if (sort === 'price-asc') ordered.sort((a, b) => price(a) - price(b));
            if (sort === 'price-desc') ordered.sort((a, b) => price(b) - price(a));
            let shown = 0;
            ordered.forEach(card => {
                botGrid.appendChild(card);
                const match = card.dataset.search.includes(term) && matchesPrice(card, filter);
                card.classList.toggle('hidden', !match);
                if (match) shown++;
            });
            visibleCount.textContent = shown;
        };
        searchInput.addEventListener('input', filterAndSortBots);
        priceFilter.addEventListener('change', filterAndSortBots);
        sortOptions.addEventListener('change', filterAndSortBots);
"#;

/// Render the catalog page for one snapshot
pub fn render_bots_page(bots: &[BotRecord], date: NaiveDate, year: i32) -> String {
    render_bots_page_with_updates(bots, date, year, false)
}

/// Same as [`render_bots_page`], flagging the timeline link when the
/// snapshot date has recorded changes
pub fn render_bots_page_with_updates(
    bots: &[BotRecord],
    date: NaiveDate,
    year: i32,
    has_updates: bool,
) -> String {
    let updates = if has_updates {
        r#" <span class="update-badge">New changes today</span>"#
    } else {
        ""
    };
    let total = bots.len();
    let paid = bots.iter().filter(|b| b.points_price.is_paid()).count();
    let free = total - paid;

    let cards: String = bots.iter().map(render_card).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Poe Official Bots - {date}</title>
    <style>{base}{page}    </style>
</head>
<body>
    <div class="theme-toggle" id="themeToggle">☀️</div>
    <header>
        <div class="container">
            <h1>Poe Official Bots</h1>
            <p>Pricing snapshot of {date}</p>
        </div>
    </header>
    <div class="container">
        <div class="info-bar">
            <p>Total bots: <strong>{total}</strong></p>
            <p>Paid: <strong>{paid}</strong></p>
            <p>Free: <strong>{free}</strong></p>
            <p>Showing: <strong id="visibleCount">{total}</strong></p>
            <p><a href="timeline.html">Change timeline</a>{updates}</p>
        </div>
        <div class="search-container">
            <input type="text" id="searchInput" placeholder="Search by name, handle, description or creator">
            <div class="filter-options">
                <select id="priceFilter" class="filter-select">
                    <option value="all">All prices</option>
                    <option value="free">Free</option>
                    <option value="paid">Paid</option>
                    <option value="flat">Flat pricing</option>
                    <option value="variable">Variable pricing</option>
                    <option value="mixed">Mixed pricing</option>
                    <option value="per_character">Per character</option>
                </select>
                <select id="sortOptions" class="filter-select">
                    <option value="default">Catalog order</option>
                    <option value="name-asc">Name (A-Z)</option>
                    <option value="name-desc">Name (Z-A)</option>
                    <option value="price-asc">Price (low to high)</option>
                    <option value="price-desc">Price (high to low)</option>
                </select>
            </div>
        </div>
        <div class="bot-grid" id="botGrid">
{cards}        </div>
    </div>
{footer}    <script>{theme}{filter}    </script>
</body>
</html>
"#,
        date = date,
        base = BASE_STYLE,
        page = PAGE_STYLE,
        updates = updates,
        total = total,
        paid = paid,
        free = free,
        cards = cards,
        footer = footer(year),
        theme = THEME_SCRIPT,
        filter = FILTER_SCRIPT,
    )
}

fn render_card(bot: &BotRecord) -> String {
    let search = escape(
        &format!(
            "{} {} {} {}",
            bot.display_name, bot.handle, bot.description, bot.creator.full_name
        )
        .to_lowercase(),
    );
    let url = bot_url(&bot.handle);
    let price = bot
        .points_price
        .standard_price()
        .map(|p| p.normalize().to_string())
        .unwrap_or_default();
    let pricing_type = bot
        .points_price
        .pricing_type
        .as_ref()
        .map_or("", PricingType::as_str);

    let avatar = if bot.picture_url.is_empty() {
        String::new()
    } else {
        format!(
            r#"<img class="bot-avatar" src="{}" alt="{}" loading="lazy">"#,
            escape(&bot.picture_url),
            escape(&bot.display_name)
        )
    };

    let creator = if bot.creator.full_name.is_empty() {
        String::new()
    } else {
        format!(
            r#"
                <div class="bot-creator">By {}</div>"#,
            escape(&bot.creator.full_name)
        )
    };

    format!(
        r#"            <div class="bot-card" data-search="{search}" data-name="{data_name}" data-price="{price}" data-pricing-type="{pricing_type}">
                <div class="bot-header">
                    {avatar}
                    <div>
                        <h3 class="bot-name"><a href="{url}" target="_blank">{name}</a></h3>
                        <a class="bot-handle" href="{url}" target="_blank">@{handle}</a>
                    </div>
                </div>
                <div class="bot-description">{description}</div>{creator}
                <div class="pricing">
                    {pricing}
                </div>
            </div>
"#,
        search = search,
        data_name = escape(&bot.display_name.to_lowercase()),
        price = price,
        pricing_type = escape(pricing_type),
        avatar = avatar,
        url = url,
        name = escape(&bot.display_name),
        handle = escape(&bot.handle),
        description = escape(&bot.description),
        creator = creator,
        pricing = render_pricing(&bot.points_price),
    )
}

/// Pricing block of a card, laid out by pricing type
fn render_pricing(price: &PointsPrice) -> String {
    if price.is_empty() {
        return r#"<p class="price-unknown">Pricing unavailable</p>"#.to_string();
    }

    let badge = price
        .pricing_type
        .as_ref()
        .map(|t| format!(r#"<span class="price-type">{}</span>"#, type_label(t)))
        .unwrap_or_default();

    let headline = price
        .standard_message
        .as_ref()
        .map(|rate| format!(r#"<div class="price-main">{}{}</div>"#, rate_text(rate), badge))
        .unwrap_or_default();

    let body = match price.pricing_type {
        Some(PricingType::Mixed) => {
            let mut tiers = String::new();
            if let Some(tier) = price.non_subscriber.as_ref().filter(|t| !t.is_empty()) {
                tiers.push_str(&render_tier("Non-subscribers", tier));
            }
            if let Some(tier) = price.subscriber.as_ref().filter(|t| !t.is_empty()) {
                tiers.push_str(&render_tier("Subscribers", tier));
            }
            tiers
        }
        _ => render_breakdown(price),
    };

    format!("{}{}", headline, body)
}

fn render_breakdown(price: &PointsPrice) -> String {
    if !price.has_breakdown() && price.chat_history_discount.is_none() {
        return String::new();
    }

    let mut items = String::new();
    let rows = [
        ("Text input", &price.text_input),
        ("Image input", &price.image_input),
        ("Cached input", &price.cached_input),
        ("Output", &price.output),
    ];
    for (label, rate) in rows {
        if let Some(rate) = rate {
            items.push_str(&format!("<li>{}: {}</li>", label, rate_text(rate)));
        }
    }
    if let Some(discount) = price.chat_history_discount {
        items.push_str(&format!("<li>Chat history cache discount: {}%</li>", discount));
    }

    format!(r#"<ul class="price-details">{}</ul>"#, items)
}

fn render_tier(title: &str, tier: &TierPrice) -> String {
    let mut items = String::new();
    let rows = [
        ("Input", &tier.input),
        ("Text output", &tier.text_output),
        ("Image output", &tier.image_output),
    ];
    for (label, rate) in rows {
        if let Some(rate) = rate {
            items.push_str(&format!("<li>{}: {}</li>", label, rate_text(rate)));
        }
    }
    format!(
        r#"<div class="price-tier"><h4>{}</h4><ul class="price-details">{}</ul></div>"#,
        title, items
    )
}

/// `up to 90 points/1k tokens`, or `N/A` for placeholders
fn rate_text(rate: &Rate) -> String {
    if rate.amount().is_none() {
        return escape(&rate.value);
    }
    let prefix = if rate.is_max == Some(true) { "up to " } else { "" };
    format!(
        "{}{} {}/{}",
        prefix,
        escape(&rate.value),
        escape(&rate.unit),
        escape(&rate.per.label())
    )
}

fn type_label(pricing_type: &PricingType) -> &'static str {
    match pricing_type {
        PricingType::Flat => "Flat",
        PricingType::Variable => "Variable",
        PricingType::Mixed => "Mixed",
        PricingType::PerCharacter => "Per character",
        PricingType::TextInputOnly => "Text input",
        PricingType::Undefined | PricingType::Unknown(_) => "Other",
    }
}
