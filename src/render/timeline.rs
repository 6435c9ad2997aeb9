//! Change timeline page

use super::{bot_url, escape, footer, BASE_STYLE, THEME_SCRIPT};
use crate::timeline::{NewBot, PriceChange, Timeline, TimelineEntry};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

const PAGE_STYLE: &str = r#"
        .timeline { position: relative; max-width: 1000px; margin: 0 auto; padding: 20px 0; }
        .timeline::after {
            content: '';
            position: absolute;
            width: 4px;
            background-color: var(--primary-color);
            top: 0;
            bottom: 0;
            left: 50%;
            margin-left: -2px;
            border-radius: 2px;
        }
        .timeline-item { padding: 10px 40px; position: relative; width: 50%; box-sizing: border-box; }
        .timeline-item.left { left: 0; }
        .timeline-item.right { left: 50%; }
        .timeline-date { font-weight: bold; font-size: 1.2rem; margin-bottom: 10px; color: var(--primary-color); }
        .timeline-content {
            padding: 20px;
            background-color: var(--card-bg);
            border-radius: 8px;
            box-shadow: var(--card-shadow);
        }
        .timeline-content h3 { margin: 0 0 10px; font-size: 1rem; }
        .timeline-content ul { list-style: none; padding: 0; margin: 0 0 15px; }
        .new-bot, .price-change { padding: 8px 10px; border-radius: 6px; margin-bottom: 6px; }
        .new-bot { background-color: var(--new-bot-bg); }
        .price-change { background-color: var(--price-change-bg); }
        .price-increase { color: var(--price-increase); font-weight: bold; }
        .price-decrease { color: var(--price-decrease); font-weight: bold; }
        .empty-state {
            text-align: center;
            padding: 60px 20px;
            background-color: var(--card-bg);
            border-radius: 8px;
            box-shadow: var(--card-shadow);
            color: var(--light-text);
        }
        @media screen and (max-width: 768px) {
            .timeline::after { left: 31px; }
            .timeline-item { width: 100%; padding-left: 70px; padding-right: 25px; }
            .timeline-item.right { left: 0; }
        }
"#;

/// Render the timeline, newest date first
pub fn render_timeline_page(timeline: &Timeline, date: NaiveDate) -> String {
    let entries: Vec<(&NaiveDate, &TimelineEntry)> = timeline
        .iter()
        .rev()
        .filter(|(_, entry)| !entry.is_empty())
        .collect();

    let body = if entries.is_empty() {
        r#"        <div class="empty-state">
            <h2>No changes recorded yet</h2>
            <p>New bots and price changes appear here once two or more daily snapshots exist.</p>
        </div>
"#
        .to_string()
    } else {
        let items: String = entries
            .iter()
            .enumerate()
            .map(|(i, (day, entry))| render_item(**day, entry, i % 2 == 0))
            .collect();
        format!("        <div class=\"timeline\">\n{}        </div>\n", items)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Poe Bot Timeline - {date}</title>
    <style>{base}{page}    </style>
</head>
<body>
    <div class="theme-toggle" id="themeToggle">☀️</div>
    <header>
        <div class="container">
            <h1>Poe Bot Timeline</h1>
            <p>New bots and price changes, updated {date}</p>
        </div>
    </header>
    <div class="container">
        <div class="info-bar">
            <p>Dates with changes: <strong>{count}</strong></p>
            <p><a href="index.html">Bot catalog</a></p>
        </div>
{body}    </div>
{footer}    <script>{theme}    </script>
</body>
</html>
"#,
        date = date,
        base = BASE_STYLE,
        page = PAGE_STYLE,
        count = entries.len(),
        body = body,
        footer = footer(date.year()),
        theme = THEME_SCRIPT,
    )
}

fn render_item(day: NaiveDate, entry: &TimelineEntry, left: bool) -> String {
    let mut content = String::new();

    if !entry.new_bots.is_empty() {
        let lines: String = entry.new_bots.iter().map(new_bot_line).collect();
        content.push_str(&format!("<h3>New bots</h3><ul>{}</ul>", lines));
    }
    if !entry.price_changes.is_empty() {
        let lines: String = entry.price_changes.iter().map(price_change_line).collect();
        content.push_str(&format!("<h3>Price changes</h3><ul>{}</ul>", lines));
    }

    format!(
        r#"            <div class="timeline-item {side}">
                <div class="timeline-date">{day}</div>
                <div class="timeline-content">{content}</div>
            </div>
"#,
        side = if left { "left" } else { "right" },
        day = day,
        content = content,
    )
}

fn new_bot_line(bot: &NewBot) -> String {
    let price = if bot.price > Decimal::ZERO {
        format!("{} points/message", bot.price.normalize())
    } else {
        "free".to_string()
    };
    format!(
        r#"<li class="new-bot"><a href="{}" target="_blank">{}</a> ({})</li>"#,
        bot_url(&bot.id),
        escape(&bot.name),
        price
    )
}

fn price_change_line(change: &PriceChange) -> String {
    let class = if change.is_increase() {
        "price-increase"
    } else {
        "price-decrease"
    };
    format!(
        r#"<li class="price-change"><a href="{}" target="_blank">{}</a>: <span class="{}">{} → {} points/message</span></li>"#,
        bot_url(&change.id),
        escape(&change.name),
        class,
        change.old_price.normalize(),
        change.new_price.normalize()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn new_bot(name: &str, price: Decimal) -> NewBot {
        NewBot {
            id: name.to_string(),
            bot_id: 1,
            name: name.to_string(),
            price,
        }
    }

    fn change(name: &str, old: Decimal, new: Decimal) -> PriceChange {
        PriceChange {
            id: name.to_string(),
            bot_id: 2,
            name: name.to_string(),
            old_price: old,
            new_price: new,
        }
    }

    #[test]
    fn test_empty_timeline_shows_empty_state() {
        let html = render_timeline_page(&Timeline::new(), day(1));
        assert!(html.contains("empty-state"));
        assert!(html.contains("Dates with changes: <strong>0</strong>"));
    }

    #[test]
    fn test_newest_first_alternating() {
        let mut timeline = Timeline::new();
        timeline.insert(
            day(2),
            TimelineEntry {
                new_bots: vec![new_bot("Older", dec!(10))],
                price_changes: vec![],
            },
        );
        timeline.insert(
            day(3),
            TimelineEntry {
                new_bots: vec![new_bot("Newer", Decimal::ZERO)],
                price_changes: vec![],
            },
        );

        let html = render_timeline_page(&timeline, day(3));
        let newer = html.find("2025-03-03</div>").unwrap();
        let older = html.find("2025-03-02</div>").unwrap();
        assert!(newer < older);
        let left = html.find("timeline-item left").unwrap();
        let right = html.find("timeline-item right").unwrap();
        assert!(left < newer && newer < right);
        assert!(html.contains("Newer</a> (free)"));
        assert!(html.contains("Older</a> (10 points/message)"));
    }

    #[test]
    fn test_price_change_classes() {
        let mut timeline = Timeline::new();
        timeline.insert(
            day(2),
            TimelineEntry {
                new_bots: vec![],
                price_changes: vec![
                    change("Up", dec!(10), dec!(12.0)),
                    change("Down", dec!(300), dec!(250)),
                ],
            },
        );

        let html = render_timeline_page(&timeline, day(2));
        assert!(html.contains(r#"<span class="price-increase">10 → 12 points/message</span>"#));
        assert!(html.contains(r#"<span class="price-decrease">300 → 250 points/message</span>"#));
    }

    #[test]
    fn test_names_escaped() {
        let mut timeline = Timeline::new();
        timeline.insert(
            day(2),
            TimelineEntry {
                new_bots: vec![new_bot("A&B", dec!(5))],
                price_changes: vec![],
            },
        );
        assert!(render_timeline_page(&timeline, day(2)).contains("A&amp;B"));
    }
}
