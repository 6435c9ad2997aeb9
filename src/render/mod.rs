//! Static HTML pages
//!
//! Pages are plain strings assembled with `format!`; every value taken from
//! the API goes through [`escape`] first.

mod bots;
mod timeline;

pub use bots::{render_bots_page, render_bots_page_with_updates};
pub use timeline::render_timeline_page;

use crate::config::OutputConfig;
use crate::error::Result;
use crate::store::DATE_FORMAT;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// Public profile URL of a bot
pub fn bot_url(handle: &str) -> String {
    format!("https://poe.com/{}", escape(handle))
}

/// Escape text for use in element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes rendered pages and keeps the fixed entry pages current
#[derive(Debug, Clone)]
pub struct PageWriter {
    result_dir: PathBuf,
    history_dir: PathBuf,
    timeline_dir: PathBuf,
}

impl PageWriter {
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            result_dir: output.result_dir(),
            history_dir: output.history_dir(),
            timeline_dir: output.timeline_dir(),
        }
    }

    /// `history/bots_{date}.html`, copied to `index.html`
    pub async fn write_bots_page(&self, date: NaiveDate, html: &str) -> Result<PathBuf> {
        let path = self
            .history_dir
            .join(format!("bots_{}.html", date.format(DATE_FORMAT)));
        write_page(&path, html).await?;
        publish(&path, &self.result_dir.join("index.html")).await?;
        info!("Bot page saved to {}", path.display());
        Ok(path)
    }

    /// `timeline/timeline_{date}.html`, copied to `timeline.html`
    pub async fn write_timeline_page(&self, date: NaiveDate, html: &str) -> Result<PathBuf> {
        let path = self
            .timeline_dir
            .join(format!("timeline_{}.html", date.format(DATE_FORMAT)));
        write_page(&path, html).await?;
        publish(&path, &self.result_dir.join("timeline.html")).await?;
        info!("Timeline page saved to {}", path.display());
        Ok(path)
    }
}

async fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, html.as_bytes()).await?;
    Ok(())
}

async fn publish(page: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::copy(page, target).await?;
    Ok(())
}

/// Colors, layout and the theme toggle shared by both pages
const BASE_STYLE: &str = r#"
        :root {
            --primary-color: #4361ee;
            --secondary-color: #3f37c9;
            --text-color: #333;
            --light-text: #6c757d;
            --bg-color: #f8f9fa;
            --card-bg: #fff;
            --card-shadow: 0 5px 15px rgba(0, 0, 0, 0.05);
            --card-hover-shadow: 0 15px 30px rgba(0, 0, 0, 0.1);
            --header-bg: linear-gradient(135deg, #4361ee 0%, #3a0ca3 100%);
            --border-color: #e9ecef;
            --info-bg: #e7f5ff;
            --toggle-bg: #f1f1f1;
            --toggle-dot: #4361ee;
            --new-bot-bg: #e7f5ff;
            --price-change-bg: #fff3cd;
            --price-increase: #dc3545;
            --price-decrease: #28a745;
        }
        [data-theme="dark"] {
            --primary-color: #4cc9f0;
            --secondary-color: #4895ef;
            --text-color: #e9ecef;
            --light-text: #adb5bd;
            --bg-color: #121212;
            --card-bg: #1e1e1e;
            --card-shadow: 0 5px 15px rgba(0, 0, 0, 0.2);
            --card-hover-shadow: 0 15px 30px rgba(0, 0, 0, 0.3);
            --header-bg: linear-gradient(135deg, #4cc9f0 0%, #3a0ca3 100%);
            --border-color: #2d3748;
            --info-bg: #1a365d;
            --toggle-bg: #2d3748;
            --toggle-dot: #4cc9f0;
            --new-bot-bg: #1a365d;
            --price-change-bg: #332701;
            --price-increase: #e74c3c;
            --price-decrease: #2ecc71;
        }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            margin: 0;
            background-color: var(--bg-color);
            color: var(--text-color);
            transition: all 0.3s ease;
        }
        .container { max-width: 1200px; margin: 0 auto; padding: 0 20px; }
        header {
            background: var(--header-bg);
            color: white;
            padding: 40px 0;
            text-align: center;
            margin-bottom: 30px;
        }
        header h1 { margin: 0; font-size: 2.5rem; }
        header p { margin: 10px 0 0; opacity: 0.9; }
        .theme-toggle {
            position: fixed;
            top: 20px;
            right: 20px;
            z-index: 1000;
            background-color: var(--toggle-bg);
            border-radius: 30px;
            padding: 5px 10px;
            cursor: pointer;
        }
        .info-bar {
            background-color: var(--info-bg);
            padding: 15px;
            border-radius: 8px;
            margin-bottom: 30px;
            display: flex;
            justify-content: space-between;
            flex-wrap: wrap;
        }
        .info-bar p { margin: 5px 0; }
        a { color: var(--primary-color); text-decoration: none; }
        a:hover { text-decoration: underline; }
        footer { text-align: center; padding: 30px 0; color: var(--light-text); font-size: 0.9rem; }
"#;

const THEME_SCRIPT: &str = r#"
        const themeToggle = document.getElementById('themeToggle');
        const prefersDark = window.matchMedia('(prefers-color-scheme: dark)');
        const savedTheme = localStorage.getItem('theme') || (prefersDark.matches ? 'dark' : 'light');
        const applyTheme = (theme) => {
            if (theme === 'dark') {
                document.body.setAttribute('data-theme', 'dark');
                themeToggle.textContent = '🌙';
            } else {
                document.body.removeAttribute('data-theme');
                themeToggle.textContent = '☀️';
            }
        };
        applyTheme(savedTheme);
        themeToggle.addEventListener('click', () => {
            const next = document.body.getAttribute('data-theme') === 'dark' ? 'light' : 'dark';
            applyTheme(next);
            localStorage.setItem('theme', next);
        });
"#;

fn footer(year: i32) -> String {
    format!(
        r#"    <footer>
        <div class="container">
            <p>© {} Poe Bot Crawler. Data from <a href="https://poe.com" target="_blank">Poe.com</a>.</p>
        </div>
    </footer>
"#,
        year
    )
}
