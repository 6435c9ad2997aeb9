//! Poe Bot Pricing Crawler
//!
//! Fetches the official Poe bot catalog, normalizes each bot's pricing
//! table, keeps dated snapshots and renders the catalog and change
//! timeline as static HTML.

pub mod catalog;
pub mod client;
pub mod config;
pub mod crawler;
pub mod error;
pub mod logging;
pub mod maintenance;
pub mod pricing;
pub mod render;
pub mod store;
pub mod timeline;
pub mod types;

#[cfg(test)]
mod error_tests;
