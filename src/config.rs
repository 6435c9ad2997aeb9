//! Configuration management

use crate::error::{CrawlerError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "poe_crawler.toml";

/// Prefix for environment overrides, e.g. `POE_CRAWLER__API__MAX_RETRIES=3`
pub const ENV_PREFIX: &str = "POE_CRAWLER";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// GraphQL endpoint
    pub url: String,
    /// Persisted query hash for `ExploreBotsListPaginationQuery`
    pub list_query_hash: String,
    /// Persisted query hash for `MessagePointsOverviewModalQuery`
    pub details_query_hash: String,
    /// Page size requested for the bot list (large enough for one page)
    pub list_page_size: u32,
    /// Attempts per request, including the first one
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub retry_delay_secs: u64,
    /// Per-request timeout
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root for json/, bots/ and result/
    pub base_dir: String,
    pub logs_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Files older than this many days are removed by cleanup
    pub keep_days: u64,
}

/// Session cookie pair sent with every API request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookies {
    pub p_b: String,
    pub p_lat: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://poe.com/api/gql_POST".to_string(),
            list_query_hash: "b24b2f2f6da147b3345eec1a433ed17b6e1332df97dea47622868f41078a40cc"
                .to_string(),
            details_query_hash: "6fd0395447f45865f1ef2bb029eb99aafb1a865d91d8634d1c7103cd7bc08009"
                .to_string(),
            list_page_size: 25535,
            max_retries: 5,
            retry_delay_secs: 1,
            timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: "output".to_string(),
            logs_dir: "logs".to_string(),
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self { keep_days: 7 }
    }
}

impl Config {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `path` must exist; otherwise `poe_crawler.toml` is used
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Cookies and overrides may live in .env
        dotenvy::dotenv().ok();

        let file = match path {
            Some(p) => {
                let expanded = shellexpand::tilde(&p.to_string_lossy()).into_owned();
                config::File::from(PathBuf::from(expanded)).required(true)
            }
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api.max_retries == 0 {
            return Err(CrawlerError::Config(
                "api.max_retries must be at least 1".to_string(),
            ));
        }
        if self.api.url.trim().is_empty() {
            return Err(CrawlerError::Config("api.url is empty".to_string()));
        }
        Ok(())
    }
}

impl OutputConfig {
    pub fn base(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.base_dir).as_ref())
    }

    /// Dated catalog snapshots
    pub fn json_dir(&self) -> PathBuf {
        self.base().join("json")
    }

    /// Raw per-bot detail responses
    pub fn bots_dir(&self) -> PathBuf {
        self.base().join("bots")
    }

    pub fn result_dir(&self) -> PathBuf {
        self.base().join("result")
    }

    /// Dated bot catalog pages
    pub fn history_dir(&self) -> PathBuf {
        self.result_dir().join("history")
    }

    /// Dated timeline pages
    pub fn timeline_dir(&self) -> PathBuf {
        self.result_dir().join("timeline")
    }

    pub fn logs(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.logs_dir).as_ref())
    }
}

impl Cookies {
    /// Read `P_B` and `P_LAT` from the environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self> {
        let read = |key: &str| -> Result<String> {
            std::env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CrawlerError::MissingCookies(key.to_string()))
        };

        Ok(Self {
            p_b: read("P_B")?,
            p_lat: read("P_LAT")?,
        })
    }

    /// Value for the `Cookie` request header
    pub fn header_value(&self) -> String {
        format!("p-b={}; p-lat={}", self.p_b, self.p_lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.max_retries, 5);
        assert_eq!(config.api.retry_delay_secs, 1);
        assert_eq!(config.api.list_page_size, 25535);
        assert_eq!(config.maintenance.keep_days, 7);
        assert!(config.api.url.ends_with("/api/gql_POST"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [api]
            max_retries = 2

            [output]
            base_dir = "/tmp/poe"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.api.max_retries, 2);
        assert_eq!(parsed.api.timeout_secs, 30);
        assert_eq!(parsed.output.base_dir, "/tmp/poe");
        assert_eq!(parsed.output.logs_dir, "logs");
        assert_eq!(parsed.maintenance.keep_days, 7);
    }

    #[test]
    fn test_output_layout() {
        let output = OutputConfig {
            base_dir: "/srv/poe".to_string(),
            logs_dir: "/srv/logs".to_string(),
        };
        assert_eq!(output.json_dir(), PathBuf::from("/srv/poe/json"));
        assert_eq!(output.bots_dir(), PathBuf::from("/srv/poe/bots"));
        assert_eq!(output.history_dir(), PathBuf::from("/srv/poe/result/history"));
        assert_eq!(output.timeline_dir(), PathBuf::from("/srv/poe/result/timeline"));
        assert_eq!(output.logs(), PathBuf::from("/srv/logs"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawler.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[maintenance]\nkeep_days = 14\n[api]\nretry_delay_secs = 3").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.maintenance.keep_days, 14);
        assert_eq!(config.api.retry_delay_secs, 3);
        assert_eq!(config.api.max_retries, 5);
    }

    #[test]
    fn test_load_rejects_zero_retries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawler.toml");
        std::fs::write(&path, "[api]\nmax_retries = 0\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, CrawlerError::Config(_)));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_cookie_header() {
        let cookies = Cookies {
            p_b: "abc".to_string(),
            p_lat: "xyz".to_string(),
        };
        assert_eq!(cookies.header_value(), "p-b=abc; p-lat=xyz");
    }
}
