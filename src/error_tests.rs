//! Tests for error types

#[cfg(test)]
mod tests {
    use super::super::error::CrawlerError;

    #[test]
    fn test_api_error() {
        let err = CrawlerError::Api("missing data field".to_string());
        assert!(err.to_string().contains("API error"));
        assert!(err.to_string().contains("missing data field"));
    }

    #[test]
    fn test_http_error_mentions_status_and_url() {
        let err = CrawlerError::Http {
            status: 502,
            url: "https://poe.com/api/gql_POST".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("gql_POST"));
    }

    #[test]
    fn test_missing_cookies() {
        let err = CrawlerError::MissingCookies("P_B".to_string());
        assert!(err.to_string().contains("P_B"));
        assert!(err.to_string().contains(".env"));
    }

    #[test]
    fn test_config_error() {
        let err = CrawlerError::Config("bad retry count".to_string());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_snapshot_error() {
        let err = CrawlerError::Snapshot("not a list".to_string());
        assert!(err.to_string().contains("Snapshot error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err: CrawlerError = json_err.into();
        assert!(matches!(err, CrawlerError::Json(_)));
        assert!(err.to_string().contains("JSON parsing error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CrawlerError = io_err.into();
        assert!(matches!(err, CrawlerError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_retryable_classification() {
        let http = CrawlerError::Http {
            status: 500,
            url: "u".to_string(),
        };
        assert!(http.is_retryable());
        assert!(!CrawlerError::Api("x".to_string()).is_retryable());
        assert!(!CrawlerError::Internal("x".to_string()).is_retryable());
    }

    #[test]
    fn test_error_debug() {
        let err = CrawlerError::Internal("unexpected".to_string());
        let debug = format!("{:?}", err);
        assert!(debug.contains("Internal"));
    }
}
