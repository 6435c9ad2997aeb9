//! Tests for client module

use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, max_retries: u32) -> ApiConfig {
    ApiConfig {
        url: format!("{}/api/gql_POST", server.uri()),
        max_retries,
        retry_delay_secs: 0,
        timeout_secs: 5,
        ..ApiConfig::default()
    }
}

fn test_cookies() -> Cookies {
    Cookies {
        p_b: "pb-token".to_string(),
        p_lat: "plat-token".to_string(),
    }
}

#[tokio::test]
async fn test_bot_list_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/gql_POST"))
        .and(header("poegraphql", "1"))
        .and(header("cookie", "p-b=pb-token; p-lat=plat-token"))
        .and(body_partial_json(json!({
            "queryName": BOT_LIST_QUERY,
            "variables": {"categoryName": "defaultCategory", "count": 25535},
            "extensions": {"hash": ApiConfig::default().list_query_hash},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"exploreBotsConnection": {"edges": []}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = PoeClient::new(test_config(&server, 1), &test_cookies()).unwrap();
    let body = client.fetch_bot_list().await.unwrap();
    assert!(body["data"]["exploreBotsConnection"]["edges"].is_array());
}

#[tokio::test]
async fn test_bot_details_sends_bot_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "queryName": BOT_DETAILS_QUERY,
            "variables": {"botId": 1234},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"botById": {"botId": 1234, "displayName": "Claude"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = PoeClient::new(test_config(&server, 1), &test_cookies()).unwrap();
    let body = client.fetch_bot_details(1234).await.unwrap();
    assert_eq!(body["data"]["botById"]["displayName"], "Claude");
}

#[tokio::test]
async fn test_retries_after_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = PoeClient::new(test_config(&server, 5), &test_cookies()).unwrap();
    let body = client.fetch_bot_list().await.unwrap();
    assert!(body["data"].is_object());
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = PoeClient::new(test_config(&server, 3), &test_cookies()).unwrap();
    let err = client.fetch_bot_details(7).await.unwrap_err();
    assert!(matches!(err, CrawlerError::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_graphql_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "PersistedQueryNotFound"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = PoeClient::new(test_config(&server, 4), &test_cookies()).unwrap();
    let err = client.fetch_bot_list().await.unwrap_err();
    match err {
        CrawlerError::Api(msg) => assert!(msg.contains("PersistedQueryNotFound")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_cookie_rejected() {
    let cookies = Cookies {
        p_b: "bad\nvalue".to_string(),
        p_lat: "x".to_string(),
    };
    let result = PoeClient::new(ApiConfig::default(), &cookies);
    assert!(matches!(result, Err(CrawlerError::Config(_))));
}

#[test]
fn test_details_response_parsing() {
    let raw = json!({
        "data": {"botById": {
            "botId": 99,
            "displayName": "Gemini",
            "botPricing": {
                "rateMenuMarkdown": "| Total cost | 20 points/message |",
                "botPricingType": "flat",
                "standardMessagePrice": 20
            },
            "creator": {"fullName": "Google", "profilePhotoUrl": "https://img/g.png"}
        }}
    });
    let bot = serde_json::from_value::<BotDetailsResponse>(raw)
        .unwrap()
        .into_bot()
        .unwrap();
    assert_eq!(bot.bot_id, Some(99));
    let pricing = bot.pricing.unwrap();
    assert_eq!(pricing.standard_price_text().as_deref(), Some("20"));
    assert_eq!(pricing.pricing_type.as_deref(), Some("flat"));
    assert_eq!(bot.creator.unwrap().full_name.as_deref(), Some("Google"));
}

#[test]
fn test_details_response_with_nulls() {
    let raw = json!({"data": {"botById": {"botId": 5, "botPricing": null, "creator": null}}});
    let bot = serde_json::from_value::<BotDetailsResponse>(raw)
        .unwrap()
        .into_bot()
        .unwrap();
    assert!(bot.pricing.is_none());
    assert!(bot.creator.is_none());
}
