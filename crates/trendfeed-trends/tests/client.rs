//! Integration tests for `SerpApiClient` using wiremock HTTP mocks.

use trendfeed_trends::{normalize_trending_items, SerpApiClient, TrendingNowParams, TrendsError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SerpApiClient {
    SerpApiClient::with_base_url(Some("test-key"), 5, 5, &format!("{base_url}/search"))
        .expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_trending_now_returns_items_and_meta() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "search_metadata": { "status": "Success" },
        "trending_searches": [
            {
                "query": "환율",
                "start_timestamp": 1_735_689_600,
                "active": true,
                "search_volume": 20000,
                "increase_percentage": 1000,
                "categories": [{ "id": 3, "name": "Business and Finance" }],
                "serpapi_google_trends_link": "https://serpapi.com/search.json?q=x"
            },
            { "query": "날씨", "search_volume": 5000 }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engine", "google_trends_trending_now"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("geo", "KR"))
        .and(query_param("hl", "ko"))
        .and(query_param("hours", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .fetch_trending_now(&TrendingNowParams::default())
        .await
        .expect("should fetch");

    assert_eq!(response.items.len(), 2);
    assert_eq!(response.meta.count, 2);
    assert_eq!(response.meta.geo, "KR");
    assert!(response.meta.error.is_none());

    let normalized = normalize_trending_items(&response.items);
    assert_eq!(normalized[0].title.as_deref(), Some("환율"));
    assert_eq!(
        normalized[0].categories.as_deref(),
        Some("Business and Finance")
    );
    assert_eq!(normalized[1].search_volume, Some(5000));
}

#[tokio::test]
async fn provider_error_field_is_reported_in_meta() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "Google Trends hasn't returned any results" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .fetch_trending_now(&TrendingNowParams::default())
        .await
        .expect("200 with error field is not a transport failure");

    assert!(response.items.is_empty());
    assert_eq!(response.meta.count, 0);
    assert_eq!(
        response.meta.error.as_deref(),
        Some("Google Trends hasn't returned any results")
    );
}

#[tokio::test]
async fn optional_params_are_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("category_id", "17"))
        .and(query_param("no_cache", "true"))
        .and(query_param("hours", "24"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "trending_searches": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let params = TrendingNowParams {
        hours: 24,
        category_id: Some(17),
        no_cache: true,
        ..TrendingNowParams::default()
    };
    let response = client.fetch_trending_now(&params).await.expect("fetch");
    assert!(response.items.is_empty());
}

#[tokio::test]
async fn non_2xx_status_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_trending_now(&TrendingNowParams::default())
        .await
        .expect_err("401 should fail");
    assert!(matches!(err, TrendsError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn invalid_json_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_trending_now(&TrendingNowParams::default())
        .await
        .expect_err("html should fail");
    assert!(matches!(err, TrendsError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_api_key_fails_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = SerpApiClient::with_base_url(None, 5, 5, &server.uri()).expect("client");
    let err = client
        .fetch_trending_now(&TrendingNowParams::default())
        .await
        .expect_err("no key");
    assert!(matches!(err, TrendsError::MissingApiKey));
}
