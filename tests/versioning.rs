//! End-to-end tests of media-type versioned dispatch over real HTTP.

use chrono::NaiveDate;
use futures_util::future::join_all;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{json, Value};

use greeting_service::config::ServiceConfig;
use greeting_service::http::{ErrorBody, X_CORRELATION_ID};

mod common;
use common::*;

async fn get(client: &reqwest::Client, url: &str, accept: Option<&str>) -> reqwest::Response {
    let mut request = client.get(url);
    if let Some(accept) = accept {
        request = request.header(ACCEPT, accept);
    }
    request.send().await.unwrap()
}

fn content_type(response: &reqwest::Response) -> &str {
    response.headers()[CONTENT_TYPE].to_str().unwrap()
}

#[tokio::test]
async fn test_greet_v1_counts_from_one() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let response = get(&client, &server.url(&format!("{GREET}?name=Alice")), Some(GREETING_V1)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), GREETING_V1);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "sequence": 1, "text": "Hello, Alice!" }));

    let second: Value = get(&client, &server.url(GREET), Some(GREETING_V1))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(second, json!({ "sequence": 2, "text": "Hello, World!" }));

    server.stop().await;
}

#[tokio::test]
async fn test_greet_v2_and_default_version() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let explicit = get(&client, &server.url(GREET), Some(GREETING_V2)).await;
    assert_eq!(explicit.status(), StatusCode::OK);
    assert_eq!(content_type(&explicit), GREETING_V2);
    assert!(explicit.headers().get("deprecation").is_none());
    assert_eq!(explicit.json::<Value>().await.unwrap(), json!({ "text": "Hello, World!" }));

    for accept in [None, Some(""), Some("*/*"), Some("application/*")] {
        let response = get(&client, &server.url(&format!("{GREET}?name=Bob")), accept).await;
        assert_eq!(response.status(), StatusCode::OK, "accept {accept:?}");
        assert_eq!(content_type(&response), GREETING_V2, "accept {accept:?}");
        assert_eq!(response.json::<Value>().await.unwrap(), json!({ "text": "Hello, Bob!" }));
    }

    server.stop().await;
}

#[tokio::test]
async fn test_departures() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let current = get(&client, &server.url(DEPART), Some(DEPARTING_V1)).await;
    assert_eq!(current.status(), StatusCode::OK);
    assert_eq!(content_type(&current), DEPARTING_V1);
    let body: Value = current.json().await.unwrap();
    assert_eq!(body["text"], "Goodbye");
    let date = body["date"].as_str().unwrap();
    assert_eq!(date.len(), "MM/dd/yyyy HH:mm:ss:SSS".len(), "{date}");

    let legacy = get(&client, &server.url(LEGACY_DEPART), Some(GREETING_V1)).await;
    assert_eq!(legacy.status(), StatusCode::OK);
    assert_eq!(content_type(&legacy), GREETING_V1);
    assert_eq!(legacy.headers()["deprecation"], "true");
    assert_eq!(
        legacy.headers()["link"],
        "</flip/departing/depart>; rel=\"successor-version\""
    );
    assert_eq!(
        legacy.json::<Value>().await.unwrap(),
        json!({ "text": "Goodbye", "date": null })
    );

    server.stop().await;
}

#[tokio::test]
async fn test_generic_json_is_not_acceptable() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url(GREET))
        .header(ACCEPT, "application/json")
        .header(X_CORRELATION_ID, "trace-406")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(response.headers()[X_CORRELATION_ID], "trace-406");

    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.status, 406);
    assert_eq!(body.error, "Not Acceptable");
    assert!(body.message.contains("application/json"), "{}", body.message);
    assert_eq!(body.path, GREET);
    assert_eq!(body.trace_id, "trace-406");

    server.stop().await;
}

#[tokio::test]
async fn test_quality_values_and_exclusions() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let preferred = format!("{GREETING_V2};q=0.5, {GREETING_V1};q=0.9");
    let response = get(&client, &server.url(GREET), Some(preferred.as_str())).await;
    assert_eq!(content_type(&response), GREETING_V1);

    let excluded = format!("*/*, {GREETING_V2};q=0");
    let response = get(&client, &server.url(GREET), Some(excluded.as_str())).await;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);

    let with_params = format!("{GREETING_V1}; charset=utf-8");
    let response = get(&client, &server.url(GREET), Some(with_params.as_str())).await;
    assert_eq!(content_type(&response), GREETING_V1);

    server.stop().await;
}

#[tokio::test]
async fn test_deprecation_headers_with_sunset() {
    let mut config = ServiceConfig::default();
    config.api.greet_v1_sunset = NaiveDate::from_ymd_opt(2027, 1, 31);
    let server = spawn_with(config).await;
    let client = reqwest::Client::new();

    let response = get(&client, &server.url(GREET), Some(GREETING_V1)).await;
    let headers = response.headers();
    assert_eq!(headers["deprecation"], "true");
    assert_eq!(headers["sunset"], "Sun, 31 Jan 2027 00:00:00 GMT");
    let warning = headers["warning"].to_str().unwrap();
    assert!(warning.starts_with("299 - \"Deprecated since 1.3"), "{warning}");
    let link = headers["link"].to_str().unwrap();
    assert!(link.contains("rel=\"successor-version\""), "{link}");
    assert!(link.contains(GREETING_V2), "{link}");

    let current = get(&client, &server.url(GREET), Some(GREETING_V2)).await;
    assert!(current.headers().get("sunset").is_none());
    assert!(current.headers().get("warning").is_none());

    server.stop().await;
}

#[tokio::test]
async fn test_correlation_id_echoed_or_generated() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let echoed = client
        .get(server.url(GREET))
        .header(X_CORRELATION_ID, "client-supplied-id")
        .send()
        .await
        .unwrap();
    assert_eq!(echoed.headers()[X_CORRELATION_ID], "client-supplied-id");

    let generated = get(&client, &server.url(GREET), None).await;
    let id = generated.headers()[X_CORRELATION_ID].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok(), "{id}");

    let health = get(&client, &server.url("/actuator/health/liveness"), None).await;
    assert!(health.headers().contains_key(X_CORRELATION_ID));

    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_v1_requests_get_distinct_sequences() {
    const CONCURRENCY: u64 = 64;
    let server = spawn_server().await;
    let client = reqwest::Client::new();
    let url = server.url(GREET);

    let requests = (0..CONCURRENCY).map(|_| {
        let client = client.clone();
        let url = url.clone();
        async move {
            let body: Value = get(&client, &url, Some(GREETING_V1)).await.json().await.unwrap();
            body["sequence"].as_u64().unwrap()
        }
    });
    let mut sequences = join_all(requests).await;
    sequences.sort_unstable();
    assert_eq!(sequences, (1..=CONCURRENCY).collect::<Vec<_>>());

    server.stop().await;
}

#[tokio::test]
async fn test_error_statuses_share_body_shape() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let missing = get(&client, &server.url("/flip/greeting/unknown"), None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = missing.json().await.unwrap();
    assert_eq!(body.status, 404);
    assert_eq!(body.path, "/flip/greeting/unknown");

    let post = client.post(server.url(GREET)).send().await.unwrap();
    assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: ErrorBody = post.json().await.unwrap();
    assert_eq!(body.error, "Method Not Allowed");
    assert!(body.message.contains("POST"));

    let post_unknown = client.post(server.url("/nowhere")).send().await.unwrap();
    assert_eq!(post_unknown.status(), StatusCode::NOT_FOUND);

    server.stop().await;
}

#[tokio::test]
async fn test_query_and_trailing_slash() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let response = get(
        &client,
        &server.url(&format!("{GREET}/?name=Jos%C3%A9%20Mar%C3%ADa")),
        Some(GREETING_V2),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "text": "Hello, José María!" })
    );

    let empty_name = get(&client, &server.url(&format!("{GREET}?name=")), None).await;
    assert_eq!(
        empty_name.json::<Value>().await.unwrap(),
        json!({ "text": "Hello, World!" })
    );

    server.stop().await;
}

#[tokio::test]
async fn test_actuator_health_and_info() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let health = get(&client, &server.url("/actuator/health"), None).await;
    assert_eq!(health.status(), StatusCode::OK);
    let body: Value = health.json().await.unwrap();
    assert_eq!(body["status"], "UP");
    assert_eq!(body["components"]["livenessState"]["status"], "UP");
    assert_eq!(body["components"]["readinessState"]["status"], "UP");
    assert_eq!(body["components"]["ping"]["status"], "UP");
    assert_eq!(body["groups"][0], "liveness");
    assert_eq!(body["groups"][1], "readiness");

    for group in ["liveness", "readiness"] {
        let response = get(&client, &server.url(&format!("/actuator/health/{group}")), None).await;
        assert_eq!(response.status(), StatusCode::OK, "{group}");
        assert_eq!(response.json::<Value>().await.unwrap(), json!({ "status": "UP" }));
    }

    let info: Value = get(&client, &server.url("/actuator/info"), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(info["name"], "greeting-service");
    let routes = info["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 4);
    assert_eq!(
        routes[2],
        json!({ "path": LEGACY_DEPART, "media_type": GREETING_V1, "deprecated": true })
    );

    let health_state = server.health.clone();
    server.stop().await;
    assert!(!health_state.is_ready());
}

#[tokio::test]
async fn test_api_docs_describe_versions() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let response = get(&client, &server.url("/v3/api-docs"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = response.text().await.unwrap();
    for key in ["openapi", "info", "title", "version", "paths", "servers", "components"] {
        assert!(text.contains(key), "missing {key}");
    }

    let doc: Value = serde_json::from_str(&text).unwrap();
    let greet = &doc["paths"][GREET]["get"]["responses"]["200"]["content"];
    assert!(greet.get(GREETING_V1).is_some());
    assert!(greet.get(GREETING_V2).is_some());
    assert_eq!(greet[GREETING_V1]["x-deprecated"], true);
    assert_eq!(doc["paths"][LEGACY_DEPART]["get"]["deprecated"], true);
    assert!(doc["paths"][DEPART]["get"].get("deprecated").is_none());

    server.stop().await;
}

#[tokio::test]
async fn test_api_docs_title_from_config() {
    let mut config = ServiceConfig::default();
    config.openapi.title = "Greetings".to_string();
    config.openapi.version = "2025.1".to_string();
    let server = spawn_with(config).await;
    let client = reqwest::Client::new();

    let doc: Value = get(&client, &server.url("/v3/api-docs"), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(doc["info"]["title"], "Greetings");
    assert_eq!(doc["info"]["version"], "2025.1");

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_query_is_bad_request() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url(&format!("{GREET}?name=%FF")))
        .header(X_CORRELATION_ID, "bad-query")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.status, 400);
    assert_eq!(body.error, "Bad Request");
    assert_eq!(body.path, GREET);
    assert_eq!(body.trace_id, "bad-query");

    server.stop().await;
}
