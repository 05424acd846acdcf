use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use crate::common::{
    TEST_API_KEY, crawl_request, json_body, setup_test_app, setup_test_app_no_auth, spawn_site,
};

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app();

    let response = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json, json!({"status": "healthy"}));
}

#[tokio::test]
async fn openapi_document_is_public() {
    let app = setup_test_app();

    let response = app
        .send(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/api/v1/crawl"]["post"].is_object());
    assert!(json["paths"]["/health"]["get"].is_object());
}

#[tokio::test]
async fn unauthenticated_request_returns_401() {
    let app = setup_test_app();

    let response = app
        .send(crawl_request(json!({"root_url": "https://example.com"}), None))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn wrong_api_key_returns_401() {
    let app = setup_test_app();

    let response = app
        .send(crawl_request(
            json!({"root_url": "https://example.com"}),
            Some("wrong-key"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn depth_out_of_range_returns_400() {
    let app = setup_test_app();

    let response = app
        .send(crawl_request(
            json!({"root_url": "https://example.com", "max_depth": 6}),
            Some(TEST_API_KEY),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "validation_error");
    assert!(
        json["message"].as_str().unwrap().contains("max_depth"),
        "{json}"
    );
}

#[tokio::test]
async fn negative_depth_returns_400() {
    let app = setup_test_app_no_auth();

    let response = app
        .send(crawl_request(
            json!({"root_url": "https://example.com", "max_depth": -1}),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unparseable_root_url_returns_400() {
    let app = setup_test_app_no_auth();

    let response = app
        .send(crawl_request(json!({"root_url": "not a url"}), None))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn unsupported_scheme_returns_400() {
    let app = setup_test_app_no_auth();

    let response = app
        .send(crawl_request(json!({"root_url": "ftp://example.com/"}), None))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_root_url_is_rejected() {
    let app = setup_test_app_no_auth();

    let response = app
        .send(crawl_request(json!({"max_depth": 2}), None))
        .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn oversized_body_returns_413() {
    let app = setup_test_app_no_auth();
    let padding = "x".repeat(depthcrawl_server::routes::MAX_BODY_BYTES + 1);

    let response = app
        .send(crawl_request(
            json!({"root_url": format!("https://example.com/{padding}")}),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn crawl_groups_links_by_depth() {
    let addr = spawn_site().await;
    let app = setup_test_app();

    let response = app
        .send(crawl_request(
            json!({"root_url": format!("http://{addr}"), "max_depth": 2}),
            Some(TEST_API_KEY),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;

    assert_eq!(json["root_url"], format!("http://{addr}/"));
    assert_eq!(json["max_depth"], 2);
    assert_eq!(json["total_links"], 4);
    assert_eq!(json["links_by_depth"]["0"], json!([format!("http://{addr}/")]));

    let mut depth_one: Vec<String> =
        serde_json::from_value(json["links_by_depth"]["1"].clone()).unwrap();
    depth_one.sort();
    assert_eq!(
        depth_one,
        vec![format!("http://{addr}/a"), format!("http://{addr}/b")]
    );
    assert_eq!(json["links_by_depth"]["2"], json!([format!("http://{addr}/c")]));
    assert_eq!(json["errors"], json!([]));
    assert!(json["crawl_time_seconds"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn crawl_defaults_to_depth_three() {
    let addr = spawn_site().await;
    let app = setup_test_app_no_auth();

    let response = app
        .send(crawl_request(json!({"root_url": format!("http://{addr}/")}), None))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["max_depth"], 3);
    assert_eq!(json["total_links"], 4);
}

#[tokio::test]
async fn unreachable_page_is_reported_not_fatal() {
    // Nothing listens on this port once the probe listener is dropped.
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = probe.local_addr().unwrap();
    drop(probe);
    let app = setup_test_app_no_auth();

    let response = app
        .send(crawl_request(
            json!({"root_url": format!("http://{addr}/"), "max_depth": 1}),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["total_links"], 1);
    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0]
            .as_str()
            .unwrap()
            .starts_with(&format!("Error crawling http://{addr}/")),
        "{errors:?}"
    );
}
