use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::response::Html;
use axum::routing::get;
use http_body_util::BodyExt;
use tower::ServiceExt;

use depthcrawl_core::CrawlConfig;
use depthcrawl_server::routes;
use depthcrawl_server::state::AppState;

pub const TEST_API_KEY: &str = "test-secret-key";

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub async fn send(self, request: Request<Body>) -> Response<Body> {
        self.router.oneshot(request).await.unwrap()
    }
}

/// App with bearer auth enabled.
pub fn setup_test_app() -> TestApp {
    build(Some(TEST_API_KEY.to_string()))
}

/// App with no API key configured.
pub fn setup_test_app_no_auth() -> TestApp {
    build(None)
}

fn build(api_key: Option<String>) -> TestApp {
    let state = AppState::new(&CrawlConfig::default(), api_key).unwrap();
    TestApp {
        router: routes::router(Arc::new(state)),
    }
}

pub fn crawl_request(body: serde_json::Value, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/api/v1/crawl").header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("authorization", format!("Bearer {key}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Serve a small site on an ephemeral local port:
///
/// ```text
/// /      -> /a, /b, external
/// /a     -> /c
/// /b     -> /c, /a
/// /c     -> (none)
/// ```
pub async fn spawn_site() -> SocketAddr {
    let app = Router::new()
        .route(
            "/",
            get(|| async {
                Html(
                    r#"<a href="/a">A</a><a href="/b">B</a>
                       <a href="https://external.invalid/page">External</a>"#,
                )
            }),
        )
        .route("/a", get(|| async { Html(r#"<a href="/c">C</a>"#) }))
        .route(
            "/b",
            get(|| async { Html(r#"<a href="/c#x">C</a><a href="/a">A</a>"#) }),
        )
        .route("/c", get(|| async { Html("<p>end</p>") }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
