//! Client tests against a local mock backend.
//!
//! Each test spins up an axum server on an ephemeral port and points an
//! [`ApiClient`] at it.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Json as ExtractJson;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use taxchat_api::{ApiClient, ApiError};
use taxchat_core::models::query::QueryRequest;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(format!("http://{addr}")).unwrap()
}

fn taxpayer_json(id: &str, first: &str, last: &str) -> Value {
    json!({
        "id": id,
        "firstName": first,
        "lastName": last,
        "email": format!("{}@example.com", first.to_lowercase()),
        "createdAt": "2023-01-15T09:30:00Z"
    })
}

#[tokio::test]
async fn get_taxpayers_decodes_the_list() {
    let router = Router::new().route(
        "/api/v1/taxpayers",
        get(|| async {
            Json(json!([
                taxpayer_json("tp-1", "Ada", "Lovelace"),
                taxpayer_json("tp-2", "Alan", "Turing"),
            ]))
        }),
    );
    let addr = serve(router).await;

    let taxpayers = client_for(addr).get_taxpayers().await.unwrap();
    assert_eq!(taxpayers.len(), 2);
    assert_eq!(taxpayers[0].full_name(), "Ada Lovelace");
}

#[tokio::test]
async fn get_taxpayers_non_success_is_an_http_error() {
    let router = Router::new().route(
        "/api/v1/taxpayers",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = serve(router).await;

    let err = client_for(addr).get_taxpayers().await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 500 }));
}

#[tokio::test]
async fn process_query_posts_the_wire_body_and_decodes_the_answer() {
    let router = Router::new().route(
        "/api/v1/chat/process-query",
        post(|ExtractJson(body): ExtractJson<Value>| async move {
            assert_eq!(body["query"], "What was my total income last year?");
            assert_eq!(body["taxpayerId"], "tp-1");
            assert_eq!(body["sessionId"], "default");
            Json(json!({
                "response": "Your 2023 income was $82,000.",
                "sqlQuery": "SELECT SUM(wages) FROM w2 WHERE year = 2023",
                "confidence": 0.91,
                "executionTimeMs": 204,
                "timestamp": "2024-04-01T12:00:00Z"
            }))
        }),
    );
    let addr = serve(router).await;

    let request = QueryRequest::new("What was my total income last year?", "tp-1", None);
    let answer = client_for(addr).process_query(&request).await.unwrap();
    assert_eq!(answer.response, "Your 2023 income was $82,000.");
    assert_eq!(answer.confidence, Some(0.91));
    assert_eq!(answer.execution_time_ms, Some(204));
}

#[tokio::test]
async fn get_status_accepts_a_healthy_200() {
    let router = Router::new().route(
        "/api/v1/status",
        get(|| async {
            Json(json!({
                "timestamp": "2024-04-01T12:00:00Z",
                "overallStatus": "Healthy",
                "services": [],
                "issues": []
            }))
        }),
    );
    let addr = serve(router).await;

    let status = client_for(addr).get_status().await.unwrap();
    assert!(status.is_healthy());
}

#[tokio::test]
async fn get_status_decodes_a_critical_503_body() {
    // A 503 with a structured body is a valid poll, not a fetch failure.
    let router = Router::new().route(
        "/api/v1/status",
        get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "timestamp": "2024-04-01T12:00:00Z",
                    "overallStatus": "Critical",
                    "services": [
                        {
                            "name": "Database",
                            "status": "Critical",
                            "description": "SQL database connectivity",
                            "issue": "connection refused",
                            "lastChecked": "2024-04-01T12:00:00Z"
                        }
                    ],
                    "issues": ["Database unreachable"]
                })),
            )
        }),
    );
    let addr = serve(router).await;

    let status = client_for(addr).get_status().await.unwrap();
    assert!(!status.is_healthy());
    assert_eq!(status.degraded_services().count(), 1);
}

#[tokio::test]
async fn get_status_other_statuses_are_http_errors() {
    let router = Router::new(); // no /api/v1/status route → 404
    let addr = serve(router).await;

    let err = client_for(addr).get_status().await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404 }));
}

#[tokio::test]
async fn get_health_passes_the_payload_through() {
    let router = Router::new().route(
        "/api/v1/health",
        get(|| async { Json(json!({"status": "ok", "uptimeSecs": 1234})) }),
    );
    let addr = serve(router).await;

    let health = client_for(addr).get_health().await.unwrap();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Bind then drop a listener to get a port with nothing behind it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).get_taxpayers().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let router = Router::new().route(
        "/api/v1/taxpayers",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!([]))
        }),
    );
    let addr = serve(router).await;

    let client =
        ApiClient::with_timeout(format!("http://{addr}"), Duration::from_millis(100)).unwrap();
    let err = client.get_taxpayers().await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let router = Router::new().route("/api/v1/taxpayers", get(|| async { "not json" }));
    let addr = serve(router).await;

    let err = client_for(addr).get_taxpayers().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let router = Router::new().route("/api/v1/taxpayers", get(|| async { Json(json!([])) }));
    let addr = serve(router).await;

    let client = ApiClient::new(format!("http://{addr}/")).unwrap();
    assert!(client.get_taxpayers().await.unwrap().is_empty());
}
