//! Submission flow tests against a local mock backend.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use taxchat_api::ApiClient;
use taxchat_core::models::message::ChatRole;
use taxchat_core::models::taxpayer::Taxpayer;
use taxchat_tui::chat::{ChatController, SubmitBlocked, ERROR_ANSWER, FALLBACK_ANSWER};
use taxchat_tui::events::AppEvent;
use taxchat_tui::{new_shared_store, SharedStore};

fn taxpayer() -> Taxpayer {
    Taxpayer {
        id: "tp-1".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: None,
        created_at: jiff::Timestamp::UNIX_EPOCH,
        last_login_at: None,
    }
}

/// Serve the query endpoint with a canned response and count the hits.
async fn serve_query(response: Value, delay: Duration) -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let response = Arc::new(response);

    let router = Router::new().route(
        "/api/v1/chat/process-query",
        post({
            let hits = Arc::clone(&hits);
            let response = Arc::clone(&response);
            move |Json(_body): Json<Value>| {
                let hits = Arc::clone(&hits);
                let response = Arc::clone(&response);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(delay).await;
                    Json((*response).clone())
                }
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, hits)
}

fn controller_for(
    store: &SharedStore,
    addr: SocketAddr,
) -> (ChatController, mpsc::UnboundedReceiver<AppEvent>) {
    let api = ApiClient::new(format!("http://{addr}")).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ChatController::new(SharedStore::clone(store), api, tx),
        rx,
    )
}

#[tokio::test]
async fn submit_appends_user_then_assistant_with_metadata() {
    let (addr, hits) =
        serve_query(json!({"response": "X", "confidence": 0.8}), Duration::ZERO).await;

    let store = new_shared_store();
    let session_id = store.lock().await.create_session("Chat 1");
    let (mut chat, mut rx) = controller_for(&store, addr);

    chat.submit("Q", Some(&taxpayer())).await.unwrap();
    chat.join().await;

    let guard = store.lock().await;
    let session = guard.session(session_id).unwrap();
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].role, ChatRole::User);
    assert_eq!(session.messages[0].content, "Q");
    assert_eq!(session.messages[1].role, ChatRole::Assistant);
    assert_eq!(session.messages[1].content, "X");
    assert_eq!(session.messages[1].confidence, Some(0.8));
    assert!(!guard.is_loading());
    drop(guard);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(matches!(
        rx.recv().await,
        Some(AppEvent::QueryFinished { .. })
    ));
}

#[tokio::test]
async fn submit_without_taxpayer_never_touches_api_or_store() {
    let (addr, hits) = serve_query(json!({"response": "X"}), Duration::ZERO).await;

    let store = new_shared_store();
    let session_id = store.lock().await.create_session("Chat 1");
    let (mut chat, _rx) = controller_for(&store, addr);

    let err = chat.submit("Q", None).await.unwrap_err();
    assert_eq!(err, SubmitBlocked::NoTaxpayer);

    let guard = store.lock().await;
    assert!(guard.session(session_id).unwrap().messages.is_empty());
    assert!(!guard.is_loading());
    drop(guard);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_input_is_blocked() {
    let (addr, hits) = serve_query(json!({"response": "X"}), Duration::ZERO).await;

    let store = new_shared_store();
    store.lock().await.create_session("Chat 1");
    let (mut chat, _rx) = controller_for(&store, addr);

    let err = chat.submit("   ", Some(&taxpayer())).await.unwrap_err();
    assert_eq!(err, SubmitBlocked::EmptyInput);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn in_flight_request_rejects_the_second_submission() {
    let (addr, hits) =
        serve_query(json!({"response": "X"}), Duration::from_millis(200)).await;

    let store = new_shared_store();
    let session_id = store.lock().await.create_session("Chat 1");
    let (mut chat, _rx) = controller_for(&store, addr);

    chat.submit("first", Some(&taxpayer())).await.unwrap();
    let err = chat.submit("second", Some(&taxpayer())).await.unwrap_err();
    assert_eq!(err, SubmitBlocked::Busy);

    chat.join().await;

    let guard = store.lock().await;
    // The rejected submission was not queued: one user + one assistant.
    assert_eq!(guard.session(session_id).unwrap().messages.len(), 2);
    drop(guard);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn backend_failure_appends_the_generic_error_and_clears_loading() {
    // Nothing listening behind this address.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = new_shared_store();
    let session_id = store.lock().await.create_session("Chat 1");
    let (mut chat, _rx) = controller_for(&store, addr);

    chat.submit("Q", Some(&taxpayer())).await.unwrap();
    chat.join().await;

    let guard = store.lock().await;
    let session = guard.session(session_id).unwrap();
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[1].role, ChatRole::Assistant);
    assert_eq!(session.messages[1].content, ERROR_ANSWER);
    assert!(!guard.is_loading());
}

#[tokio::test]
async fn empty_response_text_falls_back_to_the_fixed_string() {
    let (addr, _hits) = serve_query(json!({}), Duration::ZERO).await;

    let store = new_shared_store();
    let session_id = store.lock().await.create_session("Chat 1");
    let (mut chat, _rx) = controller_for(&store, addr);

    chat.submit("Q", Some(&taxpayer())).await.unwrap();
    chat.join().await;

    let guard = store.lock().await;
    let session = guard.session(session_id).unwrap();
    assert_eq!(session.messages[1].content, FALLBACK_ANSWER);
}

#[tokio::test]
async fn late_response_lands_in_the_issuing_session_not_the_current_one() {
    let (addr, _hits) =
        serve_query(json!({"response": "late"}), Duration::from_millis(150)).await;

    let store = new_shared_store();
    let issued_against = store.lock().await.create_session("Chat 1");
    let (mut chat, _rx) = controller_for(&store, addr);

    chat.submit("Q", Some(&taxpayer())).await.unwrap();

    // Switch sessions while the request is in flight.
    let other = store.lock().await.create_session("Chat 2");
    chat.join().await;

    let guard = store.lock().await;
    assert_eq!(guard.session(issued_against).unwrap().messages.len(), 2);
    assert!(guard.session(other).unwrap().messages.is_empty());
}

#[tokio::test]
async fn cancel_aborts_the_request_and_returns_to_idle() {
    let (addr, _hits) =
        serve_query(json!({"response": "never seen"}), Duration::from_secs(5)).await;

    let store = new_shared_store();
    let session_id = store.lock().await.create_session("Chat 1");
    let (mut chat, _rx) = controller_for(&store, addr);

    chat.submit("Q", Some(&taxpayer())).await.unwrap();
    chat.cancel().await;

    let guard = store.lock().await;
    // The optimistic user message stays; no assistant message arrives.
    assert_eq!(guard.session(session_id).unwrap().messages.len(), 1);
    assert!(!guard.is_loading());
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn submit_creates_a_session_when_none_is_current() {
    let (addr, _hits) = serve_query(json!({"response": "X"}), Duration::ZERO).await;

    let store = new_shared_store();
    let (mut chat, _rx) = controller_for(&store, addr);

    chat.submit("Q", Some(&taxpayer())).await.unwrap();
    chat.join().await;

    let guard = store.lock().await;
    let session = guard.current_session().expect("a session was created");
    assert_eq!(session.title, "Chat 1");
    assert_eq!(session.messages.len(), 2);
}
