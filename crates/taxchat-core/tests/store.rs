use taxchat_core::error::CoreError;
use taxchat_core::models::document::{DocumentKind, DocumentStatus, NewDocument};
use taxchat_core::models::message::{ChatRole, NewMessage};
use taxchat_core::store::AppStore;

fn sample_document(name: &str) -> NewDocument {
    NewDocument {
        name: name.to_string(),
        year: 2023,
        kind: DocumentKind::W2,
        status: DocumentStatus::Processing,
        file_size: Some(245_760),
        preview_url: None,
    }
}

#[test]
fn create_session_makes_the_newest_session_current() {
    let mut store = AppStore::new();

    let first = store.create_session("Chat 1");
    assert_eq!(store.current_session_id(), Some(first));

    let second = store.create_session("Chat 2");
    assert_eq!(store.current_session_id(), Some(second));

    // Newest first in the session list.
    assert_eq!(store.sessions()[0].id, second);
    assert_eq!(store.sessions()[1].id, first);
}

#[test]
fn select_session_switches_current() {
    let mut store = AppStore::new();
    let first = store.create_session("Chat 1");
    store.create_session("Chat 2");

    store.select_session(first).expect("session exists");
    assert_eq!(store.current_session_id(), Some(first));
}

#[test]
fn select_unknown_session_is_an_error() {
    let mut store = AppStore::new();
    store.create_session("Chat 1");

    let err = store.select_session(uuid::Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, CoreError::SessionNotFound { .. }));
}

#[test]
fn push_message_appends_in_fifo_order() {
    let mut store = AppStore::new();
    store.create_session("Chat 1");

    store.push_message(NewMessage::user("first")).unwrap();
    store.push_message(NewMessage::assistant("second")).unwrap();
    store.push_message(NewMessage::user("third")).unwrap();

    let session = store.current_session().expect("current session");
    assert_eq!(session.messages.len(), 3);
    let contents: Vec<&str> = session.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["first", "second", "third"]);
    assert_eq!(session.messages[1].role, ChatRole::Assistant);
}

#[test]
fn push_message_without_current_session_is_an_error() {
    let mut store = AppStore::new();

    let err = store.push_message(NewMessage::user("lost?")).unwrap_err();
    assert!(matches!(err, CoreError::NoCurrentSession));
}

#[test]
fn push_message_to_lands_in_the_issuing_session_after_a_switch() {
    let mut store = AppStore::new();
    let issued_against = store.create_session("Chat 1");
    store.create_session("Chat 2");

    // A completion bound to the first session must not leak into the second.
    store
        .push_message_to(issued_against, NewMessage::assistant("late answer"))
        .unwrap();

    assert_eq!(store.session(issued_against).unwrap().messages.len(), 1);
    assert!(store.current_session().unwrap().messages.is_empty());
}

#[test]
fn push_message_updates_session_timestamp() {
    let mut store = AppStore::new();
    store.create_session("Chat 1");
    let created = store.current_session().unwrap().updated_at;

    store.push_message(NewMessage::user("hello")).unwrap();
    assert!(store.current_session().unwrap().updated_at >= created);
}

#[test]
fn add_remove_update_document_round_trip() {
    let mut store = AppStore::new();

    let id = store.add_document(sample_document("W-2 Form 2023.pdf"));
    assert_eq!(store.documents().len(), 1);
    assert_eq!(store.document(id).unwrap().status, DocumentStatus::Processing);

    store
        .update_document(id, |d| d.status = DocumentStatus::Ready)
        .unwrap();
    assert_eq!(store.document(id).unwrap().status, DocumentStatus::Ready);

    store.remove_document(id).unwrap();
    assert!(store.documents().is_empty());

    let err = store.remove_document(id).unwrap_err();
    assert!(matches!(err, CoreError::DocumentNotFound { .. }));
}

#[test]
fn update_document_targets_the_matching_id() {
    let mut store = AppStore::new();
    let first = store.add_document(sample_document("W-2 Form 2022.pdf"));
    let second = store.add_document(sample_document("1099-INT 2023.pdf"));

    store
        .update_document(second, |d| d.status = DocumentStatus::Ready)
        .unwrap();

    assert_eq!(store.document(first).unwrap().status, DocumentStatus::Processing);
    assert_eq!(store.document(second).unwrap().status, DocumentStatus::Ready);
}

#[test]
fn loading_and_error_flags_are_immediately_observable() {
    let mut store = AppStore::new();
    assert!(!store.is_loading());

    store.set_loading(true);
    assert!(store.is_loading());

    store.set_error(Some("backend unreachable".to_string()));
    assert_eq!(store.error(), Some("backend unreachable"));

    store.set_error(None);
    assert!(store.error().is_none());
}
