//! Demo-mode seeding.
//!
//! Gives a fresh store something to show: one chat session and a handful of
//! already-processed sample documents.

use taxchat_core::models::document::{DocumentKind, DocumentStatus, NewDocument};

use crate::SharedStore;

const DEMO_SESSION_TITLE: &str = "Tax Data Analysis";

const SAMPLE_DOCUMENTS: &[(&str, i16, DocumentKind, DocumentStatus, u64)] = &[
    ("W-2 Form 2023.pdf", 2023, DocumentKind::W2, DocumentStatus::Ready, 245_760),
    ("W-2 Form 2022.pdf", 2022, DocumentKind::W2, DocumentStatus::Ready, 198_432),
    ("1099-INT 2023.pdf", 2023, DocumentKind::Ten99, DocumentStatus::Ready, 156_789),
    ("Form 1040 2023.pdf", 2023, DocumentKind::Form1040, DocumentStatus::Processing, 512_000),
];

/// Seed the demo session and sample documents. Only touches an empty store,
/// so it is safe to call unconditionally at startup.
pub async fn seed(store: &SharedStore) {
    let mut store = store.lock().await;

    if store.sessions().is_empty() {
        store.create_session(DEMO_SESSION_TITLE);
    }

    if store.documents().is_empty() {
        for &(name, year, kind, status, file_size) in SAMPLE_DOCUMENTS {
            store.add_document(NewDocument {
                name: name.to_string(),
                year,
                kind,
                status,
                file_size: Some(file_size),
                preview_url: None,
            });
        }
    }
}
