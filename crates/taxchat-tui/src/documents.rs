//! Simulated document uploads.
//!
//! There is no real storage behind this: an upload creates a record in
//! `processing` status and a completion task flips it to `ready` after a
//! fixed delay. The completion is keyed by the document's own id, never by
//! list position, so it stays correct under any number of concurrent
//! uploads.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use taxchat_core::models::document::{DocumentKind, DocumentStatus, NewDocument};

use crate::SharedStore;

/// Fixed simulated processing delay.
pub const PROCESSING_DELAY: Duration = Duration::from_secs(2);

/// Create a document record for an "uploaded" file and schedule its
/// processing completion. Returns the new record's id.
pub async fn upload(store: &SharedStore, name: impl Into<String>, file_size: u64) -> Uuid {
    upload_with_delay(store, name, file_size, PROCESSING_DELAY).await
}

pub async fn upload_with_delay(
    store: &SharedStore,
    name: impl Into<String>,
    file_size: u64,
    delay: Duration,
) -> Uuid {
    let name = name.into();
    let id = store.lock().await.add_document(NewDocument {
        kind: DocumentKind::infer(&name),
        name,
        year: current_year(),
        status: DocumentStatus::Processing,
        file_size: Some(file_size),
        preview_url: None,
    });

    spawn_processing(SharedStore::clone(store), id, delay);
    id
}

/// Flip one document from `processing` to `ready` after `delay`, addressed
/// by its id. Status never moves backward; a record the user deleted in the
/// meantime is left alone.
pub fn spawn_processing(store: SharedStore, id: Uuid, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let mut store = store.lock().await;
        let updated = store.update_document(id, |doc| {
            if doc.status.is_forward_transition_to(DocumentStatus::Ready) {
                doc.status = DocumentStatus::Ready;
            }
        });
        if updated.is_err() {
            debug!(%id, "document removed before processing finished");
        }
    })
}

fn current_year() -> i16 {
    jiff::Zoned::now().year()
}
