//! The list-editor state machine.
//!
//! One [`ListEditor`] per entity screen: it holds the committed list, an
//! optional create/edit form, and talks to the remote collection only through
//! a [`Gateway`]. After every successful mutation the whole list is fetched
//! again; drafts are never merged into the committed list locally.

use std::future::Future;
use std::mem;
use std::sync::Arc;

use futures_util::future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use dockyard_core::error::{Error, InvalidInputError};
use dockyard_core::{Alerter, Confirmer, Entity, EntityId, Gateway, Record, Result};

/// An open create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct Modal<E> {
    /// The uncommitted field values.
    pub draft: E,
    /// The record being edited, or `None` when creating.
    pub target: Option<EntityId>,
}

impl<E> Modal<E> {
    pub fn is_new(&self) -> bool {
        self.target.is_none()
    }
}

/// Where the editor is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState<E> {
    /// Showing the committed list.
    Idle,
    /// Fetching the list.
    Loading,
    /// A form is open.
    ModalOpen(Modal<E>),
    /// A form is being submitted.
    Saving(Modal<E>),
    /// The session ended underneath the editor; it stays unusable until it
    /// is mounted again.
    Error(String),
}

/// Run `fut` unless `cancel` fires first.
async fn guarded<T>(cancel: &CancellationToken, fut: impl Future<Output = Result<T>>) -> Result<T> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}

/// List, create, edit and delete records of one entity type.
///
/// Every operation runs under a cancellation token tied to the editor. When
/// the editor is torn down (explicitly or by being dropped) in-flight calls
/// resolve to [`Error::Cancelled`] and their results are discarded.
pub struct ListEditor<E, G> {
    gateway: G,
    alerter: Arc<dyn Alerter>,
    confirmer: Arc<dyn Confirmer>,
    records: Vec<Record<E>>,
    state: EditorState<E>,
    cancel: CancellationToken,
}

impl<E, G> ListEditor<E, G>
where
    E: Entity,
    G: Gateway<E>,
{
    pub fn new(gateway: G, alerter: Arc<dyn Alerter>, confirmer: Arc<dyn Confirmer>) -> Self {
        Self {
            gateway,
            alerter,
            confirmer,
            records: Vec::new(),
            state: EditorState::Idle,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &EditorState<E> {
        &self.state
    }

    /// The committed list as last fetched.
    pub fn records(&self) -> &[Record<E>] {
        &self.records
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The open form, if any.
    pub fn modal(&self) -> Option<&Modal<E>> {
        match &self.state {
            EditorState::ModalOpen(modal) => Some(modal),
            _ => None,
        }
    }

    /// Mutable access to the draft of the open form.
    pub fn draft_mut(&mut self) -> Option<&mut E> {
        match &mut self.state {
            EditorState::ModalOpen(modal) => Some(&mut modal.draft),
            _ => None,
        }
    }

    /// A handle that tears the editor down from elsewhere, e.g. when the
    /// router leaves the screen while a call is in flight.
    pub fn teardown_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel in-flight operations and refuse new ones.
    pub fn teardown(&self) {
        debug!(collection = E::COLLECTION, "Tearing down list editor");
        self.cancel.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn alert(&self, message: String) {
        warn!(collection = E::COLLECTION, %message, "Surfacing error to user");
        self.alerter.alert(&message);
    }

    /// Initial load of the screen.
    pub async fn mount(&mut self) -> Result<()> {
        self.refresh().await
    }

    /// Replace the committed list with a fresh fetch.
    ///
    /// On failure the list is emptied, never left half-filled. A 401 puts
    /// the editor into [`EditorState::Error`]; anything else returns it to
    /// [`EditorState::Idle`] with an alert.
    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    pub async fn refresh(&mut self) -> Result<()> {
        let previous = mem::replace(&mut self.state, EditorState::Loading);

        match guarded(&self.cancel, self.gateway.list()).await {
            Ok(records) => {
                debug!(count = records.len(), "List loaded");
                self.records = records;
                self.state = EditorState::Idle;
                Ok(())
            }
            Err(Error::Cancelled) => {
                self.state = previous;
                Err(Error::Cancelled)
            }
            Err(e) => {
                self.records.clear();
                if e.is_unauthorized() {
                    self.state = EditorState::Error(e.to_string());
                } else {
                    self.state = EditorState::Idle;
                    self.alert(format!("Failed to load {} list: {}", E::LABEL, e));
                }
                Err(e)
            }
        }
    }

    /// Open an empty form.
    pub fn open_create(&mut self) {
        self.state = EditorState::ModalOpen(Modal {
            draft: E::default(),
            target: None,
        });
    }

    /// Open a form holding a copy of `record`.
    pub fn open_edit(&mut self, record: &Record<E>) {
        self.state = EditorState::ModalOpen(Modal {
            draft: record.fields.clone(),
            target: Some(record.id.clone()),
        });
    }

    /// Close the form without saving.
    pub fn close_modal(&mut self) {
        if matches!(self.state, EditorState::ModalOpen(_)) {
            self.state = EditorState::Idle;
        }
    }

    /// Submit the open form.
    ///
    /// On success the form closes and the list is fetched again. On failure
    /// the user is alerted and the form reopens with the draft unchanged.
    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    pub async fn save(&mut self) -> Result<()> {
        let modal = match mem::replace(&mut self.state, EditorState::Idle) {
            EditorState::ModalOpen(modal) => modal,
            other => {
                self.state = other;
                return Err(InvalidInputError::Other {
                    message: "no form is open".to_string(),
                }
                .into());
            }
        };

        self.state = EditorState::Saving(modal.clone());

        let result = match &modal.target {
            None => guarded(&self.cancel, self.gateway.create(&modal.draft)).await,
            Some(id) => guarded(&self.cancel, self.gateway.update(id, &modal.draft)).await,
        };

        match result {
            Ok(record) => {
                info!(id = %record.id, is_new = modal.is_new(), "Record saved");
                self.state = EditorState::Idle;
                self.refresh().await
            }
            Err(e) => {
                let cancelled = e.is_cancelled();
                self.state = EditorState::ModalOpen(modal);
                if !cancelled {
                    self.alert(format!("Failed to save {}: {}", E::LABEL, e));
                }
                Err(e)
            }
        }
    }

    /// Delete `record` after the user confirms.
    ///
    /// Returns `Ok(false)` when the user declines; the gateway is not called.
    /// On failure the list is left as it was.
    #[instrument(skip(self, record), fields(collection = E::COLLECTION, id = %record.id))]
    pub async fn delete(&mut self, record: &Record<E>) -> Result<bool> {
        let question = format!("Delete {} {}?", E::LABEL, record.summary());
        if !self.confirmer.confirm(&question) {
            debug!("Delete declined");
            return Ok(false);
        }

        match guarded(&self.cancel, self.gateway.delete(&record.id)).await {
            Ok(()) => {
                info!("Record deleted");
                self.refresh().await.map(|()| true)
            }
            Err(Error::Cancelled) => Err(Error::Cancelled),
            Err(e) => {
                self.alert(format!("Failed to delete {}: {}", E::LABEL, e));
                Err(e)
            }
        }
    }
}

impl<E, G> Drop for ListEditor<E, G> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Mount two editors concurrently, e.g. users together with the companies
/// they can be assigned to. Both loads finish before this returns.
pub async fn mount_both<A, GA, B, GB>(
    first: &mut ListEditor<A, GA>,
    second: &mut ListEditor<B, GB>,
) -> (Result<()>, Result<()>)
where
    A: Entity,
    GA: Gateway<A>,
    B: Entity,
    GB: Gateway<B>,
{
    future::join(first.mount(), second.mount()).await
}
