//! Session manager: turns identity-provider events into record store loads
//! and clears.
//!
//! Sign-ins arriving through [`SessionManager::spawn_event_loop`] load in the
//! background. Each new event aborts the load started by the previous one;
//! anything that still completes late is dropped by the store's session epoch.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{info, warn};

use crate::domain::commands::session::{AuthEvent, Identity, LoadOutcome};
use crate::domain::errors::StoreError;
use crate::domain::record_store::RecordStore;
use crate::storage::Connection;

pub struct SessionManager<C: Connection> {
    store: Arc<RecordStore<C>>,
    current: Mutex<Option<Identity>>,
    pending_load: Mutex<Option<AbortHandle>>,
}

impl<C: Connection> SessionManager<C> {
    pub fn new(store: Arc<RecordStore<C>>) -> Self {
        Self {
            store,
            current: Mutex::new(None),
            pending_load: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<RecordStore<C>> {
        &self.store
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_identity(&self, identity: Option<Identity>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = identity;
    }

    fn abort_pending_load(&self) {
        let pending = self
            .pending_load
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
    }

    /// Record the identity and load that user's records.
    pub async fn sign_in(&self, identity: Identity) -> Result<LoadOutcome, StoreError> {
        self.abort_pending_load();
        self.load_for(identity).await
    }

    async fn load_for(&self, identity: Identity) -> Result<LoadOutcome, StoreError> {
        info!("User {} signed in", identity.uid);
        let uid = identity.uid.clone();
        self.set_identity(Some(identity));
        self.store.load_session(&uid).await
    }

    pub fn sign_out(&self) {
        self.abort_pending_load();
        if let Some(identity) = self.current_identity() {
            info!("User {} signed out", identity.uid);
        }
        self.set_identity(None);
        self.store.clear_session();
    }

    /// React to one identity event. Sign-ins load in a background task.
    pub fn handle_event(self: &Arc<Self>, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(identity) => {
                self.abort_pending_load();
                let manager = Arc::clone(self);
                let task = tokio::spawn(async move {
                    let uid = identity.uid.clone();
                    if let Err(e) = manager.load_for(identity).await {
                        warn!("Background load for {} failed: {}", uid, e);
                    }
                });
                *self
                    .pending_load
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(task.abort_handle());
            }
            AuthEvent::SignedOut => self.sign_out(),
        }
    }

    /// Consume identity events until every sender is dropped.
    pub fn spawn_event_loop(self: Arc<Self>, mut events: mpsc::Receiver<AuthEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                self.handle_event(event);
            }
            info!("Identity event stream closed");
        })
    }
}
