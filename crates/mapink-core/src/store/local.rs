//! In-process transport backed by a shared [`MapStore`].

use super::MapStore;
use crate::client::{BoxFuture, Transport, TransportError, TransportResult};
use crate::element::SceneSnapshot;
use crate::protocol::{Action, ActionResult};
use std::sync::{Arc, RwLock};

/// Talks to a store living in the same process.
///
/// Useful for offline editing and for tests; behaves exactly like the
/// server minus the network.
#[derive(Clone, Default)]
pub struct LocalTransport {
    store: Arc<RwLock<MapStore>>,
}

impl LocalTransport {
    pub fn new(store: MapStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Share an existing store (e.g. with a server or a second editor).
    pub fn shared(store: Arc<RwLock<MapStore>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<RwLock<MapStore>> {
        &self.store
    }
}

impl Transport for LocalTransport {
    fn send_action(&self, action: &Action) -> BoxFuture<'_, TransportResult<ActionResult>> {
        let action = action.clone();
        Box::pin(async move {
            let mut store = self
                .store
                .write()
                .map_err(|e| TransportError::Connection(format!("Store lock poisoned: {e}")))?;
            Ok(store.apply(&action))
        })
    }

    fn fetch_state(&self) -> BoxFuture<'_, TransportResult<SceneSnapshot>> {
        Box::pin(async move {
            let store = self
                .store
                .read()
                .map_err(|e| TransportError::Connection(format!("Store lock poisoned: {e}")))?;
            Ok(store.snapshot())
        })
    }
}
