//! Action protocol client.
//!
//! Sends one action per user intent and always follows it with exactly one
//! state fetch, whether the action succeeded, was rejected, or never reached
//! the store.

use crate::element::SceneSnapshot;
use crate::protocol::{Action, ActionResult};
use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Connection closed")]
    Closed,
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A way to reach the authoritative store.
///
/// Implementations exist for an in-process store and for a WebSocket
/// connection to the server.
pub trait Transport {
    /// Send one action and wait for the store's verdict.
    fn send_action(&self, action: &Action) -> BoxFuture<'_, TransportResult<ActionResult>>;

    /// Fetch the current authoritative scene.
    fn fetch_state(&self) -> BoxFuture<'_, TransportResult<SceneSnapshot>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_action(&self, action: &Action) -> BoxFuture<'_, TransportResult<ActionResult>> {
        (**self).send_action(action)
    }

    fn fetch_state(&self) -> BoxFuture<'_, TransportResult<SceneSnapshot>> {
        (**self).fetch_state()
    }
}

/// Everything one action round trip produced.
#[derive(Debug)]
pub struct RoundTrip {
    /// Sequence number of this round trip, starting at 1.
    pub seq: u64,
    /// The store's verdict, or why it could not be obtained.
    pub result: TransportResult<ActionResult>,
    /// The scene fetched after the action.
    pub snapshot: TransportResult<SceneSnapshot>,
}

impl RoundTrip {
    /// Whether the action reached the store (accepted or rejected).
    pub fn delivered(&self) -> bool {
        self.result.is_ok()
    }

    /// Status line for the user: the store's message verbatim, or a generic
    /// failure notice.
    pub fn status(&self) -> String {
        match &self.result {
            Ok(result) => result.message.clone(),
            Err(_) => "Could not reach the map server. Nothing was changed.".to_string(),
        }
    }
}

/// Client for the action protocol.
///
/// Methods take `&self` so a caller can keep handling local input while a
/// round trip is outstanding; serializing actions is the caller's job.
pub struct ActionClient<T> {
    transport: T,
    round_trips: Cell<u64>,
}

impl<T: Transport> ActionClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            round_trips: Cell::new(0),
        }
    }

    /// Send `action`, then fetch the scene. No retries.
    pub async fn perform_action(&self, action: &Action) -> RoundTrip {
        let seq = self.round_trips.get() + 1;
        self.round_trips.set(seq);
        log::info!("#{seq} -> {}", action.event_name());

        let result = self.transport.send_action(action).await;
        match &result {
            Ok(r) if r.success => log::info!("#{seq} <- ok: {}", r.message),
            Ok(r) => log::warn!("#{seq} <- rejected: {}", r.message),
            Err(e) => log::warn!("#{seq} <- failed: {e}"),
        }

        let snapshot = self.transport.fetch_state().await;
        if let Err(e) = &snapshot {
            log::warn!("#{seq} refresh failed: {e}");
        }

        RoundTrip { seq, result, snapshot }
    }

    /// Fetch the current scene without sending an action.
    pub async fn get_state(&self) -> TransportResult<SceneSnapshot> {
        self.transport.fetch_state().await
    }

    /// Number of actions sent so far.
    pub fn round_trips(&self) -> u64 {
        self.round_trips.get()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every call and answers from a script.
    struct ScriptedTransport {
        calls: RefCell<Vec<String>>,
        verdict: Option<ActionResult>,
    }

    impl ScriptedTransport {
        fn new(verdict: Option<ActionResult>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                verdict,
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn send_action(&self, action: &Action) -> BoxFuture<'_, TransportResult<ActionResult>> {
            self.calls.borrow_mut().push(action.event_name().to_string());
            let verdict = self.verdict.clone();
            Box::pin(async move { verdict.ok_or(TransportError::Closed) })
        }

        fn fetch_state(&self) -> BoxFuture<'_, TransportResult<SceneSnapshot>> {
            self.calls.borrow_mut().push("get_state".to_string());
            Box::pin(async { Ok(SceneSnapshot::default()) })
        }
    }

    #[test]
    fn test_refresh_follows_accepted_action() {
        let client = ActionClient::new(ScriptedTransport::new(Some(ActionResult::ok("Action undone."))));
        let trip = pollster::block_on(client.perform_action(&Action::Undo));
        assert!(trip.delivered());
        assert_eq!(trip.status(), "Action undone.");
        assert_eq!(*client.transport().calls.borrow(), vec!["undo", "get_state"]);
    }

    #[test]
    fn test_refresh_follows_rejected_action() {
        let client = ActionClient::new(ScriptedTransport::new(Some(ActionResult::rejected("Out of bounds"))));
        let trip = pollster::block_on(client.perform_action(&Action::Undo));
        assert_eq!(trip.status(), "Out of bounds");
        assert_eq!(*client.transport().calls.borrow(), vec!["undo", "get_state"]);
    }

    #[test]
    fn test_refresh_follows_failed_action_without_retry() {
        let client = ActionClient::new(ScriptedTransport::new(None));
        let trip = pollster::block_on(client.perform_action(&Action::Undo));
        assert!(!trip.delivered());
        assert!(trip.status().contains("Could not reach"));
        assert_eq!(*client.transport().calls.borrow(), vec!["undo", "get_state"]);
    }

    #[test]
    fn test_sequence_numbers() {
        let client = ActionClient::new(ScriptedTransport::new(Some(ActionResult::ok("ok"))));
        let a = pollster::block_on(client.perform_action(&Action::Undo));
        let b = pollster::block_on(client.perform_action(&Action::Undo));
        assert_eq!((a.seq, b.seq), (1, 2));
        assert_eq!(client.round_trips(), 2);
    }
}
