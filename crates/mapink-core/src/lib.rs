//! MapInk Core Library
//!
//! Platform-agnostic editing engine for the MapInk map editor: the tool
//! catalog, element model, vertex snapping, the tool session state machine
//! and the action protocol spoken with the authoritative store.

pub mod catalog;
pub mod client;
pub mod element;
pub mod geometry;
pub mod protocol;
pub mod session;
pub mod snap;
pub mod store;
#[cfg(not(target_arch = "wasm32"))]
pub mod sync;

pub use catalog::{ToolCatalog, ToolClass, ToolDescriptor, ToolId};
pub use client::{ActionClient, BoxFuture, RoundTrip, Transport, TransportError, TransportResult};
pub use element::{Element, PathElement, PointElement, SceneSnapshot};
pub use protocol::{Action, ActionResult, ClientFrame, EventName, ServerFrame};
pub use session::{EditSession, SessionPhase, Transition};
pub use snap::{SNAP_RADIUS, VertexSnapper, nearest_vertex};
pub use store::{LocalTransport, MapStore};
#[cfg(not(target_arch = "wasm32"))]
pub use sync::WsTransport;
