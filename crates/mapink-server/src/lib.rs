//! MapInk map server
//!
//! Hosts the authoritative [`MapStore`] and exposes it over HTTP and
//! WebSocket.
//!
//! ## Routes
//!
//! ```text
//! GET  /         banner
//! GET  /health   "ok"
//! GET  /state    current scene snapshot
//! POST /action   apply one action, returns { "success": .., "message": .. }
//! GET  /ws       WebSocket speaking ClientFrame / ServerFrame JSON
//! ```

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::{get, post},
};
use futures_util::{SinkExt, StreamExt};
use mapink_core::{Action, ActionResult, ClientFrame, MapStore, SceneSnapshot, ServerFrame};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Bind address used when `MAPINK_ADDR` is unset.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3030";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3030)),
        }
    }
}

impl ServerConfig {
    /// Read `MAPINK_ADDR`, falling back to [`DEFAULT_ADDR`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        Self::from_addr(std::env::var("MAPINK_ADDR").ok().as_deref())
    }

    fn from_addr(addr: Option<&str>) -> Result<Self, std::net::AddrParseError> {
        Ok(Self {
            addr: addr.unwrap_or(DEFAULT_ADDR).parse()?,
        })
    }
}

/// Shared application state
pub struct AppState {
    store: RwLock<MapStore>,
}

impl AppState {
    pub fn new(store: MapStore) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    pub async fn apply(&self, action: &Action) -> ActionResult {
        let result = self.store.write().await.apply(action);
        info!("{} -> {} ({})", action.event_name(), result.success, result.message);
        result
    }

    pub async fn snapshot(&self) -> SceneSnapshot {
        self.store.read().await.snapshot()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MapStore::default())
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/action", post(post_action))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Index page
async fn index() -> &'static str {
    "MapInk Map Server - POST /action, GET /state, or connect via WebSocket at /ws"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

async fn get_state(State(state): State<Arc<AppState>>) -> Json<SceneSnapshot> {
    Json(state.snapshot().await)
}

async fn post_action(State(state): State<Arc<AppState>>, Json(action): Json<Action>) -> Json<ActionResult> {
    Json(state.apply(&action).await)
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = Uuid::new_v4().to_string();
    info!("New connection: {}", conn_id);

    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply = handle_frame(&state, text.as_str()).await;
                let json = match serde_json::to_string(&reply) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Failed to encode reply for {}: {}", conn_id, e);
                        continue;
                    }
                };
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error on {}: {}", conn_id, e);
                break;
            }
        }
    }

    info!("Connection closed: {}", conn_id);
}

/// Answer one client frame.
pub async fn handle_frame(state: &AppState, text: &str) -> ServerFrame {
    match serde_json::from_str::<ClientFrame>(text) {
        Ok(ClientFrame::Action { action }) => ServerFrame::Result {
            result: state.apply(&action).await,
        },
        Ok(ClientFrame::GetState) => ServerFrame::State {
            snapshot: state.snapshot().await,
        },
        Err(e) => {
            debug!("Invalid frame: {}", e);
            ServerFrame::Error {
                message: format!("Invalid frame: {e}"),
            }
        }
    }
}
