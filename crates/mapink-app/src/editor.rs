//! Editing surface driver.
//!
//! Wires user input through the session state machine, sends the resulting
//! action, refreshes the scene and re-projects the layers.
//!
//! An action is split into [`Editor::begin`] and [`Editor::complete`] so the
//! round trip between them borrows only the shared client. Cursor moves keep
//! updating the snap target meanwhile; other input is refused until the
//! outstanding action completes.

use kurbo::{Point, Size};
use mapink_core::{
    Action, ActionClient, EditSession, RoundTrip, SNAP_RADIUS, SceneSnapshot, ToolCatalog, ToolId, Transition,
    Transport, VertexSnapper,
};
use mapink_render::{RenderContext, RenderResult, Renderer, SceneLayers, project};
use peniko::Color;
use std::rc::Rc;

/// Status shown when input arrives while an action is still outstanding.
pub const BUSY_NOTICE: &str = "Waiting for the map server...";

/// Input delivered to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SelectTool(ToolId),
    Click(Point),
    /// Commits the path being drawn; adds no vertex.
    DoubleClick(Point),
    CursorMove(Point),
    Undo,
    /// Discard the path being drawn, locally and in the store.
    Cancel,
}

/// An action that has been handed out by [`Editor::begin`] and whose round
/// trip has not been fed back through [`Editor::complete`] yet.
#[derive(Debug)]
#[must_use]
pub struct PendingAction {
    action: Action,
    session: EditSession,
}

impl PendingAction {
    pub fn action(&self) -> &Action {
        &self.action
    }
}

/// One editing surface bound to one transport.
pub struct Editor<T> {
    catalog: ToolCatalog,
    session: EditSession,
    client: Rc<ActionClient<T>>,
    snapshot: SceneSnapshot,
    snapper: VertexSnapper,
    layers: SceneLayers,
    status: String,
    in_flight: bool,
    /// Last cursor position seen while an action was outstanding.
    moved_during_trip: Option<Point>,
}

impl<T: Transport> Editor<T> {
    pub fn new(catalog: ToolCatalog, transport: T) -> Self {
        Self::with_snap_radius(catalog, transport, SNAP_RADIUS)
    }

    pub fn with_snap_radius(catalog: ToolCatalog, transport: T, snap_radius: f64) -> Self {
        Self {
            catalog,
            session: EditSession::new(),
            client: Rc::new(ActionClient::new(transport)),
            snapshot: SceneSnapshot::default(),
            snapper: VertexSnapper::new(snap_radius),
            layers: SceneLayers::default(),
            status: String::new(),
            in_flight: false,
            moved_during_trip: None,
        }
    }

    /// Load the initial scene.
    pub async fn start(&mut self) {
        match self.client.get_state().await {
            Ok(snapshot) => {
                self.replace_snapshot(snapshot);
                self.status = "Ready.".to_string();
            }
            Err(e) => {
                log::warn!("Initial state fetch failed: {e}");
                self.status = "Could not reach the map server.".to_string();
            }
        }
    }

    /// Process one input event to completion (including any round trip).
    pub async fn handle(&mut self, event: EditorEvent) {
        let Some(pending) = self.begin(event) else {
            return;
        };
        let client = Rc::clone(&self.client);
        let trip = client.perform_action(pending.action()).await;
        self.complete(pending, trip);
    }

    /// Apply the local part of `event`. Returns the action to send, if any;
    /// its round trip must be passed to [`Editor::complete`].
    pub fn begin(&mut self, event: EditorEvent) -> Option<PendingAction> {
        if let EditorEvent::CursorMove(at) = event {
            self.cursor_move(at);
            return None;
        }
        if self.in_flight {
            log::debug!("ignoring {event:?} while an action is outstanding");
            self.status = BUSY_NOTICE.to_string();
            return None;
        }

        let transition = match event {
            EditorEvent::SelectTool(id) => {
                let Some(descriptor) = self.catalog.get(&id).cloned() else {
                    self.status = format!("Unknown tool: {id}");
                    return None;
                };
                let transition = self.session.select_tool(&descriptor);
                if transition.action.is_none() {
                    self.status = format!("{} selected.", descriptor.name);
                }
                transition
            }
            EditorEvent::Click(at) => self.session.click(at),
            EditorEvent::DoubleClick(_) => self.session.finish_path(),
            EditorEvent::Undo => self.session.undo(),
            EditorEvent::Cancel => self.session.cancel_path(),
            EditorEvent::CursorMove(_) => return None,
        };

        let Transition {
            session,
            action,
            notice,
        } = transition;
        if let Some(notice) = notice {
            self.status = notice;
        }
        let Some(action) = action else {
            self.session = session;
            return None;
        };

        self.in_flight = true;
        self.moved_during_trip = None;
        Some(PendingAction { action, session })
    }

    /// Apply the outcome of a round trip started by [`Editor::begin`].
    pub fn complete(&mut self, pending: PendingAction, trip: RoundTrip) {
        let PendingAction { action, session } = pending;
        self.in_flight = false;

        if adopts(&action, &trip) {
            self.session = session;
        }
        self.status = trip.status();

        match trip.snapshot {
            Ok(snapshot) => self.replace_snapshot(snapshot),
            Err(e) => log::warn!("Keeping previous scene: {e}"),
        }
        if let Some(at) = self.moved_during_trip.take() {
            self.session = self.session.cursor_move(at, &self.snapper);
        }
    }

    /// Track the cursor. Local only, and never waits on an outstanding action.
    pub fn cursor_move(&mut self, at: Point) {
        self.session = self.session.cursor_move(at, &self.snapper);
        if self.in_flight {
            self.moved_during_trip = Some(at);
        }
    }

    /// Draw the current layers.
    pub fn render<R: Renderer>(&self, renderer: &mut R, size: Size, background: Color) -> RenderResult<()> {
        let ctx = RenderContext::new(&self.layers, size)
            .with_background(background)
            .with_snap_point(self.session.snap_target());
        renderer.build_scene(&ctx)
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn snapshot(&self) -> &SceneSnapshot {
        &self.snapshot
    }

    pub fn layers(&self) -> &SceneLayers {
        &self.layers
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn client(&self) -> &ActionClient<T> {
        &self.client
    }

    /// A handle to the client for driving a round trip outside `&mut self`.
    pub fn shared_client(&self) -> Rc<ActionClient<T>> {
        Rc::clone(&self.client)
    }

    /// Whether an action from [`Editor::begin`] is still outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    fn replace_snapshot(&mut self, snapshot: SceneSnapshot) {
        self.snapper.rebuild(&snapshot);
        self.layers = project(&snapshot);
        self.snapshot = snapshot;
        self.session = self.session.revalidate_snap(&self.snapper);
    }
}

/// Whether the session computed alongside `action` replaces the current one.
/// An undelivered action changes nothing; a rejected vertex never joined the
/// store's path, so it must not join the local one either.
fn adopts(action: &Action, trip: &RoundTrip) -> bool {
    match &trip.result {
        Err(_) => false,
        Ok(result) if !result.success => !matches!(action, Action::AddPathSegment { .. }),
        Ok(_) => true,
    }
}
