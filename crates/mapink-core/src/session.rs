//! Tool session state machine.
//!
//! An [`EditSession`] is an immutable record: every input method takes the
//! current record and returns a [`Transition`] holding the next record and at
//! most one outbound [`Action`]. Nothing is sent from here; the caller decides
//! when to commit the next record (after the action's round trip completes).

use crate::catalog::{ToolClass, ToolDescriptor, ToolId};
use crate::protocol::Action;
use crate::snap::VertexSnapper;
use kurbo::Point;

/// Guidance shown when the canvas is clicked with no tool selected.
pub const NO_TOOL_NOTICE: &str = "Select a tool before clicking on the map.";

#[derive(Debug, Clone, PartialEq)]
struct ActiveTool {
    id: ToolId,
    class: ToolClass,
}

/// Client-only editing state. Never persisted, never sent as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditSession {
    tool: Option<ActiveTool>,
    /// Accumulated vertices; only non-empty while a path tool is active.
    in_progress: Vec<Point>,
    snap_target: Option<Point>,
}

/// The state machine's observable phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionPhase<'a> {
    Idle,
    PointToolActive,
    PathToolEmpty,
    Accumulating(&'a [Point]),
}

/// Result of applying one input to a session.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Transition {
    /// The session after the input.
    pub session: EditSession,
    /// The action to send, if the input produced one.
    pub action: Option<Action>,
    /// Locally generated status message, if any.
    pub notice: Option<String>,
}

impl Transition {
    fn to(session: EditSession) -> Self {
        Self {
            session,
            action: None,
            notice: None,
        }
    }

    fn emit(session: EditSession, action: Action) -> Self {
        Self {
            session,
            action: Some(action),
            notice: None,
        }
    }
}

impl EditSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase<'_> {
        match &self.tool {
            None => SessionPhase::Idle,
            Some(t) if t.class == ToolClass::Point => SessionPhase::PointToolActive,
            Some(_) if self.in_progress.is_empty() => SessionPhase::PathToolEmpty,
            Some(_) => SessionPhase::Accumulating(&self.in_progress),
        }
    }

    pub fn active_tool(&self) -> Option<&ToolId> {
        self.tool.as_ref().map(|t| &t.id)
    }

    pub fn active_class(&self) -> Option<ToolClass> {
        self.tool.as_ref().map(|t| t.class)
    }

    pub fn in_progress_path(&self) -> &[Point] {
        &self.in_progress
    }

    pub fn snap_target(&self) -> Option<Point> {
        self.snap_target
    }

    /// Whether a path tool is active with at least one accumulated vertex.
    pub fn is_accumulating(&self) -> bool {
        matches!(self.phase(), SessionPhase::Accumulating(_))
    }

    /// Switch tools. A path being accumulated is committed first.
    pub fn select_tool(&self, tool: &ToolDescriptor) -> Transition {
        let next = EditSession {
            tool: Some(ActiveTool {
                id: tool.id.clone(),
                class: tool.class,
            }),
            in_progress: Vec::new(),
            snap_target: None,
        };
        log::debug!("select tool {} ({:?})", tool.id, tool.class);

        match (&self.tool, self.is_accumulating()) {
            (Some(previous), true) => {
                log::debug!("auto-committing {} path before tool switch", previous.id);
                Transition::emit(next, Action::FinishPath { tool: previous.id.clone() })
            }
            _ => Transition::to(next),
        }
    }

    /// Handle a primary click on the canvas.
    pub fn click(&self, raw: Point) -> Transition {
        let position = self.snap_target.unwrap_or(raw);

        let Some(tool) = &self.tool else {
            return Transition {
                session: self.clone(),
                action: None,
                notice: Some(NO_TOOL_NOTICE.to_string()),
            };
        };

        match tool.class {
            ToolClass::Point => Transition::emit(self.clone(), Action::place_point(tool.id.clone(), position)),
            ToolClass::Path => {
                let mut next = self.clone();
                next.in_progress.push(position);
                Transition::emit(next, Action::AddPathSegment { point: position })
            }
        }
    }

    /// Commit the accumulated path. A no-op unless a path tool has at least
    /// one accumulated vertex; the store decides whether the path is long
    /// enough.
    pub fn finish_path(&self) -> Transition {
        match &self.tool {
            Some(tool) if self.is_accumulating() => {
                let next = EditSession {
                    tool: self.tool.clone(),
                    in_progress: Vec::new(),
                    snap_target: None,
                };
                Transition::emit(next, Action::FinishPath { tool: tool.id.clone() })
            }
            _ => Transition::to(self.clone()),
        }
    }

    /// Discard the accumulated path. The store holds the same vertices, so
    /// it is told to drop them too; with nothing accumulated this is a no-op.
    pub fn cancel_path(&self) -> Transition {
        if !self.is_accumulating() {
            return Transition::to(self.clone());
        }
        let next = EditSession {
            tool: self.tool.clone(),
            in_progress: Vec::new(),
            snap_target: None,
        };
        Transition::emit(next, Action::CancelPath)
    }

    /// Undo the last committed change. Always emits exactly one `undo`; local
    /// uncommitted vertices are simply dropped.
    pub fn undo(&self) -> Transition {
        let mut next = self.clone();
        next.in_progress.clear();
        Transition::emit(next, Action::Undo)
    }

    /// Track the cursor. Only the snap target changes.
    pub fn cursor_move(&self, raw: Point, snapper: &VertexSnapper) -> EditSession {
        EditSession {
            snap_target: snapper.resolve(raw),
            ..self.clone()
        }
    }

    /// Drop a snap target that is no longer one of `snapper`'s candidates
    /// (e.g. its path was undone).
    pub fn revalidate_snap(&self, snapper: &VertexSnapper) -> EditSession {
        match self.snap_target {
            Some(target) if !snapper.candidates().contains(&target) => EditSession {
                snap_target: None,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }
}
