//! Wire protocol between the editing client and the authoritative store.
//!
//! ## HTTP
//!
//! ```json
//! POST /action { "event": "place_point_element", "type": "tree", "x": 10, "y": 20 }
//! POST /action { "event": "add_path_segment", "point": { "x": 10, "y": 10 } }
//! POST /action { "event": "finish_path", "type": "road" }
//! POST /action { "event": "cancel_path" }
//! POST /action { "event": "undo" }
//! -> { "success": true, "message": "Element added." }
//! ```
//!
//! ## WebSocket
//!
//! ```json
//! { "type": "action", "action": { "event": "undo" } }   -> { "type": "result", "result": {...} }
//! { "type": "get_state" }                                -> { "type": "state", "snapshot": {...} }
//! ```

use crate::catalog::ToolId;
use crate::element::SceneSnapshot;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single semantic user intent sent to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Action {
    /// Place one point element of the given type.
    PlacePointElement {
        #[serde(rename = "type")]
        tool: ToolId,
        x: f64,
        y: f64,
    },
    /// Append a single vertex to the store's in-progress path.
    AddPathSegment { point: Point },
    /// Commit the in-progress path as an element of the given type.
    FinishPath {
        #[serde(rename = "type")]
        tool: ToolId,
    },
    /// Drop the in-progress path without committing it.
    CancelPath,
    /// Revert the last committed change.
    Undo,
}

impl Action {
    pub fn place_point(tool: ToolId, at: Point) -> Self {
        Action::PlacePointElement { tool, x: at.x, y: at.y }
    }

    pub fn event_name(&self) -> EventName {
        match self {
            Action::PlacePointElement { .. } => EventName::PlacePointElement,
            Action::AddPathSegment { .. } => EventName::AddPathSegment,
            Action::FinishPath { .. } => EventName::FinishPath,
            Action::CancelPath => EventName::CancelPath,
            Action::Undo => EventName::Undo,
        }
    }
}

/// The event discriminant of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    PlacePointElement,
    AddPathSegment,
    FinishPath,
    CancelPath,
    Undo,
}

impl EventName {
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::PlacePointElement => "place_point_element",
            EventName::AddPathSegment => "add_path_segment",
            EventName::FinishPath => "finish_path",
            EventName::CancelPath => "cancel_path",
            EventName::Undo => "undo",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome reported by the store for every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Frames sent by a WebSocket client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Action { action: Action },
    GetState,
}

/// Frames sent by the server in reply to a [`ClientFrame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Result { result: ActionResult },
    State { snapshot: SceneSnapshot },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_format() {
        let json = serde_json::to_value(Action::place_point("tree".into(), Point::new(6.0, 6.0))).unwrap();
        assert_eq!(json, serde_json::json!({"event": "place_point_element", "type": "tree", "x": 6.0, "y": 6.0}));

        let json = serde_json::to_value(Action::AddPathSegment { point: Point::new(10.0, 10.0) }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "add_path_segment", "point": {"x": 10.0, "y": 10.0}}));

        let json = serde_json::to_value(Action::FinishPath { tool: "road".into() }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "finish_path", "type": "road"}));

        let json = serde_json::to_value(Action::CancelPath).unwrap();
        assert_eq!(json, serde_json::json!({"event": "cancel_path"}));
        assert_eq!(Action::CancelPath.event_name().as_str(), "cancel_path");

        let json = serde_json::to_value(Action::Undo).unwrap();
        assert_eq!(json, serde_json::json!({"event": "undo"}));
    }

    #[test]
    fn test_action_parse() {
        let action: Action = serde_json::from_str(r#"{"event":"place_point_element","type":"building","x":1,"y":2}"#).unwrap();
        assert_eq!(action, Action::place_point("building".into(), Point::new(1.0, 2.0)));
        assert_eq!(action.event_name().as_str(), "place_point_element");

        assert!(serde_json::from_str::<Action>(r#"{"event":"teleport"}"#).is_err());
    }

    #[test]
    fn test_frames() {
        let frame = ClientFrame::Action { action: Action::Undo };
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, r#"{"type":"action","action":{"event":"undo"}}"#);

        let frame: ClientFrame = serde_json::from_str(r#"{"type":"get_state"}"#).unwrap();
        assert_eq!(frame, ClientFrame::GetState);

        let frame: ServerFrame =
            serde_json::from_str(r#"{"type":"result","result":{"success":false,"message":"nope"}}"#).unwrap();
        assert_eq!(frame, ServerFrame::Result { result: ActionResult::rejected("nope") });
    }
}
