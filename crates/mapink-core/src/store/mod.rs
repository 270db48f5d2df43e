//! Reference authoritative store.
//!
//! Holds committed elements, the in-progress path and the undo history, and
//! answers every [`Action`] with an [`ActionResult`]. The server hosts one;
//! [`LocalTransport`] exposes one in-process.

mod history;
mod local;
mod validate;

pub use history::{History, MAX_UNDO_HISTORY};
pub use local::LocalTransport;
pub use validate::{
    BoundaryValidator, DEFAULT_MAP_BOUNDS, MIN_PATH_POINTS, PathLengthValidator, PlacementRequest,
    ValidationChain, Validator,
};

use crate::catalog::{ToolCatalog, ToolClass, ToolDescriptor, ToolId};
use crate::element::{Element, PathElement, PointElement, SceneSnapshot};
use crate::protocol::{Action, ActionResult};
use kurbo::Point;
use std::sync::Arc;

/// Where a committed element sits.
#[derive(Debug, Clone)]
enum Placement {
    At(Point),
    Along(Vec<Point>),
}

/// A committed element: shared type descriptor plus its own geometry.
#[derive(Debug, Clone)]
struct Record {
    descriptor: Arc<ToolDescriptor>,
    placement: Placement,
}

impl Record {
    fn to_element(&self) -> Element {
        let d = &self.descriptor;
        match &self.placement {
            Placement::At(p) => Element::Point(PointElement {
                type_id: d.id.clone(),
                x: p.x,
                y: p.y,
                width: d.width,
                height: d.height,
                name: d.name.clone(),
                data: d.data.clone(),
            }),
            Placement::Along(path) => Element::Path(PathElement {
                type_id: d.id.clone(),
                path: path.clone(),
                data: d.data.clone(),
                thickness: d.width,
            }),
        }
    }
}

/// The authoritative element store.
pub struct MapStore {
    catalog: ToolCatalog,
    records: Vec<Record>,
    temp_path: Vec<Point>,
    history: History<Vec<Record>>,
    validators: ValidationChain,
}

impl Default for MapStore {
    fn default() -> Self {
        Self::new(ToolCatalog::standard())
    }
}

impl MapStore {
    /// Create an empty store with the standard validation chain.
    pub fn new(catalog: ToolCatalog) -> Self {
        Self::with_validators(catalog, ValidationChain::default())
    }

    pub fn with_validators(catalog: ToolCatalog, validators: ValidationChain) -> Self {
        Self {
            catalog,
            records: Vec::new(),
            temp_path: Vec::new(),
            history: History::default(),
            validators,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Apply one action.
    pub fn apply(&mut self, action: &Action) -> ActionResult {
        let result = match action {
            Action::PlacePointElement { tool, x, y } => self.place_point(tool, Point::new(*x, *y)),
            Action::AddPathSegment { point } => self.add_segment(*point),
            Action::FinishPath { tool } => self.finish_path(tool),
            Action::CancelPath => self.cancel_path(),
            Action::Undo => self.undo(),
        };
        if !result.success {
            log::debug!("{} rejected: {}", action.event_name(), result.message);
        }
        result
    }

    /// Render the current state for clients.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            elements: self.records.iter().map(Record::to_element).collect(),
            temp_path: self.temp_path.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    fn descriptor(&self, tool: &ToolId, class: ToolClass) -> Result<Arc<ToolDescriptor>, ActionResult> {
        let descriptor = self
            .catalog
            .get(tool)
            .ok_or_else(|| ActionResult::rejected(format!("Unknown element type: {tool}.")))?;
        if descriptor.class != class {
            let expected = match class {
                ToolClass::Point => "point",
                ToolClass::Path => "path",
            };
            return Err(ActionResult::rejected(format!("'{tool}' is not a {expected} element type.")));
        }
        Ok(Arc::clone(descriptor))
    }

    fn commit(&mut self, record: Record) {
        self.history.save(self.records.clone());
        self.records.push(record);
    }

    fn place_point(&mut self, tool: &ToolId, at: Point) -> ActionResult {
        let descriptor = match self.descriptor(tool, ToolClass::Point) {
            Ok(d) => d,
            Err(rejection) => return rejection,
        };
        if let Err(message) = self.validators.validate(&PlacementRequest::Point(at)) {
            return ActionResult::rejected(message);
        }
        self.commit(Record {
            descriptor,
            placement: Placement::At(at),
        });
        ActionResult::ok("Element added.")
    }

    fn add_segment(&mut self, point: Point) -> ActionResult {
        if let Err(message) = self.validators.validate(&PlacementRequest::Segment(point)) {
            return ActionResult::rejected(message);
        }
        self.temp_path.push(point);
        ActionResult::ok("Segment added.")
    }

    fn finish_path(&mut self, tool: &ToolId) -> ActionResult {
        let descriptor = match self.descriptor(tool, ToolClass::Path) {
            Ok(d) => d,
            Err(rejection) => return rejection,
        };
        // The in-progress path is consumed either way: committed or discarded.
        let path = std::mem::take(&mut self.temp_path);
        if let Err(message) = self.validators.validate(&PlacementRequest::Path(&path)) {
            return ActionResult::rejected(message);
        }
        self.commit(Record {
            descriptor,
            placement: Placement::Along(path),
        });
        ActionResult::ok("Path added.")
    }

    /// Drop the in-progress path. Nothing was committed, so no memento.
    fn cancel_path(&mut self) -> ActionResult {
        self.temp_path.clear();
        ActionResult::ok("Path cancelled.")
    }

    fn undo(&mut self) -> ActionResult {
        self.temp_path.clear();
        match self.history.undo() {
            Some(records) => {
                self.records = records;
                ActionResult::ok("Action undone.")
            }
            None => ActionResult::ok("Nothing to undo."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn segment(x: f64, y: f64) -> Action {
        Action::AddPathSegment { point: pt(x, y) }
    }

    #[test]
    fn test_place_point_uses_descriptor() {
        let mut store = MapStore::default();
        let result = store.apply(&Action::place_point("tree".into(), pt(100.0, 100.0)));
        assert!(result.success);

        let snapshot = store.snapshot();
        let tree = snapshot.elements[0].as_point().unwrap();
        assert_eq!(tree.name, "Tree");
        assert_eq!((tree.width, tree.height), (40.0, 40.0));
        assert_eq!(tree.center(), pt(100.0, 100.0));
    }

    #[test]
    fn test_path_flow() {
        let mut store = MapStore::default();
        assert!(store.apply(&segment(10.0, 10.0)).success);
        assert!(store.apply(&segment(20.0, 10.0)).success);
        assert_eq!(store.snapshot().temp_path, vec![pt(10.0, 10.0), pt(20.0, 10.0)]);

        let result = store.apply(&Action::FinishPath { tool: "road".into() });
        assert_eq!(result, ActionResult::ok("Path added."));

        let snapshot = store.snapshot();
        assert!(snapshot.temp_path.is_empty());
        let road = snapshot.elements[0].as_path().unwrap();
        assert_eq!(road.path, vec![pt(10.0, 10.0), pt(20.0, 10.0)]);
        assert_eq!(road.data, "#6b7280");
    }

    #[test]
    fn test_short_path_is_rejected_and_discarded() {
        let mut store = MapStore::default();
        store.apply(&segment(10.0, 10.0));
        let result = store.apply(&Action::FinishPath { tool: "road".into() });
        assert!(!result.success);
        assert!(store.is_empty());
        assert!(store.snapshot().temp_path.is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn test_out_of_bounds_rejections() {
        let mut store = MapStore::default();
        let result = store.apply(&Action::place_point("tree".into(), pt(900.0, 10.0)));
        assert_eq!(result, ActionResult::rejected("Element out of map bounds."));
        let result = store.apply(&segment(10.0, 900.0));
        assert_eq!(result, ActionResult::rejected("Path out of map bounds."));
        assert!(store.snapshot().is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn test_unknown_and_mismatched_types() {
        let mut store = MapStore::default();
        assert!(!store.apply(&Action::place_point("castle".into(), pt(1.0, 1.0))).success);
        assert!(!store.apply(&Action::place_point("road".into(), pt(1.0, 1.0))).success);
        store.apply(&segment(1.0, 1.0));
        store.apply(&segment(2.0, 2.0));
        let result = store.apply(&Action::FinishPath { tool: "tree".into() });
        assert!(!result.success);
        // A mismatched finish leaves the in-progress path for a correct one.
        assert_eq!(store.snapshot().temp_path.len(), 2);
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut store = MapStore::default();
        store.apply(&Action::place_point("tree".into(), pt(1.0, 1.0)));
        store.apply(&Action::place_point("building".into(), pt(2.0, 2.0)));
        assert_eq!(store.len(), 2);

        assert_eq!(store.apply(&Action::Undo), ActionResult::ok("Action undone."));
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot().elements[0].type_id().as_str(), "tree");

        store.apply(&Action::Undo);
        assert!(store.is_empty());
        assert_eq!(store.apply(&Action::Undo), ActionResult::ok("Nothing to undo."));
    }

    #[test]
    fn test_cancel_path_discards_vertices_without_history() {
        let mut store = MapStore::default();
        store.apply(&Action::place_point("tree".into(), pt(1.0, 1.0)));
        store.apply(&segment(10.0, 10.0));
        assert_eq!(store.apply(&Action::CancelPath), ActionResult::ok("Path cancelled."));
        assert!(store.snapshot().temp_path.is_empty());

        // The next path starts from scratch.
        store.apply(&segment(100.0, 100.0));
        store.apply(&segment(200.0, 100.0));
        store.apply(&Action::FinishPath { tool: "road".into() });
        let snapshot = store.snapshot();
        let road = snapshot.path_elements().next().unwrap();
        assert_eq!(road.path, vec![pt(100.0, 100.0), pt(200.0, 100.0)]);

        // Undo takes back the road, then the tree; the cancel left no entry.
        store.apply(&Action::Undo);
        assert_eq!(store.len(), 1);
        store.apply(&Action::Undo);
        assert!(store.is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn test_undo_clears_in_progress_path() {
        let mut store = MapStore::default();
        store.apply(&Action::place_point("tree".into(), pt(1.0, 1.0)));
        store.apply(&segment(5.0, 5.0));
        store.apply(&Action::Undo);
        let snapshot = store.snapshot();
        assert!(snapshot.temp_path.is_empty());
        assert!(snapshot.elements.is_empty());
    }
}
