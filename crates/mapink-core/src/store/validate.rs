//! Placement validation chain.
//!
//! Each request is offered to the validators in order; the first rejection
//! stops the chain and its message is returned to the client verbatim.

use crate::geometry::{bounds_of, within_bounds};
use kurbo::{Point, Rect};

/// Default map extent.
pub const DEFAULT_MAP_BOUNDS: Rect = Rect::new(0.0, 0.0, 500.0, 300.0);

/// Minimum number of vertices in a committed path.
pub const MIN_PATH_POINTS: usize = 2;

/// What is being validated.
#[derive(Debug, Clone, Copy)]
pub enum PlacementRequest<'a> {
    /// A point element position.
    Point(Point),
    /// A single vertex appended to the in-progress path.
    Segment(Point),
    /// A full path about to be committed.
    Path(&'a [Point]),
}

/// One link of the validation chain.
pub trait Validator: Send + Sync {
    /// `Err` carries the message shown to the user.
    fn validate(&self, request: &PlacementRequest<'_>) -> Result<(), String>;
}

/// Rejects anything outside the map.
pub struct BoundaryValidator {
    pub bounds: Rect,
}

impl Validator for BoundaryValidator {
    fn validate(&self, request: &PlacementRequest<'_>) -> Result<(), String> {
        match request {
            PlacementRequest::Point(p) if !within_bounds(*p, self.bounds) => {
                Err("Element out of map bounds.".to_string())
            }
            PlacementRequest::Segment(p) if !within_bounds(*p, self.bounds) => {
                Err("Path out of map bounds.".to_string())
            }
            PlacementRequest::Path(path) => match bounds_of(path) {
                Some(extent) if !contains_rect(self.bounds, extent) => Err("Path out of map bounds.".to_string()),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

fn contains_rect(outer: Rect, inner: Rect) -> bool {
    within_bounds(inner.origin(), outer) && within_bounds(Point::new(inner.x1, inner.y1), outer)
}

/// Rejects paths with too few vertices.
pub struct PathLengthValidator {
    pub min_points: usize,
}

impl Validator for PathLengthValidator {
    fn validate(&self, request: &PlacementRequest<'_>) -> Result<(), String> {
        match request {
            PlacementRequest::Path(path) if path.len() < self.min_points => Err(format!(
                "A path needs at least {} points; discarded {}.",
                self.min_points,
                path.len()
            )),
            _ => Ok(()),
        }
    }
}

/// Ordered list of validators.
pub struct ValidationChain {
    links: Vec<Box<dyn Validator>>,
}

impl Default for ValidationChain {
    fn default() -> Self {
        Self::standard(DEFAULT_MAP_BOUNDS)
    }
}

impl ValidationChain {
    pub fn empty() -> Self {
        Self { links: Vec::new() }
    }

    /// Boundary check followed by the path length check.
    pub fn standard(bounds: Rect) -> Self {
        Self::empty()
            .with(BoundaryValidator { bounds })
            .with(PathLengthValidator {
                min_points: MIN_PATH_POINTS,
            })
    }

    /// Append a link to the end of the chain.
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.links.push(Box::new(validator));
        self
    }

    pub fn validate(&self, request: &PlacementRequest<'_>) -> Result<(), String> {
        self.links.iter().try_for_each(|link| link.validate(request))
    }
}
