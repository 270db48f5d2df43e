//! Point and distance helpers shared by snapping, validation and rendering.

use kurbo::{Point, Rect, Size};

/// Squared distance, for comparisons that do not need the root.
pub fn distance_sq(a: Point, b: Point) -> f64 {
    (a - b).hypot2()
}

/// A `width × height` rectangle centered on `center`.
pub fn centered_rect(center: Point, width: f64, height: f64) -> Rect {
    Rect::from_center_size(center, Size::new(width, height))
}

/// Check whether a point lies inside `bounds`, edges included.
///
/// `Rect::contains` excludes the far edges; map bounds are closed.
pub fn within_bounds(point: Point, bounds: Rect) -> bool {
    point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
}

/// Bounding box of a set of points, or `None` when empty.
pub fn bounds_of(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let init = Rect::from_points(*first, *first);
    Some(points[1..].iter().fold(init, |acc, p| acc.union_pt(*p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_sq() {
        assert_eq!(distance_sq(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 25.0);
    }

    #[test]
    fn test_centered_rect() {
        let rect = centered_rect(Point::new(100.0, 50.0), 40.0, 20.0);
        assert_eq!(rect, Rect::new(80.0, 40.0, 120.0, 60.0));
        assert_eq!(rect.center(), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_within_bounds_is_inclusive() {
        let bounds = Rect::new(0.0, 0.0, 500.0, 300.0);
        assert!(within_bounds(Point::new(0.0, 0.0), bounds));
        assert!(within_bounds(Point::new(500.0, 300.0), bounds));
        assert!(!within_bounds(Point::new(500.1, 10.0), bounds));
        assert!(!within_bounds(Point::new(10.0, -1.0), bounds));
    }

    #[test]
    fn test_bounds_of() {
        assert!(bounds_of(&[]).is_none());
        let pts = [Point::new(10.0, 20.0), Point::new(-5.0, 40.0), Point::new(30.0, 0.0)];
        assert_eq!(bounds_of(&pts), Some(Rect::new(-5.0, 0.0, 30.0, 40.0)));
    }
}
