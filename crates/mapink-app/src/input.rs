//! Pointer press classification.

use kurbo::Point;
use std::time::Instant;

const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// What a primary press means to the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerGesture {
    Click(Point),
    /// Second press of a double click. Only this is reported for that press;
    /// the first press was already reported as a click.
    DoubleClick(Point),
}

/// Turns raw presses into clicks and double clicks.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a press happening now.
    pub fn press(&mut self, position: Point) -> PointerGesture {
        self.press_at(position, Instant::now())
    }

    /// Classify a press at a given instant.
    pub fn press_at(&mut self, position: Point, now: Instant) -> PointerGesture {
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.saturating_duration_since(last_time).as_millis();
            if elapsed < DOUBLE_CLICK_TIME_MS && position.distance(last_pos) < DOUBLE_CLICK_DISTANCE {
                // Reset so a third press starts a new sequence.
                self.last_click_time = None;
                self.last_click_position = None;
                return PointerGesture::DoubleClick(position);
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
        PointerGesture::Click(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_double_click_detection() {
        let mut tracker = PointerTracker::new();
        let t0 = Instant::now();
        let pos = Point::new(100.0, 100.0);

        assert_eq!(tracker.press_at(pos, t0), PointerGesture::Click(pos));
        assert_eq!(
            tracker.press_at(pos, t0 + Duration::from_millis(200)),
            PointerGesture::DoubleClick(pos)
        );
        // Third press starts over.
        assert_eq!(
            tracker.press_at(pos, t0 + Duration::from_millis(300)),
            PointerGesture::Click(pos)
        );
    }

    #[test]
    fn test_double_click_too_far() {
        let mut tracker = PointerTracker::new();
        let t0 = Instant::now();
        tracker.press_at(Point::new(100.0, 100.0), t0);
        let far = Point::new(200.0, 200.0);
        assert_eq!(
            tracker.press_at(far, t0 + Duration::from_millis(100)),
            PointerGesture::Click(far)
        );
    }

    #[test]
    fn test_double_click_too_slow() {
        let mut tracker = PointerTracker::new();
        let t0 = Instant::now();
        let pos = Point::new(10.0, 10.0);
        tracker.press_at(pos, t0);
        assert_eq!(
            tracker.press_at(pos, t0 + Duration::from_millis(800)),
            PointerGesture::Click(pos)
        );
    }
}
