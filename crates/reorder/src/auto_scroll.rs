#![forbid(unsafe_code)]

//! Edge auto-scrolling.
//!
//! While a fluid drag holds the proxy near an edge of its travel bounds, the
//! container scrolls at a fixed interval with a speed proportional to how far
//! the proxy has pushed into the edge zone. The scroller owns no timer:
//! [`AutoScroller::poll`] is driven by the sorter's `tick`.
//!
//! # Invariants
//!
//! 1. At most one direction per axis is active, and only one axis at a time
//!    (checked in the order down, right, up, left).
//! 2. No scroll is scheduled toward an edge that is already fully scrolled.
//! 3. [`AutoScroller::clear`] is idempotent and always leaves the scroller
//!    inactive.

use std::time::Duration;

use reorder_core::geometry::{Axis, Point, Size, Vec2};
use web_time::Instant;

use crate::host::ScrollMetrics;

/// Period between scroll steps.
pub const AUTO_SCROLL_INTERVAL: Duration = Duration::from_millis(5);

/// Pixels per step at one full proxy-length of overshoot.
pub const AUTO_SCROLL_ACCELERATION: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Running {
    velocity: Vec2,
    next_due: Instant,
}

/// Interval-driven edge scroller.
#[derive(Debug, Clone, Default)]
pub struct AutoScroller {
    running: Option<Running>,
}

impl AutoScroller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate the edge conditions for a proxy at `position` with travel
    /// bounds `min..max`.
    ///
    /// Returns the per-step velocity now in effect (zero when stopped).
    pub fn update(
        &mut self,
        position: Point,
        (min, max): (Point, Point),
        size: Size,
        axis: Axis,
        metrics: &ScrollMetrics,
        now: Instant,
    ) -> Vec2 {
        let (w, h) = (size.width, size.height);
        let mut velocity = Vec2::ZERO;

        if axis.vertical() && h > 0.0 && position.y >= max.y - h / 2.0 && !metrics.at_bottom() {
            velocity.y = AUTO_SCROLL_ACCELERATION * ((max.y - h / 2.0 - position.y) / h).abs();
        } else if axis.horizontal()
            && w > 0.0
            && position.x >= max.x - w / 2.0
            && !metrics.at_right()
        {
            velocity.x = AUTO_SCROLL_ACCELERATION * ((max.x - w / 2.0 - position.x) / w).abs();
        } else if axis.vertical() && h > 0.0 && position.y <= min.y + h / 2.0 && !metrics.at_top()
        {
            velocity.y = -AUTO_SCROLL_ACCELERATION * ((position.y - h / 2.0 - min.y) / h).abs();
        } else if axis.horizontal() && w > 0.0 && position.x <= min.x + w / 2.0 && !metrics.at_left()
        {
            velocity.x = -AUTO_SCROLL_ACCELERATION * ((position.x - w / 2.0 - min.x) / w).abs();
        }

        if velocity.is_zero() {
            self.clear();
        } else {
            let next_due = match self.running {
                Some(running) => running.next_due,
                None => now + AUTO_SCROLL_INTERVAL,
            };
            self.running = Some(Running { velocity, next_due });
        }
        velocity
    }

    /// Scroll delta owed at `now`, covering every interval that has elapsed
    /// since the last poll. `None` when inactive or not yet due.
    pub fn poll(&mut self, now: Instant) -> Option<Vec2> {
        let running = self.running.as_mut()?;
        if now < running.next_due {
            return None;
        }
        let overdue = now.duration_since(running.next_due);
        let steps = 1 + (overdue.as_micros() / AUTO_SCROLL_INTERVAL.as_micros()) as u32;
        running.next_due += AUTO_SCROLL_INTERVAL * steps;
        Some(running.velocity * steps as f32)
    }

    pub fn clear(&mut self) {
        self.running = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrollable(offset_y: f32) -> ScrollMetrics {
        ScrollMetrics::new(
            Vec2::new(0.0, offset_y),
            Size::new(100.0, 1000.0),
            Size::new(100.0, 200.0),
        )
    }

    const BOUNDS: (Point, Point) = (Point::new(0.0, 0.0), Point::new(0.0, 160.0));
    const SIZE: Size = Size::new(100.0, 40.0);

    #[test]
    fn scrolls_down_near_bottom_edge() {
        let now = Instant::now();
        let mut scroller = AutoScroller::new();
        let v = scroller.update(Point::new(0.0, 160.0), BOUNDS, SIZE, Axis::Y, &scrollable(0.0), now);
        assert!((v.y - 5.0).abs() < 1e-4, "{v:?}");
        assert!(scroller.is_active());
    }

    #[test]
    fn scrolls_up_near_top_edge_unless_at_top() {
        let now = Instant::now();
        let mut scroller = AutoScroller::new();
        let v = scroller.update(Point::new(0.0, 0.0), BOUNDS, SIZE, Axis::Y, &scrollable(50.0), now);
        assert!((v.y + 5.0).abs() < 1e-4, "{v:?}");

        let v = scroller.update(Point::new(0.0, 0.0), BOUNDS, SIZE, Axis::Y, &scrollable(0.0), now);
        assert_eq!(v, Vec2::ZERO);
        assert!(!scroller.is_active());
    }

    #[test]
    fn no_scroll_in_the_middle() {
        let mut scroller = AutoScroller::new();
        let v = scroller.update(
            Point::new(0.0, 80.0),
            BOUNDS,
            SIZE,
            Axis::Y,
            &scrollable(50.0),
            Instant::now(),
        );
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn no_scroll_when_fully_scrolled_down() {
        let mut scroller = AutoScroller::new();
        let v = scroller.update(
            Point::new(0.0, 170.0),
            BOUNDS,
            SIZE,
            Axis::Y,
            &scrollable(800.0),
            Instant::now(),
        );
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn disabled_axis_is_ignored() {
        let mut scroller = AutoScroller::new();
        let metrics = ScrollMetrics::new(Vec2::ZERO, Size::new(1000.0, 200.0), Size::new(200.0, 200.0));
        let v = scroller.update(
            Point::new(0.0, 80.0),
            BOUNDS,
            SIZE,
            Axis::Y,
            &metrics,
            Instant::now(),
        );
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn poll_respects_interval_and_catches_up() {
        let start = Instant::now();
        let mut scroller = AutoScroller::new();
        scroller.update(Point::new(0.0, 160.0), BOUNDS, SIZE, Axis::Y, &scrollable(0.0), start);

        assert_eq!(scroller.poll(start + Duration::from_millis(4)), None);
        let step = scroller.poll(start + Duration::from_millis(5)).unwrap();
        assert!((step.y - 5.0).abs() < 1e-4);
        let burst = scroller.poll(start + Duration::from_millis(20)).unwrap();
        assert!((burst.y - 15.0).abs() < 1e-4, "{burst:?}");
        assert_eq!(scroller.poll(start + Duration::from_millis(21)), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut scroller = AutoScroller::new();
        scroller.clear();
        scroller.update(
            Point::new(0.0, 160.0),
            BOUNDS,
            SIZE,
            Axis::Y,
            &scrollable(0.0),
            Instant::now(),
        );
        scroller.clear();
        scroller.clear();
        assert!(!scroller.is_active());
        assert_eq!(scroller.poll(Instant::now() + Duration::from_secs(1)), None);
    }
}
