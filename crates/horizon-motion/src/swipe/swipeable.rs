//! The swipeable descriptor and the input vocabulary of swipe tracking.

use crate::error::{MotionError, Result};

/// Direction of a navigation gesture, relative to the progress axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationDirection {
    /// Towards lower progress.
    Back,
    /// Towards higher progress.
    Forward,
}

/// Axis a tracker follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Left/right swipes.
    #[default]
    Horizontal,
    /// Up/down swipes.
    Vertical,
}

/// The device a gesture comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// A mouse button drag; gated by `allow_mouse_drag`.
    Mouse,
    /// A touchscreen.
    Touch,
    /// A stylus.
    Pen,
    /// A touchpad; only delivers smooth scrolls.
    Touchpad,
}

/// Verdict on an input sequence after a drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventSequenceState {
    /// Undecided; keep delivering events.
    #[default]
    None,
    /// The tracker owns the sequence; other handlers should drop it.
    Claimed,
    /// The tracker will not swipe with this sequence.
    Denied,
}

/// Whether a scroll event was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Propagation {
    /// Let other handlers see the event.
    #[default]
    Proceed,
    /// The event was consumed by the swipe.
    Stop,
}

/// A scroll event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Horizontal delta.
    pub dx: f64,
    /// Vertical delta.
    pub dy: f64,
    /// Event time in milliseconds.
    pub time: u32,
    /// Device that produced the event.
    pub source: InputSource,
    /// Whether the deltas are continuous rather than wheel clicks.
    pub smooth: bool,
    /// Whether this is the stop event ending a scroll sequence.
    pub is_stop: bool,
}

impl ScrollEvent {
    /// A smooth touchpad scroll.
    pub fn touchpad(dx: f64, dy: f64, time: u32) -> Self {
        Self {
            dx,
            dy,
            time,
            source: InputSource::Touchpad,
            smooth: true,
            is_stop: false,
        }
    }

    /// The stop event that ends a touchpad scroll sequence.
    pub fn touchpad_stop(time: u32) -> Self {
        Self {
            is_stop: true,
            ..Self::touchpad(0.0, 0.0, time)
        }
    }
}

/// An axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside; the right and bottom edges are
    /// exclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// A widget that can be swiped.
///
/// The tracker queries these at gesture start and as the gesture moves, so
/// implementations should report current values.
pub trait Swipeable: Send + Sync {
    /// Pixels of travel that correspond to one progress unit.
    fn distance(&self) -> f64;

    /// Rest positions, in ascending order.
    fn snap_points(&self) -> Vec<f64>;

    /// The current progress.
    fn progress(&self) -> f64;

    /// The snap point to return to when a swipe is cancelled.
    fn cancel_progress(&self) -> f64;

    /// The area a swipe in `direction` may start from, or `None` to accept
    /// swipes from anywhere.
    fn swipe_area(&self, direction: NavigationDirection, is_drag: bool) -> Option<Rect> {
        let _ = (direction, is_drag);
        None
    }
}

/// Check that snap points are usable for a gesture.
pub fn validate_snap_points(points: &[f64]) -> Result<()> {
    if points.is_empty() {
        return Err(MotionError::EmptySnapPoints);
    }
    if points
        .windows(2)
        .any(|pair| pair[0].is_nan() || pair[1].is_nan() || pair[0] > pair[1])
    {
        return Err(MotionError::NonMonotonicSnapPoints);
    }
    Ok(())
}

/// Check that a swipe distance is usable.
pub fn validate_distance(distance: f64) -> Result<()> {
    if distance.is_finite() && distance > 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidDistance(distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(109.9, 69.9));
        assert!(!rect.contains(110.0, 30.0));
        assert!(!rect.contains(50.0, 70.0));
        assert!(!rect.contains(9.9, 30.0));
    }

    #[test]
    fn test_validate_snap_points() {
        assert_eq!(validate_snap_points(&[]), Err(MotionError::EmptySnapPoints));
        assert_eq!(
            validate_snap_points(&[0.0, 2.0, 1.0]),
            Err(MotionError::NonMonotonicSnapPoints)
        );
        assert_eq!(
            validate_snap_points(&[0.0, f64::NAN]),
            Err(MotionError::NonMonotonicSnapPoints)
        );
        assert!(validate_snap_points(&[0.5]).is_ok());
        assert!(validate_snap_points(&[0.0, 1.0, 1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_validate_distance() {
        assert!(validate_distance(320.0).is_ok());
        assert_eq!(validate_distance(0.0), Err(MotionError::InvalidDistance(0.0)));
        assert!(validate_distance(f64::INFINITY).is_err());
    }

    #[test]
    fn test_scroll_event_constructors() {
        let event = ScrollEvent::touchpad(1.0, -2.0, 30);
        assert!(event.smooth && !event.is_stop);
        assert_eq!(event.source, InputSource::Touchpad);
        assert!(ScrollEvent::touchpad_stop(40).is_stop);
    }
}
