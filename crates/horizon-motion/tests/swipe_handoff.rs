//! End-to-end swipe scenarios: gesture input, release decision, and the
//! spring animation that finishes the movement.

use std::sync::Arc;

use horizon_motion::animation::{AnimationState, AnimationTarget, SpringParams};
use horizon_motion::swipe::{
    EndSwipe, EventSequenceState, InputSource, ScrollEvent, SwipeGroup, SwipeState, SwipeTracker,
    Swipeable,
};
use horizon_motion_core::{AnimationSettings, ManualFrameClock, Property, Surface};
use parking_lot::Mutex;

/// A two-page carousel whose position is a reactive property.
struct Carousel {
    position: Arc<Property<f64>>,
    points: Vec<f64>,
}

impl Carousel {
    fn new(points: Vec<f64>) -> Arc<Self> {
        Arc::new(Self {
            position: Arc::new(Property::new(0.0)),
            points,
        })
    }
}

impl Swipeable for Carousel {
    fn distance(&self) -> f64 {
        100.0
    }

    fn snap_points(&self) -> Vec<f64> {
        self.points.clone()
    }

    fn progress(&self) -> f64 {
        self.position.get()
    }

    fn cancel_progress(&self) -> f64 {
        self.position.get().round()
    }
}

fn follow_updates(tracker: &SwipeTracker, carousel: &Arc<Carousel>) {
    let position = carousel.position.clone();
    tracker.update_swipe.connect(move |&progress| {
        position.set(progress);
    });
}

fn capture_end(tracker: &SwipeTracker) -> Arc<Mutex<Option<EndSwipe>>> {
    let end = Arc::new(Mutex::new(None));
    let end_clone = end.clone();
    tracker.end_swipe.connect(move |&e| *end_clone.lock() = Some(e));
    end
}

#[test]
fn test_release_settles_on_nearest_point_and_springs_there() {
    let carousel = Carousel::new(vec![0.0, 1.0]);
    let tracker = SwipeTracker::new(&carousel);
    assert!(!tracker.upper_overshoot());
    follow_updates(&tracker, &carousel);
    let end = capture_end(&tracker);

    tracker.drag_begin(10.0, 10.0, InputSource::Touch);
    tracker.drag_update(-20.0, 0.0, 0);
    assert_eq!(tracker.drag_update(-30.0, 0.0, 16), EventSequenceState::Claimed);

    // Far past the last page: 0.1 + 1.2 would be 1.3.
    tracker.drag_update(-150.0, 0.0, 32);
    assert_eq!(tracker.progress(), 1.0);
    assert_eq!(carousel.position.get(), 1.0);

    // Back to 0.6, then hold still before lifting the finger.
    tracker.drag_update(-110.0, 0.0, 48);
    assert!((tracker.progress() - 0.6).abs() < 1e-9);
    tracker.drag_end(400);
    assert_eq!(tracker.state(), SwipeState::Idle);

    let end = end.lock().take().unwrap();
    assert!((end.from - 0.6).abs() < 1e-9);
    assert_eq!(end.to, 1.0);
    assert!(end.velocity.abs() < 1e-9);

    let clock = ManualFrameClock::new();
    let surface = Surface::new(clock.clone(), AnimationSettings::new());
    let spring = end.into_spring_animation(
        &surface,
        SpringParams::navigation(),
        AnimationTarget::property(&carousel.position),
    );
    spring.play();
    while spring.state() == AnimationState::Playing {
        clock.advance(16);
    }
    assert_eq!(carousel.position.get(), 1.0);
}

#[test]
fn test_fling_hands_velocity_to_the_spring() {
    let carousel = Carousel::new(vec![0.0, 1.0]);
    let tracker = SwipeTracker::new(&carousel);
    follow_updates(&tracker, &carousel);
    let end = capture_end(&tracker);

    tracker.drag_begin(10.0, 10.0, InputSource::Touch);
    tracker.drag_update(-10.0, 0.0, 0);
    tracker.drag_update(-30.0, 0.0, 10);
    tracker.drag_end(12);

    // 20 px in 10 ms is a fling towards the next page.
    let end = end.lock().take().unwrap();
    assert_eq!(end.to, 1.0);
    assert!((end.velocity - 20.0).abs() < 1e-9);

    let clock = ManualFrameClock::new();
    let surface = Surface::new(clock.clone(), AnimationSettings::new());
    let spring = end.into_spring_animation(
        &surface,
        SpringParams::navigation(),
        AnimationTarget::property(&carousel.position),
    );
    assert_eq!(spring.initial_velocity(), end.velocity);
    spring.play();
    clock.advance(1);
    assert!(carousel.position.get() > end.from);
}

#[test]
fn test_cancel_restores_nothing_by_itself() {
    let carousel = Carousel::new(vec![0.0, 1.0]);
    let tracker = SwipeTracker::new(&carousel);
    follow_updates(&tracker, &carousel);
    let end = capture_end(&tracker);
    let cancelled = Arc::new(Mutex::new(Vec::new()));
    let cancelled_clone = cancelled.clone();
    tracker
        .swipe_cancelled
        .connect(move |&p| cancelled_clone.lock().push(p));

    tracker.drag_begin(10.0, 10.0, InputSource::Touch);
    tracker.drag_update(-20.0, 0.0, 0);
    tracker.drag_update(-45.0, 0.0, 16);
    let moved_to = carousel.position.get();
    tracker.drag_cancel();

    assert_eq!(*cancelled.lock(), vec![0.0]);
    assert!(end.lock().is_none());
    // The host decides how to go back; the tracker starts no animation.
    assert_eq!(carousel.position.get(), moved_to);
}

#[test]
fn test_touchpad_swipe_between_pages() {
    let carousel = Carousel::new(vec![0.0, 1.0, 2.0]);
    let tracker = SwipeTracker::new(&carousel);
    follow_updates(&tracker, &carousel);
    let end = capture_end(&tracker);

    for (i, dx) in [2.0, 3.0, 3.0, 2.0].into_iter().enumerate() {
        let time = i as u32 * 10;
        assert_eq!(
            tracker.scroll(ScrollEvent::touchpad(dx, 0.1, time)),
            horizon_motion::swipe::Propagation::Stop
        );
    }
    assert!((tracker.progress() - 0.25).abs() < 1e-9);
    tracker.scroll(ScrollEvent::touchpad_stop(40));

    let end = end.lock().take().unwrap();
    assert_eq!(end.to, 1.0);
    assert!(end.velocity > 0.0);
}

#[test]
fn test_group_moves_header_with_content() {
    let content = Carousel::new(vec![0.0, 1.0]);
    let header = Carousel::new(vec![0.0, 1.0]);
    let content_tracker = Arc::new(SwipeTracker::new(&content));
    let header_tracker = Arc::new(SwipeTracker::new(&header));
    follow_updates(&content_tracker, &content);
    follow_updates(&header_tracker, &header);
    let header_end = capture_end(&header_tracker);

    let group = SwipeGroup::new();
    group.add_tracker(&content_tracker);
    group.add_tracker(&header_tracker);

    content_tracker.drag_begin(10.0, 10.0, InputSource::Touch);
    content_tracker.drag_update(-20.0, 0.0, 0);
    content_tracker.drag_update(-60.0, 0.0, 16);
    assert!((header.position.get() - 0.4).abs() < 1e-9);

    content_tracker.drag_end(400);
    let end = header_end.lock().take().unwrap();
    assert!((end.from - 0.4).abs() < 1e-9);
    assert_eq!(end.to, 0.0);
    assert_eq!(header_tracker.state(), SwipeState::Idle);
}
