//! Swipe a two-page carousel and let a spring finish the movement.
//!
//! Run with: RUST_LOG=horizon_motion=debug cargo run -p horizon-motion --example swipe_handoff

use std::sync::Arc;

use horizon_motion::animation::{AnimationState, AnimationTarget, SpringParams};
use horizon_motion::swipe::{InputSource, SwipeTracker, Swipeable};
use horizon_motion_core::{AnimationSettings, ManualFrameClock, Property, Surface};
use parking_lot::Mutex;

struct Carousel {
    position: Arc<Property<f64>>,
}

impl Swipeable for Carousel {
    fn distance(&self) -> f64 {
        360.0
    }

    fn snap_points(&self) -> Vec<f64> {
        vec![0.0, 1.0]
    }

    fn progress(&self) -> f64 {
        self.position.get()
    }

    fn cancel_progress(&self) -> f64 {
        self.position.get().round()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let clock = ManualFrameClock::new();
    let surface = Surface::new(clock.clone(), AnimationSettings::new());
    let carousel = Arc::new(Carousel {
        position: Arc::new(Property::new(0.0)),
    });

    let tracker = SwipeTracker::new(&carousel);
    let position = carousel.position.clone();
    tracker.update_swipe.connect(move |&progress| {
        position.set(progress);
    });
    let released = Arc::new(Mutex::new(None));
    let released_clone = released.clone();
    tracker
        .end_swipe
        .connect(move |&end| *released_clone.lock() = Some(end));

    // A quick flick to the left, one event per 8 ms.
    tracker.drag_begin(300.0, 200.0, InputSource::Touch);
    for (i, offset) in [-10.0, -30.0, -60.0, -95.0, -130.0].into_iter().enumerate() {
        tracker.drag_update(offset, 2.0, i as u32 * 8);
        println!("drag {offset:>6.1} px -> progress {:.3}", tracker.progress());
    }
    tracker.drag_end(40);

    let Some(end) = released.lock().take() else {
        println!("the gesture was not claimed");
        return;
    };
    println!(
        "released at {:.3} heading to {} at {:.2} units/s",
        end.from, end.to, end.velocity
    );

    let spring = end.into_spring_animation(
        &surface,
        SpringParams::navigation(),
        AnimationTarget::property(&carousel.position),
    );
    println!("spring should settle in {} ms", spring.estimated_duration());
    spring.play();

    let mut frames = 0;
    while spring.state() == AnimationState::Playing {
        clock.advance(16);
        frames += 1;
        if frames % 5 == 0 {
            println!("frame {frames:>3}: position {:.4}", carousel.position.get());
        }
    }
    println!(
        "settled at {} after {frames} frames",
        carousel.position.get()
    );
}
