//! End-to-end animation scenarios driven by a manual frame clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use horizon_motion::animation::{
    AnimationState, AnimationTarget, Easing, SpringAnimation, SpringParams, TimedAnimation,
    DURATION_INFINITE,
};
use horizon_motion_core::{AnimationSettings, ManualFrameClock, Property, Surface};
use parking_lot::Mutex;

fn setup() -> (Arc<ManualFrameClock>, Arc<Surface>) {
    let clock = ManualFrameClock::new();
    let surface = Surface::new(clock.clone(), AnimationSettings::new());
    (clock, surface)
}

fn count_done<C: horizon_motion::animation::ValueCurve>(
    animation: &horizon_motion::animation::Animation<C>,
) -> Arc<AtomicUsize> {
    let done = Arc::new(AtomicUsize::new(0));
    let done_clone = done.clone();
    animation.done().connect(move |_| {
        done_clone.fetch_add(1, Ordering::SeqCst);
    });
    done
}

#[test]
fn test_linear_timed_animation_hits_midpoint_and_end() {
    let (clock, surface) = setup();
    let value = Arc::new(Property::new(-1.0));
    let animation =
        TimedAnimation::new(&surface, 0.0, 1.0, 200, AnimationTarget::property(&value))
            .with_easing(Easing::Linear);
    let done = count_done(&animation);

    animation.play();
    clock.advance(100);
    assert!((value.get() - 0.5).abs() < 1e-12);
    assert_eq!(animation.state(), AnimationState::Playing);

    clock.advance(100);
    assert_eq!(value.get(), 1.0);
    assert_eq!(animation.state(), AnimationState::Finished);
    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert_eq!(clock.tick_callback_count(), 0);
}

#[test]
fn test_alternating_animation_returns_to_start() {
    let (clock, surface) = setup();
    let values = Arc::new(Mutex::new(Vec::new()));
    let values_clone = values.clone();
    let animation = TimedAnimation::new(
        &surface,
        0.0,
        1.0,
        100,
        AnimationTarget::callback(move |v| values_clone.lock().push(v)),
    )
    .with_easing(Easing::Linear)
    .with_repeat_count(2)
    .with_alternate(true);

    animation.play();
    for _ in 0..15 {
        clock.advance(10);
    }
    let at_150 = animation.value();
    clock.advance(10);
    let at_160 = animation.value();
    assert!((at_150 - 0.5).abs() < 1e-12);
    assert!(at_160 < at_150, "second iteration runs backwards");

    for _ in 0..4 {
        clock.advance(10);
    }
    assert_eq!(animation.value(), 0.0);
    assert_eq!(animation.state(), AnimationState::Finished);
    assert_eq!(values.lock().last(), Some(&0.0));
}

#[test]
fn test_critically_damped_spring_never_overshoots() {
    let (clock, surface) = setup();
    let spring = SpringAnimation::new(
        &surface,
        0.0,
        1.0,
        SpringParams::new(1.0, 1.0, 100.0).unwrap(),
        AnimationTarget::none(),
    );
    assert_ne!(spring.estimated_duration(), DURATION_INFINITE);
    let done = count_done(&spring);

    spring.play();
    let mut previous = spring.value();
    while spring.state() == AnimationState::Playing {
        clock.advance(1);
        let value = spring.value();
        assert!(value <= 1.0 + spring.epsilon(), "overshoot to {value}");
        assert!(value >= previous, "moved away from the target");
        previous = value;
    }

    assert_eq!(spring.value(), 1.0);
    assert_eq!(spring.velocity(), 0.0);
    assert_eq!(done.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clamped_spring_stays_in_bounds() {
    let (clock, surface) = setup();
    let spring = SpringAnimation::new(
        &surface,
        10.0,
        -5.0,
        SpringParams::new(0.3, 1.0, 300.0).unwrap(),
        AnimationTarget::none(),
    )
    .with_clamp(true);

    spring.play();
    while spring.state() == AnimationState::Playing {
        clock.advance(4);
        let value = spring.value();
        assert!((-5.0..=10.0).contains(&value), "{value} left the range");
    }
    assert_eq!(spring.value(), -5.0);
}

#[test]
fn test_skip_matches_natural_completion() {
    let (clock, surface) = setup();
    let natural = TimedAnimation::new(&surface, 2.0, 8.0, 300, AnimationTarget::none())
        .with_repeat_count(3)
        .with_alternate(true);
    let skipped = TimedAnimation::new(&surface, 2.0, 8.0, 300, AnimationTarget::none())
        .with_repeat_count(3)
        .with_alternate(true);
    let done = count_done(&skipped);

    natural.play();
    skipped.play();
    clock.advance(50);
    skipped.skip();
    assert_eq!(done.load(Ordering::SeqCst), 1);

    clock.advance(900);
    assert_eq!(natural.state(), AnimationState::Finished);
    assert_eq!(skipped.value(), natural.value());
    assert_eq!(done.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reset_is_silent() {
    let (clock, surface) = setup();
    let animation = TimedAnimation::new(&surface, 0.0, 1.0, 100, AnimationTarget::none());
    let done = count_done(&animation);

    animation.reset();
    animation.play();
    clock.advance(40);
    animation.reset();
    assert_eq!(animation.state(), AnimationState::Idle);
    assert_eq!(animation.value(), 0.0);

    animation.play();
    clock.advance(200);
    animation.reset();
    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert_eq!(clock.tick_callback_count(), 0);
}

#[test]
fn test_pause_holds_position_across_time() {
    let (clock, surface) = setup();
    let animation = TimedAnimation::new(&surface, 0.0, 100.0, 100, AnimationTarget::none())
        .with_easing(Easing::Linear);

    animation.play();
    clock.advance(30);
    animation.pause();
    clock.advance(500);
    assert_eq!(animation.value(), 30.0);
    assert_eq!(clock.tick_callback_count(), 0);

    animation.resume();
    clock.advance(20);
    assert_eq!(animation.value(), 50.0);
}

#[test]
fn test_disabled_animations_jump_to_the_end() {
    let clock = ManualFrameClock::new();
    let settings = AnimationSettings::new();
    let surface = Surface::new(clock.clone(), settings.clone());
    settings.set_enable_animations(false);

    let animation = TimedAnimation::new(&surface, 0.0, 1.0, 500, AnimationTarget::none());
    animation.play();
    assert_eq!(animation.state(), AnimationState::Finished);
    assert_eq!(animation.value(), 1.0);

    let forced = TimedAnimation::new(&surface, 0.0, 1.0, 500, AnimationTarget::none());
    forced.set_follow_enable_animations_setting(false);
    forced.play();
    assert_eq!(forced.state(), AnimationState::Playing);
}

#[test]
fn test_many_animations_share_one_clock() {
    let (clock, surface) = setup();
    let animations: Vec<_> = (1..=5)
        .map(|i| {
            TimedAnimation::new(&surface, 0.0, 1.0, i * 100, AnimationTarget::none())
                .with_easing(Easing::Linear)
        })
        .collect();
    for animation in &animations {
        animation.play();
    }
    assert_eq!(clock.tick_callback_count(), 5);

    clock.advance(250);
    let finished = animations
        .iter()
        .filter(|a| a.state() == AnimationState::Finished)
        .count();
    assert_eq!(finished, 2);
    assert_eq!(clock.tick_callback_count(), 3);

    drop(animations);
    clock.advance(16);
    assert_eq!(clock.tick_callback_count(), 0);
}
