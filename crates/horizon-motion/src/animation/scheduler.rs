//! The animation scheduler.
//!
//! [`Animation<C>`] owns the play/pause/resume/skip/reset state machine and the
//! frame clock subscription; the [`ValueCurve`] `C` decides which value belongs
//! to which elapsed time. [`TimedAnimation`](super::TimedAnimation) and
//! [`SpringAnimation`](super::SpringAnimation) are the two curves shipped with
//! the crate.
//!
//! # States
//!
//! ```text
//! Idle --play--> Playing --pause--> Paused --resume/play--> Playing
//! Playing/Paused --skip or natural end--> Finished
//! any --reset--> Idle
//! ```
//!
//! # Re-entrancy
//!
//! Targets and signal handlers may call back into the animation that invoked
//! them. A transition requested while another one is in progress (including a
//! tick) is queued and applied, in request order, once the current one has
//! completed. No lock is held while a target runs or a signal is emitted.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};

use horizon_motion_core::logging::targets;
use horizon_motion_core::{
    ConnectionGuard, Property, Signal, Surface, TickControl, TickSubscription,
};
use parking_lot::Mutex;

use super::target::AnimationTarget;

/// Duration value meaning "never ends", in milliseconds.
pub const DURATION_INFINITE: u32 = u32::MAX;

/// Computes the value of an animation at a given elapsed time.
///
/// Times are milliseconds since the animation started playing.
pub trait ValueCurve: Send + 'static {
    /// The value at elapsed time `t`.
    ///
    /// Takes `&mut self` so that stateful curves can record derived state,
    /// such as the velocity of a spring.
    fn calculate_value(&mut self, t: u32) -> f64;

    /// The total duration, or [`DURATION_INFINITE`].
    fn estimate_duration(&self) -> u32;
}

/// Playback state of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    /// Not started yet, or reset.
    #[default]
    Idle,
    /// Paused mid-way.
    Paused,
    /// Receiving frame ticks.
    Playing,
    /// Ended by reaching its duration or by [`Animation::skip`].
    Finished,
}

/// Observable properties reported through [`Animation::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationProperty {
    /// The current value.
    Value,
    /// The playback state.
    State,
    /// The animation target.
    Target,
    /// Whether the global enable-animations setting is honoured.
    FollowEnableAnimationsSetting,
    /// The start value.
    ValueFrom,
    /// The end value.
    ValueTo,
    /// The duration of a timed animation.
    Duration,
    /// The easing of a timed animation.
    Easing,
    /// The repeat count of a timed animation.
    RepeatCount,
    /// Whether a timed animation plays backwards.
    Reverse,
    /// Whether a timed animation alternates direction.
    Alternate,
    /// The initial velocity of a spring animation.
    InitialVelocity,
    /// The physical parameters of a spring animation.
    SpringParams,
    /// The rest threshold of a spring animation.
    Epsilon,
    /// Whether a spring animation is clamped.
    Clamp,
    /// The estimated duration of a spring animation.
    EstimatedDuration,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Play,
    Pause,
    Resume,
    Skip,
    Reset,
    Tick(u64),
}

struct Core {
    state: AnimationState,
    value: f64,
    start_time: u64,
    paused_time: u64,
    tick: Option<TickSubscription>,
    unmap: Option<ConnectionGuard>,
    busy: bool,
    pending: VecDeque<Op>,
}

struct Inner<C> {
    surface: Weak<Surface>,
    target: Mutex<AnimationTarget>,
    curve: Mutex<C>,
    core: Mutex<Core>,
    follow_enable_animations_setting: Property<bool>,
    done: Signal<()>,
    notify: Signal<AnimationProperty>,
}

/// A value animated over time and pushed into an [`AnimationTarget`].
///
/// `Animation` is a cheap, clonable handle; clones drive the same animation.
/// When the last handle is dropped the frame clock subscription is removed.
pub struct Animation<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for Animation<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A non-owning handle to an [`Animation`].
///
/// Lets targets and signal handlers refer back to their animation without
/// keeping it alive.
pub struct WeakAnimation<C> {
    inner: Weak<Inner<C>>,
}

impl<C> Clone for WeakAnimation<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<C: ValueCurve> WeakAnimation<C> {
    /// Get a strong handle if the animation is still alive.
    pub fn upgrade(&self) -> Option<Animation<C>> {
        self.inner.upgrade().map(|inner| Animation { inner })
    }
}

impl<C: ValueCurve> Animation<C> {
    /// Create an animation of `curve` on `surface`, delivering to `target`.
    ///
    /// The animation starts [`Idle`](AnimationState::Idle) with the value at
    /// elapsed time 0. The target is not called until the animation plays.
    pub fn from_curve(surface: &Arc<Surface>, mut curve: C, target: AnimationTarget) -> Self {
        let value = curve.calculate_value(0);
        Self {
            inner: Arc::new(Inner {
                surface: Arc::downgrade(surface),
                target: Mutex::new(target),
                curve: Mutex::new(curve),
                core: Mutex::new(Core {
                    state: AnimationState::Idle,
                    value,
                    start_time: 0,
                    paused_time: 0,
                    tick: None,
                    unmap: None,
                    busy: false,
                    pending: VecDeque::new(),
                }),
                follow_enable_animations_setting: Property::new(true),
                done: Signal::new(),
                notify: Signal::new(),
            }),
        }
    }

    /// The surface this animation ticks on, if it is still alive.
    pub fn surface(&self) -> Option<Arc<Surface>> {
        self.inner.surface.upgrade()
    }

    /// The target values are delivered to.
    pub fn target(&self) -> AnimationTarget {
        self.inner.target.lock().clone()
    }

    /// Replace the target.
    pub fn set_target(&self, target: AnimationTarget) {
        *self.inner.target.lock() = target;
        self.inner.notify.emit(AnimationProperty::Target);
    }

    /// The current playback state.
    pub fn state(&self) -> AnimationState {
        self.inner.core.lock().state
    }

    /// The most recently computed value.
    pub fn value(&self) -> f64 {
        self.inner.core.lock().value
    }

    /// The total duration reported by the curve, in milliseconds.
    pub fn estimate_duration(&self) -> u32 {
        self.inner.curve.lock().estimate_duration()
    }

    /// Whether disabled animations make [`play`](Self::play) finish at once.
    ///
    /// Defaults to `true`. Animations that carry meaning rather than
    /// decoration (a spinner, for instance) turn it off.
    pub fn follow_enable_animations_setting(&self) -> bool {
        self.inner.follow_enable_animations_setting.get()
    }

    /// Set whether the global enable-animations setting is honoured.
    pub fn set_follow_enable_animations_setting(&self, follow: bool) {
        if self.inner.follow_enable_animations_setting.set(follow) {
            self.inner
                .notify
                .emit(AnimationProperty::FollowEnableAnimationsSetting);
        }
    }

    /// Start or continue the animation.
    ///
    /// Idle animations start from the beginning, paused ones continue where
    /// they stopped and finished ones restart. Playing animations are left
    /// alone. If the surface is unmapped, or animations are disabled and
    /// followed, the animation is skipped to its end instead.
    pub fn play(&self) {
        self.inner.run(Op::Play);
    }

    /// Pause a playing animation. Does nothing in any other state.
    pub fn pause(&self) {
        self.inner.run(Op::Pause);
    }

    /// Resume a paused animation.
    ///
    /// Logs a warning and does nothing if the animation is not paused.
    pub fn resume(&self) {
        self.inner.run(Op::Resume);
    }

    /// Jump to the end, pushing the final value and emitting [`done`](Self::done).
    ///
    /// Does nothing if the animation is already finished.
    pub fn skip(&self) {
        self.inner.run(Op::Skip);
    }

    /// Stop and return to the start value without emitting `done`.
    pub fn reset(&self) {
        self.inner.run(Op::Reset);
    }

    /// Emitted once each time the animation finishes or is skipped.
    pub fn done(&self) -> &Signal<()> {
        &self.inner.done
    }

    /// Emitted with the name of each property whose value changed.
    pub fn notify(&self) -> &Signal<AnimationProperty> {
        &self.inner.notify
    }

    /// Create a non-owning handle.
    pub fn downgrade(&self) -> WeakAnimation<C> {
        WeakAnimation {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether two handles drive the same animation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Read the curve.
    pub(crate) fn with_curve<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.inner.curve.lock())
    }

    /// Mutate the curve, emitting `property` if `f` reports a change.
    ///
    /// An idle animation's value follows the curve's value at t=0; the
    /// target is not called.
    pub(crate) fn update_curve(&self, property: AnimationProperty, f: impl FnOnce(&mut C) -> bool) -> bool {
        let idle = self.state() == AnimationState::Idle;
        let (changed, start_value) = {
            let mut curve = self.inner.curve.lock();
            let changed = f(&mut curve);
            let start_value = (changed && idle).then(|| curve.calculate_value(0));
            (changed, start_value)
        };
        if !changed {
            return false;
        }

        let value_changed = start_value.is_some_and(|value| {
            let mut core = self.inner.core.lock();
            if core.state != AnimationState::Idle || core.value == value {
                return false;
            }
            core.value = value;
            true
        });

        self.inner.notify.emit(property);
        if value_changed {
            self.inner.notify.emit(AnimationProperty::Value);
        }
        true
    }
}

impl<C: ValueCurve> Inner<C> {
    fn run(self: &Arc<Self>, op: Op) {
        {
            let mut core = self.core.lock();
            if core.busy {
                tracing::trace!(target: targets::ANIMATION, ?op, "deferring nested transition");
                core.pending.push_back(op);
                return;
            }
            core.busy = true;
        }

        let mut next = Some(op);
        while let Some(op) = next {
            self.apply(op);
            let mut core = self.core.lock();
            next = core.pending.pop_front();
            if next.is_none() {
                core.busy = false;
            }
        }
    }

    fn apply(self: &Arc<Self>, op: Op) {
        match op {
            Op::Play => self.play(),
            Op::Pause => self.pause(),
            Op::Resume => self.resume(),
            Op::Skip => self.skip(),
            Op::Reset => self.reset(),
            Op::Tick(frame_time) => self.tick(frame_time),
        }
    }

    fn state(&self) -> AnimationState {
        self.core.lock().state
    }

    fn set_state(&self, state: AnimationState) {
        let old = {
            let mut core = self.core.lock();
            std::mem::replace(&mut core.state, state)
        };
        if old != state {
            tracing::debug!(target: targets::ANIMATION, from = ?old, to = ?state, "state changed");
            self.notify.emit(AnimationProperty::State);
        }
    }

    fn set_value_at(&self, t: u32) {
        let value = self.curve.lock().calculate_value(t);
        let changed = {
            let mut core = self.core.lock();
            let changed = core.value != value;
            core.value = value;
            changed
        };

        let target = self.target.lock().clone();
        target.set_value(value);

        if changed {
            self.notify.emit(AnimationProperty::Value);
        }
    }

    fn stop_ticking(&self) {
        let (tick, unmap) = {
            let mut core = self.core.lock();
            (core.tick.take(), core.unmap.take())
        };
        // Unregister outside the lock.
        drop(tick);
        drop(unmap);
    }

    fn play(self: &Arc<Self>) {
        match self.state() {
            AnimationState::Playing => {
                tracing::trace!(target: targets::ANIMATION, "already playing");
                return;
            }
            AnimationState::Finished => {
                {
                    let mut core = self.core.lock();
                    core.start_time = 0;
                    core.paused_time = 0;
                }
                self.set_state(AnimationState::Idle);
            }
            AnimationState::Idle | AnimationState::Paused => {}
        }
        self.start();
    }

    fn start(self: &Arc<Self>) {
        self.set_state(AnimationState::Playing);

        let Some(surface) = self.surface.upgrade() else {
            tracing::warn!(target: targets::ANIMATION, "surface is gone; animation will not tick");
            return;
        };

        let follow = self.follow_enable_animations_setting.get();
        if (follow && !surface.enable_animations()) || !surface.is_mapped() {
            tracing::debug!(
                target: targets::ANIMATION,
                mapped = surface.is_mapped(),
                "animations disabled or surface unmapped; skipping"
            );
            self.skip();
            return;
        }

        let frame_time = surface.frame_time();
        let mut core = self.core.lock();
        core.start_time = frame_time.saturating_sub(core.paused_time);

        if core.tick.is_some() {
            return;
        }

        let weak = Arc::downgrade(self);
        core.unmap = Some(surface.unmapped.connect_scoped(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.run(Op::Skip);
            }
        }));

        let weak = Arc::downgrade(self);
        core.tick = Some(TickSubscription::new(
            surface.clock(),
            Arc::new(move |frame_time| match weak.upgrade() {
                Some(inner) => {
                    inner.run(Op::Tick(frame_time));
                    TickControl::Continue
                }
                None => TickControl::Remove,
            }),
        ));
        tracing::trace!(target: targets::ANIMATION, start_time = core.start_time, "subscribed to frame clock");
    }

    fn pause(&self) {
        if self.state() != AnimationState::Playing {
            return;
        }

        self.set_state(AnimationState::Paused);
        self.stop_ticking();

        if let Some(surface) = self.surface.upgrade() {
            let frame_time = surface.frame_time();
            let mut core = self.core.lock();
            core.paused_time = frame_time.saturating_sub(core.start_time);
        }
    }

    fn resume(self: &Arc<Self>) {
        if self.state() != AnimationState::Paused {
            tracing::warn!(
                target: targets::ANIMATION,
                state = ?self.state(),
                "resume() called on an animation that is not paused"
            );
            return;
        }
        self.start();
    }

    fn skip(&self) {
        match self.state() {
            AnimationState::Finished => return,
            AnimationState::Idle => self.set_state(AnimationState::Playing),
            AnimationState::Playing | AnimationState::Paused => {}
        }

        self.set_state(AnimationState::Finished);
        self.stop_ticking();

        let duration = self.curve.lock().estimate_duration();
        self.set_value_at(duration);

        {
            let mut core = self.core.lock();
            core.start_time = 0;
            core.paused_time = 0;
        }

        tracing::debug!(target: targets::ANIMATION, value = self.core.lock().value, "animation done");
        self.done.emit(());
    }

    fn reset(&self) {
        self.stop_ticking();
        self.set_state(AnimationState::Idle);
        {
            let mut core = self.core.lock();
            core.start_time = 0;
            core.paused_time = 0;
        }
        self.set_value_at(0);
    }

    fn tick(&self, frame_time: u64) {
        let (state, start_time) = {
            let core = self.core.lock();
            (core.state, core.start_time)
        };
        if state != AnimationState::Playing {
            return;
        }

        let t = frame_time.saturating_sub(start_time);
        let duration = self.curve.lock().estimate_duration();

        if duration != DURATION_INFINITE && t >= u64::from(duration) {
            self.skip();
            return;
        }

        let t = u32::try_from(t).unwrap_or(DURATION_INFINITE - 1);
        self.set_value_at(t);
        tracing::trace!(target: targets::ANIMATION, t, value = self.core.lock().value, "tick");
    }
}

impl<C> fmt::Debug for Animation<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.core.lock();
        f.debug_struct("Animation")
            .field("state", &core.state)
            .field("value", &core.value)
            .field("ticking", &core.tick.is_some())
            .finish()
    }
}
