//! Host surfaces.
//!
//! A [`Surface`] stands in for the widget an animation belongs to. It provides
//! the frame clock, reports whether it is mapped, and exposes the shared
//! [`AnimationSettings`]. Animations only ever hold a `Weak<Surface>`.

use std::sync::Arc;

use crate::frame_clock::FrameClock;
use crate::logging::targets;
use crate::property::Property;
use crate::settings::AnimationSettings;
use crate::signal::Signal;

/// The host surface driving a set of animations.
pub struct Surface {
    clock: Arc<dyn FrameClock>,
    settings: Arc<AnimationSettings>,
    mapped: Property<bool>,
    /// Emitted whenever the mapped state changes.
    pub mapped_changed: Signal<bool>,
    /// Emitted when the surface stops being mapped.
    pub unmapped: Signal<()>,
}

impl Surface {
    /// Create a mapped surface ticking on `clock`.
    ///
    /// Hosts that create surfaces before showing them call [`unmap`](Self::unmap)
    /// right away.
    pub fn new(clock: Arc<dyn FrameClock>, settings: Arc<AnimationSettings>) -> Arc<Self> {
        Arc::new(Self {
            clock,
            settings,
            mapped: Property::new(true),
            mapped_changed: Signal::new(),
            unmapped: Signal::new(),
        })
    }

    /// The frame clock of this surface.
    pub fn clock(&self) -> &Arc<dyn FrameClock> {
        &self.clock
    }

    /// The current frame time in milliseconds.
    pub fn frame_time(&self) -> u64 {
        self.clock.frame_time()
    }

    /// The shared animation settings.
    pub fn settings(&self) -> &Arc<AnimationSettings> {
        &self.settings
    }

    /// Whether animations are globally enabled for this surface.
    pub fn enable_animations(&self) -> bool {
        self.settings.enable_animations()
    }

    /// Whether the surface is currently mapped.
    pub fn is_mapped(&self) -> bool {
        self.mapped.get()
    }

    /// Mark the surface as mapped.
    pub fn map(&self) {
        if self.mapped.set(true) {
            tracing::debug!(target: targets::SURFACE, "surface mapped");
            self.mapped_changed.emit(true);
        }
    }

    /// Mark the surface as unmapped, notifying everything attached to it.
    pub fn unmap(&self) {
        if self.mapped.set(false) {
            tracing::debug!(target: targets::SURFACE, "surface unmapped");
            self.mapped_changed.emit(false);
            self.unmapped.emit(());
        }
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("mapped", &self.is_mapped())
            .field("frame_time", &self.frame_time())
            .finish()
    }
}

static_assertions::assert_impl_all!(Surface: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_clock::ManualFrameClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_unmap_notifies_once() {
        let surface = Surface::new(ManualFrameClock::new(), AnimationSettings::new());
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        surface.unmapped.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(surface.is_mapped());
        surface.unmap();
        surface.unmap();
        assert!(!surface.is_mapped());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        surface.map();
        assert!(surface.is_mapped());
    }

    #[test]
    fn test_reads_clock_and_settings() {
        let clock = ManualFrameClock::starting_at(40);
        let settings = AnimationSettings::new();
        let surface = Surface::new(clock.clone(), settings.clone());

        assert_eq!(surface.frame_time(), 40);
        clock.advance(8);
        assert_eq!(surface.frame_time(), 48);

        settings.set_enable_animations(false);
        assert!(!surface.enable_animations());
    }
}
