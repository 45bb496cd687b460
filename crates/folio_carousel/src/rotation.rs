// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rotation timer and the index state it drives.

use crate::scheduler::{Scheduler, TimerHandle};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Image that stopped being current and is playing its exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outgoing {
    /// Index the image had while it was current
    pub index: usize,
    /// When its exit started
    pub since: Duration,
    /// When it had started entering; `None` for the mount-time image
    pub entered_at: Option<Duration>,
}

/// Mutable state of one carousel instance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarouselState {
    current_index: usize,
    /// `None` while the mount-time image is shown without an entry animation
    entered_at: Option<Duration>,
    outgoing: Option<Outgoing>,
    ticks: u64,
}

impl CarouselState {
    /// State at mount: index 0, nothing animating
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the current image
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// When the current image started entering
    pub fn entered_at(&self) -> Option<Duration> {
        self.entered_at
    }

    /// Previous image, while its exit may still be playing
    pub fn outgoing(&self) -> Option<Outgoing> {
        self.outgoing
    }

    /// Number of ticks applied so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Apply one tick: move to the next index, modulo `len`.
    ///
    /// The image being replaced becomes the outgoing image; an older outgoing
    /// image is superseded.
    pub fn advance(&mut self, len: usize, now: Duration) {
        let len = len.max(1);
        self.outgoing = Some(Outgoing {
            index: self.current_index,
            since: now,
            entered_at: self.entered_at,
        });
        self.current_index = (self.current_index + 1) % len;
        self.entered_at = Some(now);
        self.ticks += 1;
    }

    /// Bring the state back in range after the image list shrank
    pub fn clamp_to(&mut self, len: usize) {
        if self.current_index >= len {
            self.current_index = 0;
            self.entered_at = None;
            self.outgoing = None;
        } else if self.outgoing.is_some_and(|outgoing| outgoing.index >= len) {
            self.outgoing = None;
        }
    }

    /// Forget the outgoing image
    pub fn clear_outgoing(&mut self) {
        self.outgoing = None;
    }
}

/// Shared handle to a carousel's state; only its own view and tick callback hold it
pub type SharedState = Rc<RefCell<CarouselState>>;

/// Repeating timer advancing a carousel index
#[derive(Debug)]
pub struct RotationTimer {
    handle: TimerHandle,
}

impl RotationTimer {
    /// Start rotating `state` through `len` images every `period`.
    ///
    /// Returns `None` for `len <= 1`; a single image never rotates.
    pub fn start(
        scheduler: &Scheduler,
        period: Duration,
        len: usize,
        state: SharedState,
    ) -> Option<Self> {
        if len <= 1 {
            tracing::debug!("Single image, rotation timer not started");
            return None;
        }

        let handle = scheduler.every(period, move |now| {
            state.borrow_mut().advance(len, now);
        });
        tracing::debug!(
            "Rotation timer {:?} started: {} images every {:?}",
            handle.id(),
            len,
            period
        );

        Some(Self { handle })
    }

    /// Whether the underlying timer is still registered
    pub fn is_running(&self) -> bool {
        self.handle.is_active()
    }
}

impl Drop for RotationTimer {
    fn drop(&mut self) {
        tracing::debug!("Rotation timer {:?} stopped", self.handle.id());
    }
}
