// SPDX-License-Identifier: MIT OR Apache-2.0
//! Carousel view: binds the rotation timer to the transition catalog.
//!
//! The view owns its [`CarouselState`] and, while active, the
//! [`RotationTimer`] that mutates it. Rendering is a query: [`CarouselView::layers`]
//! maps the state at a point in time to at most two image layers, the current
//! image (entering or steady) and the previous one while its exit plays.

use crate::images::{ImageList, ImageRef};
use crate::rotation::{CarouselState, RotationTimer, SharedState};
use crate::scheduler::Scheduler;
use crate::transition::{TransitionCatalog, TransitionDefinition, TransitionStyle, VisualState};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Animation phase of a rendered layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerPhase {
    /// Current image still moving into place
    Entering,
    /// Current image at rest
    Steady,
    /// Previous image playing its exit
    Exiting,
}

/// One image to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Index into the image list
    pub index: usize,
    /// Image reference
    pub image: ImageRef,
    /// Phase of the layer
    pub phase: LayerPhase,
    /// Style of the transition driving the layer
    pub style: TransitionStyle,
    /// Visual state to draw with
    pub visual: VisualState,
}

/// One independently owned carousel instance
#[derive(Debug)]
pub struct CarouselView {
    images: ImageList,
    catalog: TransitionCatalog,
    period: Duration,
    state: SharedState,
    timer: Option<RotationTimer>,
    scheduler: Option<Scheduler>,
}

impl CarouselView {
    /// Create an inactive view at index 0
    pub fn new(images: ImageList, catalog: TransitionCatalog, period: Duration) -> Self {
        Self {
            images,
            catalog,
            period,
            state: Rc::new(RefCell::new(CarouselState::new())),
            timer: None,
            scheduler: None,
        }
    }

    /// Start rotating on `scheduler`.
    ///
    /// Any timer from an earlier activation is cancelled first, so one view
    /// never has two tick streams.
    pub fn activate(&mut self, scheduler: &Scheduler) {
        self.timer = None;
        self.timer = RotationTimer::start(
            scheduler,
            self.period,
            self.images.len(),
            Rc::clone(&self.state),
        );
        self.scheduler = Some(scheduler.clone());
    }

    /// Stop rotating; the state is kept
    pub fn deactivate(&mut self) {
        self.timer = None;
        self.scheduler = None;
    }

    /// Whether the view is attached to a scheduler
    pub fn is_active(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Whether a rotation timer is running
    pub fn is_rotating(&self) -> bool {
        self.timer.as_ref().is_some_and(RotationTimer::is_running)
    }

    /// Replace the image list.
    ///
    /// The timer is torn down and, if the view is active, restarted against
    /// the new length. A current index beyond the new list resets to 0.
    pub fn set_images(&mut self, images: ImageList) {
        if images == self.images {
            return;
        }
        tracing::debug!(
            "Carousel image list changed: {} -> {} images",
            self.images.len(),
            images.len()
        );

        self.timer = None;
        self.images = images;
        self.state.borrow_mut().clamp_to(self.images.len());

        if let Some(scheduler) = self.scheduler.clone() {
            self.activate(&scheduler);
        }
    }

    /// Images shown by this view
    pub fn images(&self) -> &ImageList {
        &self.images
    }

    /// Transition catalog
    pub fn catalog(&self) -> &TransitionCatalog {
        &self.catalog
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Index of the current image
    pub fn current_index(&self) -> usize {
        self.state.borrow().current_index()
    }

    /// Current image
    pub fn current_image(&self) -> &ImageRef {
        self.images.get(self.current_index())
    }

    /// Number of ticks applied since mount
    pub fn ticks(&self) -> u64 {
        self.state.borrow().ticks()
    }

    /// Transition applied when the view shows `index`
    pub fn transition_for(&self, index: usize) -> &TransitionDefinition {
        self.catalog.select(index)
    }

    /// Transition of the current image
    pub fn current_transition(&self) -> &TransitionDefinition {
        self.transition_for(self.current_index())
    }

    /// Layers to draw at `now`, back to front (exiting image first)
    pub fn layers(&self, now: Duration) -> Vec<Layer> {
        let state = self.state.borrow();
        let mut layers = Vec::with_capacity(2);

        if let Some(outgoing) = state.outgoing() {
            let transition = self.catalog.select(outgoing.index);
            let elapsed = now.saturating_sub(outgoing.since);
            if !transition.timing.is_settled(elapsed) {
                let from = transition.superseded_at(outgoing.entered_at, outgoing.since);
                layers.push(Layer {
                    index: outgoing.index,
                    image: self.images.get(outgoing.index).clone(),
                    phase: LayerPhase::Exiting,
                    style: transition.style,
                    visual: transition.exiting_from(from, elapsed),
                });
            }
        }

        let index = state.current_index();
        let transition = self.catalog.select(index);
        let (phase, visual) = match state.entered_at() {
            Some(entered_at) => {
                let elapsed = now.saturating_sub(entered_at);
                if transition.timing.is_settled(elapsed) {
                    (LayerPhase::Steady, transition.steady)
                } else {
                    (LayerPhase::Entering, transition.entering(elapsed))
                }
            }
            None => (LayerPhase::Steady, transition.steady),
        };
        layers.push(Layer {
            index,
            image: self.images.get(index).clone(),
            phase,
            style: transition.style,
            visual,
        });

        layers
    }

    /// Whether any layer is still moving at `now`
    pub fn is_animating(&self, now: Duration) -> bool {
        self.layers(now)
            .iter()
            .any(|layer| layer.phase != LayerPhase::Steady)
    }

    /// Drop the outgoing image once its exit has finished
    pub fn prune(&mut self, now: Duration) {
        let mut state = self.state.borrow_mut();
        if let Some(outgoing) = state.outgoing() {
            let transition = self.catalog.select(outgoing.index);
            if transition.timing.is_settled(now.saturating_sub(outgoing.since)) {
                state.clear_outgoing();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(3000);

    fn five_images() -> ImageList {
        ImageList::from_refs(["a", "b", "c", "d", "e"]).unwrap()
    }

    fn view(images: ImageList) -> CarouselView {
        CarouselView::new(images, TransitionCatalog::default(), PERIOD)
    }

    #[test]
    fn test_full_cycle_is_deterministic() {
        let scheduler = Scheduler::new();
        let mut carousel = view(five_images());
        carousel.activate(&scheduler);
        let catalog = carousel.catalog().clone();

        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.current_transition(), catalog.select(0));

        scheduler.advance_to(Duration::from_millis(3000));
        assert_eq!(carousel.current_index(), 1);
        assert_eq!(carousel.current_image(), &ImageRef::parse("b"));
        assert_eq!(carousel.current_transition(), catalog.select(1));

        scheduler.advance_to(Duration::from_millis(15_000));
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.current_transition(), catalog.select(0));
        assert_eq!(carousel.ticks(), 5);
    }

    #[test]
    fn test_transition_is_a_function_of_index_only() {
        let scheduler = Scheduler::new();
        let mut carousel = view(ImageList::from_refs(["a", "b", "c"]).unwrap());
        carousel.activate(&scheduler);
        let catalog = TransitionCatalog::default();

        for _ in 0..17 {
            scheduler.advance(PERIOD);
            let index = carousel.current_index();
            assert_eq!(carousel.current_transition(), catalog.select(index));
            assert_eq!(carousel.transition_for(index), carousel.transition_for(index + 5));
        }
    }

    #[test]
    fn test_single_image_stays_put() {
        let scheduler = Scheduler::new();
        let mut carousel = view(ImageList::from_refs(["only"]).unwrap());
        carousel.activate(&scheduler);

        assert!(carousel.is_active());
        assert!(!carousel.is_rotating());
        assert_eq!(scheduler.active_timers(), 0);
        scheduler.advance(PERIOD * 10);
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.ticks(), 0);
    }

    #[test]
    fn test_deactivate_before_tick_freezes_state() {
        let scheduler = Scheduler::new();
        let mut carousel = view(five_images());
        carousel.activate(&scheduler);
        let shared_state = Rc::clone(&carousel.state);

        scheduler.advance(Duration::from_millis(2000));
        carousel.deactivate();
        let frozen = shared_state.borrow().clone();

        scheduler.advance(PERIOD * 4);
        assert_eq!(*shared_state.borrow(), frozen);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_drop_releases_timer() {
        let scheduler = Scheduler::new();
        let mut carousel = view(five_images());
        carousel.activate(&scheduler);
        let shared_state = Rc::clone(&carousel.state);
        assert_eq!(scheduler.active_timers(), 1);

        drop(carousel);
        assert_eq!(scheduler.active_timers(), 0);
        scheduler.advance(PERIOD * 3);
        assert_eq!(shared_state.borrow().ticks(), 0);
    }

    #[test]
    fn test_reactivation_keeps_one_timer() {
        let scheduler = Scheduler::new();
        let mut carousel = view(five_images());
        carousel.activate(&scheduler);
        carousel.activate(&scheduler);
        carousel.activate(&scheduler);

        assert_eq!(scheduler.active_timers(), 1);
        scheduler.advance(PERIOD);
        assert_eq!(carousel.ticks(), 1);
    }

    #[test]
    fn test_instances_are_isolated() {
        let scheduler = Scheduler::new();
        let mut inline = CarouselView::new(
            ImageList::from_refs(["a", "b", "c"]).unwrap(),
            TransitionCatalog::default(),
            Duration::from_millis(3000),
        );
        let mut modal = CarouselView::new(
            ImageList::from_refs(["v", "w", "x", "y"]).unwrap(),
            TransitionCatalog::default(),
            Duration::from_millis(2000),
        );
        inline.activate(&scheduler);
        modal.activate(&scheduler);

        scheduler.advance_to(Duration::from_millis(12_000));
        assert_eq!(inline.current_index(), 4 % 3);
        assert_eq!(modal.current_index(), 6 % 4);
        assert_eq!(inline.ticks(), 4);
        assert_eq!(modal.ticks(), 6);

        drop(modal);
        scheduler.advance_to(Duration::from_millis(18_000));
        assert_eq!(inline.current_index(), 6 % 3);
        assert_eq!(inline.ticks(), 6);
    }

    #[test]
    fn test_list_change_restarts_timer_and_resets_stale_index() {
        let scheduler = Scheduler::new();
        let mut carousel = view(five_images());
        carousel.activate(&scheduler);
        scheduler.advance(PERIOD * 3);
        assert_eq!(carousel.current_index(), 3);

        carousel.set_images(ImageList::from_refs(["a", "b"]).unwrap());
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(scheduler.active_timers(), 1);

        scheduler.advance(PERIOD);
        assert_eq!(carousel.current_index(), 1);
        scheduler.advance(PERIOD);
        assert_eq!(carousel.current_index(), 0);

        carousel.set_images(ImageList::from_refs(["solo"]).unwrap());
        assert!(!carousel.is_rotating());
        assert_eq!(scheduler.active_timers(), 0);

        carousel.set_images(five_images());
        assert!(carousel.is_rotating());
        assert_eq!(scheduler.active_timers(), 1);
    }

    #[test]
    fn test_mount_image_has_no_entry_animation() {
        let carousel = view(five_images());
        let layers = carousel.layers(Duration::ZERO);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].phase, LayerPhase::Steady);
        assert_eq!(layers[0].visual, VisualState::STEADY);
    }

    #[test]
    fn test_entry_and_exit_overlap() {
        let scheduler = Scheduler::new();
        let mut carousel = view(five_images());
        carousel.activate(&scheduler);
        scheduler.advance_to(PERIOD);

        let layers = carousel.layers(PERIOD + Duration::from_millis(100));
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].phase, LayerPhase::Exiting);
        assert_eq!(layers[0].index, 0);
        assert_eq!(layers[0].style, TransitionStyle::Slide);
        assert_eq!(layers[1].phase, LayerPhase::Entering);
        assert_eq!(layers[1].index, 1);
        assert_eq!(layers[1].style, TransitionStyle::VerticalSlide);
        assert!(carousel.is_animating(PERIOD + Duration::from_millis(100)));

        let settled = PERIOD + Duration::from_secs(2);
        let layers = carousel.layers(settled);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].phase, LayerPhase::Steady);
        assert!(!carousel.is_animating(settled));

        carousel.prune(settled);
        assert!(carousel.state.borrow().outgoing().is_none());
    }

    #[test]
    fn test_exit_uses_outgoing_images_own_transition() {
        let scheduler = Scheduler::new();
        let mut carousel = view(five_images());
        carousel.activate(&scheduler);
        scheduler.advance_to(PERIOD * 4);

        let layers = carousel.layers(PERIOD * 4);
        assert_eq!(layers[0].index, 3);
        assert_eq!(layers[0].style, TransitionStyle::RotateScale);
        assert_eq!(layers[0].visual, VisualState::STEADY);
        assert_eq!(layers[1].style, TransitionStyle::RadialReveal);
        assert!(!layers[1].visual.is_visible());
    }

    #[test]
    fn test_tick_during_entry_exits_from_where_the_image_was() {
        let scheduler = Scheduler::new();
        let catalog = TransitionCatalog::from_styles(&[TransitionStyle::FadeScale]).unwrap();
        let fade = *catalog.select(0);
        let period = Duration::from_millis(200);
        let mut carousel = CarouselView::new(five_images(), catalog, period);
        carousel.activate(&scheduler);

        scheduler.advance_to(period);
        let before = carousel.layers(period * 2 - Duration::from_millis(1));
        let entering = before.last().unwrap();
        assert_eq!(entering.phase, LayerPhase::Entering);
        assert!(entering.visual.opacity < 1.0);

        scheduler.advance_to(period * 2);
        let after = carousel.layers(period * 2);
        let exiting = &after[0];
        assert_eq!(exiting.phase, LayerPhase::Exiting);
        assert_eq!(exiting.index, 1);
        let superseded = fade.entering(period);
        assert!((exiting.visual.opacity - superseded.opacity).abs() < 1e-4);
        assert!((exiting.visual.scale - superseded.scale).abs() < 1e-4);
        assert!((exiting.visual.opacity - entering.visual.opacity).abs() < 0.01);
        assert!(exiting.visual.opacity < 1.0);

        let later = carousel.layers(period * 2 + Duration::from_millis(100));
        assert!(later[0].visual.opacity < exiting.visual.opacity);
    }
}
