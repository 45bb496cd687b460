// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host embeddings: the always-visible inline avatar and the profile dialog.

use crate::images::ImageList;
use crate::scheduler::Scheduler;
use crate::transition::TransitionCatalog;
use crate::view::CarouselView;
use std::time::Duration;

/// Period and on-screen size of one embedding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingConfig {
    /// Time between image changes
    pub period: Duration,
    /// Diameter in points
    pub size: f32,
}

impl EmbeddingConfig {
    /// Header avatar defaults
    pub const INLINE: Self = Self {
        period: Duration::from_millis(3000),
        size: 160.0,
    };

    /// Profile dialog defaults
    pub const MODAL: Self = Self {
        period: Duration::from_millis(3000),
        size: 192.0,
    };
}

/// Signal emitted when the inline carousel is clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activate;

/// Always-mounted header carousel
#[derive(Debug)]
pub struct InlineEmbedding {
    view: CarouselView,
    config: EmbeddingConfig,
}

impl InlineEmbedding {
    /// Mount the inline carousel and start it on `scheduler`
    pub fn mount(
        images: ImageList,
        catalog: TransitionCatalog,
        config: EmbeddingConfig,
        scheduler: &Scheduler,
    ) -> Self {
        let mut view = CarouselView::new(images, catalog, config.period);
        view.activate(scheduler);
        tracing::debug!("Inline carousel mounted");
        Self { view, config }
    }

    /// The carousel
    pub fn view(&self) -> &CarouselView {
        &self.view
    }

    /// Mutable access to the carousel
    pub fn view_mut(&mut self) -> &mut CarouselView {
        &mut self.view
    }

    /// Embedding configuration
    pub fn config(&self) -> EmbeddingConfig {
        self.config
    }

    /// Handle a click. The carousel itself does not change.
    pub fn click(&self) -> Activate {
        Activate
    }
}

/// Dialog hosting the modal carousel
///
/// The carousel is mounted exactly while the dialog is open. Closing drops
/// it, releasing its timer; reopening mounts a fresh one at index 0.
#[derive(Debug)]
pub struct ProfileDialog {
    images: ImageList,
    catalog: TransitionCatalog,
    config: EmbeddingConfig,
    mounted: Option<CarouselView>,
}

impl ProfileDialog {
    /// Create a closed dialog
    pub fn new(images: ImageList, catalog: TransitionCatalog, config: EmbeddingConfig) -> Self {
        Self {
            images,
            catalog,
            config,
            mounted: None,
        }
    }

    /// Whether the dialog is open
    pub fn is_open(&self) -> bool {
        self.mounted.is_some()
    }

    /// Set the open flag, mounting or unmounting the carousel to match
    pub fn set_open(&mut self, open: bool, scheduler: &Scheduler) {
        match (open, self.mounted.is_some()) {
            (true, false) => {
                let mut view =
                    CarouselView::new(self.images.clone(), self.catalog.clone(), self.config.period);
                view.activate(scheduler);
                self.mounted = Some(view);
                tracing::debug!("Profile dialog opened");
            }
            (false, true) => {
                self.mounted = None;
                tracing::debug!("Profile dialog closed");
            }
            _ => {}
        }
    }

    /// Open in response to the inline carousel's signal
    pub fn handle(&mut self, _signal: Activate, scheduler: &Scheduler) {
        self.set_open(true, scheduler);
    }

    /// Close the dialog
    pub fn close(&mut self, scheduler: &Scheduler) {
        self.set_open(false, scheduler);
    }

    /// Mounted carousel, while open
    pub fn carousel(&self) -> Option<&CarouselView> {
        self.mounted.as_ref()
    }

    /// Mutable mounted carousel, while open
    pub fn carousel_mut(&mut self) -> Option<&mut CarouselView> {
        self.mounted.as_mut()
    }

    /// Embedding configuration
    pub fn config(&self) -> EmbeddingConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images() -> ImageList {
        ImageList::from_refs(["a", "b", "c", "d", "e"]).unwrap()
    }

    #[test]
    fn test_click_opens_dialog() {
        let scheduler = Scheduler::new();
        let inline = InlineEmbedding::mount(
            images(),
            TransitionCatalog::default(),
            EmbeddingConfig::INLINE,
            &scheduler,
        );
        let mut dialog = ProfileDialog::new(images(), TransitionCatalog::default(), EmbeddingConfig::MODAL);
        assert!(!dialog.is_open());
        assert_eq!(scheduler.active_timers(), 1);

        let index_before = inline.view().current_index();
        dialog.handle(inline.click(), &scheduler);
        assert!(dialog.is_open());
        assert_eq!(inline.view().current_index(), index_before);
        assert_eq!(scheduler.active_timers(), 2);
    }

    #[test]
    fn test_close_before_first_tick_then_reopen() {
        let scheduler = Scheduler::new();
        let mut dialog = ProfileDialog::new(images(), TransitionCatalog::default(), EmbeddingConfig::MODAL);

        dialog.set_open(true, &scheduler);
        assert_eq!(scheduler.active_timers(), 1);
        scheduler.advance(Duration::from_millis(1500));
        dialog.close(&scheduler);
        assert!(dialog.carousel().is_none());
        assert_eq!(scheduler.active_timers(), 0);

        scheduler.advance(Duration::from_millis(10_000));
        dialog.set_open(true, &scheduler);
        let carousel = dialog.carousel().unwrap();
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.ticks(), 0);
        assert_eq!(scheduler.active_timers(), 1);

        scheduler.advance(Duration::from_millis(2999));
        assert_eq!(dialog.carousel().unwrap().current_index(), 0);
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(dialog.carousel().unwrap().current_index(), 1);
    }

    #[test]
    fn test_reopening_while_open_is_a_noop() {
        let scheduler = Scheduler::new();
        let mut dialog = ProfileDialog::new(images(), TransitionCatalog::default(), EmbeddingConfig::MODAL);
        dialog.set_open(true, &scheduler);
        scheduler.advance(Duration::from_millis(3000));
        dialog.set_open(true, &scheduler);

        assert_eq!(scheduler.active_timers(), 1);
        assert_eq!(dialog.carousel().unwrap().current_index(), 1);
    }

    #[test]
    fn test_inline_keeps_running_while_dialog_cycles() {
        let scheduler = Scheduler::new();
        let inline = InlineEmbedding::mount(
            images(),
            TransitionCatalog::default(),
            EmbeddingConfig {
                period: Duration::from_millis(1000),
                size: 128.0,
            },
            &scheduler,
        );
        let mut dialog = ProfileDialog::new(
            ImageList::from_refs(["x", "y"]).unwrap(),
            TransitionCatalog::default(),
            EmbeddingConfig::MODAL,
        );

        for _ in 0..3 {
            dialog.set_open(true, &scheduler);
            scheduler.advance(Duration::from_millis(3500));
            dialog.close(&scheduler);
        }

        assert_eq!(inline.view().ticks(), 10);
        assert_eq!(inline.view().current_index(), 0);
        assert_eq!(scheduler.active_timers(), 1);
    }
}
