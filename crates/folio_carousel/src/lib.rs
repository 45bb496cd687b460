// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cyclic image carousel for Folio.
//!
//! A carousel shows one image from a fixed list at a time and advances to
//! the next one every period, wrapping at the end. Each step is animated
//! with a transition picked from a catalog by the incoming image's index.
//!
//! ## Architecture
//!
//! - [`Scheduler`]: cooperative timer queue driven by the host's clock
//! - [`RotationTimer`]: repeating timer owning one carousel's index
//! - [`TransitionCatalog`]: ordered entry/exit animations, selected by index
//! - [`CarouselView`]: a mounted carousel and its visible layers
//! - [`InlineEmbedding`] / [`ProfileDialog`]: the two host surfaces
//! - [`CarouselWidget`]: egui painter for a view

pub mod embed;
pub mod images;
pub mod rotation;
pub mod scheduler;
pub mod transition;
pub mod ui;
pub mod view;

pub use embed::{Activate, EmbeddingConfig, InlineEmbedding, ProfileDialog};
pub use images::{ImageList, ImageRef};
pub use rotation::{CarouselState, Outgoing, RotationTimer};
pub use scheduler::{Scheduler, TimerHandle, TimerId};
pub use transition::{
    Easing, SpringConfig, Timing, TransitionCatalog, TransitionDefinition, TransitionStyle,
    VisualState, FULL_REVEAL,
};
pub use ui::{CarouselStyle, CarouselWidget, TextureSource};
pub use view::{CarouselView, Layer, LayerPhase};

/// Errors raised while building carousel inputs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarouselError {
    /// No images were supplied
    #[error("carousel image list is empty")]
    EmptyImageList,
    /// No transitions were supplied
    #[error("transition catalog is empty")]
    EmptyCatalog,
}
