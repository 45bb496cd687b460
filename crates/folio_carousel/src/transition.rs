// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transition catalog for carousel image changes.
//!
//! Each transition describes where an image starts when it enters, where it
//! rests while it is current, and where it goes when it leaves, plus the
//! timing curve that moves it between those states. The catalog is selected
//! by `index % len`, so the sequence of transitions is a pure function of the
//! carousel index.

use crate::CarouselError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Reveal radius (in disc radii) at which a radial clip no longer hides anything.
///
/// Matches a `circle(75%)` clip over a square container.
pub const FULL_REVEAL: f32 = 1.5;

/// Residual displacement below which a spring counts as settled
const SPRING_SETTLE_EPSILON: f32 = 0.001;

/// Upper bound on how long a spring may take to settle
const MAX_SPRING_SECS: f32 = 2.0;

/// Visual state of one carousel image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Horizontal offset as a fraction of the container width
    pub offset_x: f32,
    /// Vertical offset as a fraction of the container height
    pub offset_y: f32,
    /// Opacity (0 to 1)
    pub opacity: f32,
    /// Uniform scale factor
    pub scale: f32,
    /// Clockwise rotation in degrees
    pub rotation: f32,
    /// Radial clip radius as a fraction of the disc radius
    pub reveal: f32,
}

impl VisualState {
    /// Fully visible, centered, unrotated
    pub const STEADY: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        opacity: 1.0,
        scale: 1.0,
        rotation: 0.0,
        reveal: FULL_REVEAL,
    };

    /// Set the offset
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Set the opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the reveal radius
    pub fn with_reveal(mut self, reveal: f32) -> Self {
        self.reveal = reveal;
        self
    }

    /// Interpolate every channel towards `other`.
    ///
    /// `t` is not clamped: spring progress may overshoot 1.0.
    pub fn lerp(&self, other: &VisualState, t: f32) -> VisualState {
        VisualState {
            offset_x: lerp(self.offset_x, other.offset_x, t),
            offset_y: lerp(self.offset_y, other.offset_y, t),
            opacity: lerp(self.opacity, other.opacity, t),
            scale: lerp(self.scale, other.scale, t),
            rotation: lerp(self.rotation, other.rotation, t),
            reveal: lerp(self.reveal, other.reveal, t),
        }
    }

    /// Whether anything of the image would be drawn
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.001 && self.scale > 0.0 && self.reveal > 0.0
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::STEADY
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;

    p0 * mt3 + 3.0 * p1 * mt2 * t + 3.0 * p2 * mt * t2 + p3 * t3
}

/// Easing curve for fixed-duration transitions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Quadratic ease in
    EaseIn,
    /// Quadratic ease out
    #[default]
    EaseOut,
    /// Quadratic ease in/out
    EaseInOut,
    /// CSS-style cubic bezier with control points `(x1, y1, x2, y2)`
    CubicBezier([f32; 4]),
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Easing::CubicBezier([x1, y1, x2, y2]) => {
                let s = solve_bezier_x(x1, x2, t);
                cubic_bezier(0.0, y1, y2, 1.0, s)
            }
        }
    }
}

/// Find the curve parameter whose x coordinate is `x` (bisection, x is monotonic).
fn solve_bezier_x(x1: f32, x2: f32, x: f32) -> f32 {
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    let mut mid = x;
    for _ in 0..32 {
        mid = (lo + hi) * 0.5;
        let value = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (value - x).abs() < 1e-5 {
            break;
        }
        if value < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    mid
}

/// Damped spring moving from 0 to 1 with zero initial velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Spring stiffness
    pub stiffness: f32,
    /// Damping coefficient
    pub damping: f32,
    /// Mass
    pub mass: f32,
}

impl SpringConfig {
    /// Snappy spring used by the slide transitions
    pub const CAROUSEL: Self = Self {
        stiffness: 300.0,
        damping: 30.0,
        mass: 1.0,
    };

    /// Create a spring with unit mass
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
        }
    }

    fn is_degenerate(&self) -> bool {
        self.stiffness <= 0.0 || self.mass <= 0.0
    }

    fn angular_frequency(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }

    fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Position at `t` seconds
    pub fn position(&self, t: f32) -> f32 {
        if self.is_degenerate() {
            return 1.0;
        }
        let t = t.max(0.0);
        let omega = self.angular_frequency();
        let zeta = self.damping_ratio();

        if (zeta - 1.0).abs() < 1e-4 {
            1.0 - (-omega * t).exp() * (1.0 + omega * t)
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * t).exp();
            1.0 - decay * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c1 = r2 / (r2 - r1);
            let c2 = -r1 / (r2 - r1);
            1.0 - (c1 * (r1 * t).exp() + c2 * (r2 * t).exp())
        }
    }

    /// Seconds until the residual displacement envelope drops below the settle threshold
    pub fn settle_time(&self) -> f32 {
        if self.is_degenerate() {
            return 0.0;
        }
        let omega = self.angular_frequency();
        let zeta = self.damping_ratio();
        let decay_rate = if zeta < 1.0 {
            zeta * omega
        } else {
            omega * (zeta - (zeta * zeta - 1.0).max(0.0).sqrt())
        };
        if decay_rate <= f32::EPSILON {
            return MAX_SPRING_SECS;
        }
        ((1.0 / SPRING_SETTLE_EPSILON).ln() / decay_rate).min(MAX_SPRING_SECS)
    }
}

/// Timing curve of a transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Timing {
    /// Physically based spring
    Spring(SpringConfig),
    /// Fixed duration with an easing curve
    Tween {
        /// Total duration
        duration: Duration,
        /// Easing curve
        easing: Easing,
    },
}

impl Timing {
    /// Fixed-duration tween with the default easing
    pub fn tween(seconds: f32) -> Self {
        Timing::Tween {
            duration: Duration::from_secs_f32(seconds.max(0.0)),
            easing: Easing::default(),
        }
    }

    /// Progress after `elapsed`; 0 at the start, 1 once settled
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.is_settled(elapsed) {
            return 1.0;
        }
        match self {
            Timing::Spring(spring) => spring.position(elapsed.as_secs_f32()),
            Timing::Tween { duration, easing } => {
                easing.apply(elapsed.as_secs_f32() / duration.as_secs_f32())
            }
        }
    }

    /// Time after which the transition is finished
    pub fn settle_time(&self) -> Duration {
        match self {
            Timing::Spring(spring) => Duration::from_secs_f32(spring.settle_time()),
            Timing::Tween { duration, .. } => *duration,
        }
    }

    /// Whether the transition has finished after `elapsed`
    pub fn is_settled(&self, elapsed: Duration) -> bool {
        elapsed >= self.settle_time()
    }
}

/// Visual style of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionStyle {
    /// Enter from the right, leave to the left
    Slide,
    /// Enter from below, leave upwards
    VerticalSlide,
    /// Cross-fade with a slight zoom
    FadeScale,
    /// Spin in from -90° and out to 90° while scaling
    RotateScale,
    /// Circular reveal from the center
    RadialReveal,
}

impl TransitionStyle {
    /// All styles in default catalog order
    pub fn all() -> &'static [TransitionStyle] {
        &[
            TransitionStyle::Slide,
            TransitionStyle::VerticalSlide,
            TransitionStyle::FadeScale,
            TransitionStyle::RotateScale,
            TransitionStyle::RadialReveal,
        ]
    }

    /// Build the definition for this style
    pub fn definition(self) -> TransitionDefinition {
        let steady = VisualState::STEADY;
        let (entry, exit, timing) = match self {
            Self::Slide => (
                steady.with_offset(1.0, 0.0).with_opacity(0.0),
                steady.with_offset(-1.0, 0.0).with_opacity(0.0),
                Timing::Spring(SpringConfig::CAROUSEL),
            ),
            Self::VerticalSlide => (
                steady.with_offset(0.0, 1.0).with_opacity(0.0),
                steady.with_offset(0.0, -1.0).with_opacity(0.0),
                Timing::Spring(SpringConfig::CAROUSEL),
            ),
            Self::FadeScale => (
                steady.with_opacity(0.0).with_scale(0.9),
                steady.with_opacity(0.0).with_scale(0.9),
                Timing::tween(0.7),
            ),
            Self::RotateScale => (
                steady.with_opacity(0.0).with_scale(0.5).with_rotation(-90.0),
                steady.with_opacity(0.0).with_scale(0.5).with_rotation(90.0),
                Timing::tween(0.7),
            ),
            Self::RadialReveal => (
                steady.with_reveal(0.0),
                steady.with_reveal(0.0),
                Timing::tween(0.8),
            ),
        };
        TransitionDefinition {
            style: self,
            entry,
            steady,
            exit,
            timing,
        }
    }
}

/// Entry, steady and exit states of an image plus the timing between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    /// Style this definition was built from
    pub style: TransitionStyle,
    /// State an incoming image starts from
    pub entry: VisualState,
    /// State of the current image at rest
    pub steady: VisualState,
    /// State an outgoing image ends at
    pub exit: VisualState,
    /// Timing curve for both entry and exit
    pub timing: Timing,
}

impl TransitionDefinition {
    /// State of an entering image `elapsed` after it became current
    pub fn entering(&self, elapsed: Duration) -> VisualState {
        self.entry.lerp(&self.steady, self.timing.progress(elapsed))
    }

    /// State of an exiting image `elapsed` after it stopped being current
    pub fn exiting(&self, elapsed: Duration) -> VisualState {
        self.exiting_from(self.steady, elapsed)
    }

    /// Like [`Self::exiting`], for an image superseded at `from` before it settled
    pub fn exiting_from(&self, from: VisualState, elapsed: Duration) -> VisualState {
        from.lerp(&self.exit, self.timing.progress(elapsed))
    }

    /// State at the moment an image stops being current
    pub fn superseded_at(&self, entered_at: Option<Duration>, since: Duration) -> VisualState {
        match entered_at {
            Some(entered_at) => self.entering(since.saturating_sub(entered_at)),
            None => self.steady,
        }
    }
}

/// Ordered, read-only list of transitions shared by every carousel instance
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionCatalog {
    entries: Arc<[TransitionDefinition]>,
}

impl TransitionCatalog {
    /// Build a catalog from definitions; fails on an empty list
    pub fn new(entries: Vec<TransitionDefinition>) -> Result<Self, CarouselError> {
        if entries.is_empty() {
            return Err(CarouselError::EmptyCatalog);
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    /// Build a catalog from styles in order
    pub fn from_styles(styles: &[TransitionStyle]) -> Result<Self, CarouselError> {
        Self::new(styles.iter().map(|style| style.definition()).collect())
    }

    /// Number of transitions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Transition applied when the carousel shows `index`
    pub fn select(&self, index: usize) -> &TransitionDefinition {
        &self.entries[index % self.entries.len()]
    }

    /// Longest time any transition takes to finish
    pub fn longest_settle_time(&self) -> Duration {
        self.entries
            .iter()
            .map(|entry| entry.timing.settle_time())
            .max()
            .unwrap_or_default()
    }

    /// Iterate over the transitions in order
    pub fn iter(&self) -> impl Iterator<Item = &TransitionDefinition> {
        self.entries.iter()
    }
}

impl Default for TransitionCatalog {
    fn default() -> Self {
        Self {
            entries: TransitionStyle::all()
                .iter()
                .map(|style| style.definition())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order() {
        let catalog = TransitionCatalog::default();
        let styles: Vec<_> = catalog.iter().map(|t| t.style).collect();
        assert_eq!(styles, TransitionStyle::all());
    }

    #[test]
    fn test_longest_settle_time_covers_every_entry() {
        let catalog = TransitionCatalog::default();
        let longest = catalog.longest_settle_time();
        assert!(catalog.iter().all(|t| t.timing.settle_time() <= longest));
        assert!(longest >= Duration::from_millis(700));
        assert!(longest < Duration::from_millis(3000));
    }

    #[test]
    fn test_select_wraps_by_index() {
        let catalog = TransitionCatalog::default();
        for index in 0..23 {
            assert_eq!(catalog.select(index), catalog.select(index % 5));
        }
        assert_eq!(catalog.select(7).style, TransitionStyle::FadeScale);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(TransitionCatalog::new(Vec::new()), Err(CarouselError::EmptyCatalog));
        assert_eq!(TransitionCatalog::from_styles(&[]), Err(CarouselError::EmptyCatalog));
    }

    #[test]
    fn test_tween_endpoints() {
        let timing = Timing::tween(0.7);
        assert_eq!(timing.progress(Duration::ZERO), 0.0);
        assert_eq!(timing.progress(Duration::from_millis(700)), 1.0);
        let mid = timing.progress(Duration::from_millis(350));
        assert!(mid > 0.5 && mid < 1.0, "ease-out should be ahead at the midpoint: {mid}");
    }

    #[test]
    fn test_spring_settles() {
        let spring = SpringConfig::CAROUSEL;
        assert!(spring.position(0.0).abs() < 1e-6);
        let settle = spring.settle_time();
        assert!(settle > 0.0 && settle <= MAX_SPRING_SECS);
        assert!((spring.position(settle) - 1.0).abs() < 0.01);
        assert_eq!(Timing::Spring(spring).progress(Duration::from_secs(3)), 1.0);
    }

    #[test]
    fn test_overdamped_and_critical_springs_do_not_overshoot() {
        for spring in [SpringConfig::new(100.0, 20.0), SpringConfig::new(100.0, 60.0)] {
            for step in 0..200 {
                let position = spring.position(step as f32 * 0.01);
                assert!(position <= 1.0 + 1e-4, "{spring:?} overshot: {position}");
            }
        }
    }

    #[test]
    fn test_cubic_bezier_easing_endpoints() {
        let ease = Easing::CubicBezier([0.25, 0.1, 0.25, 1.0]);
        assert!(ease.apply(0.0).abs() < 1e-3);
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_definition_phases() {
        let slide = TransitionStyle::Slide.definition();
        assert_eq!(slide.entering(Duration::ZERO), slide.entry);
        assert_eq!(slide.entering(Duration::from_secs(5)), VisualState::STEADY);
        assert_eq!(slide.exiting(Duration::from_secs(5)), slide.exit);

        let reveal = TransitionStyle::RadialReveal.definition();
        assert!(!reveal.entering(Duration::ZERO).is_visible());
        assert!(reveal.exiting(Duration::ZERO).is_visible());
    }

    #[test]
    fn test_styles_deserialize_from_ron() {
        let styles: Vec<TransitionStyle> = ron::from_str("[RadialReveal, Slide]").unwrap();
        let catalog = TransitionCatalog::from_styles(&styles).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.select(3).style, TransitionStyle::Slide);
    }
}
