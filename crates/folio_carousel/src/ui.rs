// SPDX-License-Identifier: MIT OR Apache-2.0
//! Carousel rendering.
//!
//! Images are drawn as textured discs. Each layer's visual state moves,
//! scales, rotates, fades and radially clips its disc.

use crate::images::ImageRef;
use crate::transition::VisualState;
use crate::view::{CarouselView, LayerPhase};
use egui::epaint::Vertex;
use egui::{Color32, Mesh, Pos2, Rect, Response, Sense, Stroke, TextureId, Ui, Vec2, Widget};
use std::f32::consts::TAU;
use std::time::Duration;

/// Segments used to approximate a disc
const DISC_SEGMENTS: usize = 64;

/// Grow factor applied while a clickable carousel is hovered
const HOVER_GROW: f32 = 0.05;

/// Supplies textures for image references
pub trait TextureSource {
    /// Texture for `image`, or `None` while it is not loaded yet
    fn texture_for(&mut self, image: &ImageRef) -> Option<TextureId>;
}

/// Colors used when drawing a carousel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselStyle {
    /// Ring drawn around each disc
    pub border: Stroke,
    /// Fill used while an image is still loading
    pub placeholder: Color32,
}

impl Default for CarouselStyle {
    fn default() -> Self {
        Self {
            border: Stroke::new(4.0, Color32::from_rgb(38, 208, 206)),
            placeholder: Color32::from_rgb(209, 250, 229),
        }
    }
}

/// Widget drawing one carousel view at a point in time
pub struct CarouselWidget<'a, T: TextureSource> {
    view: &'a CarouselView,
    textures: &'a mut T,
    now: Duration,
    size: f32,
    clickable: bool,
    alt_text: Option<&'a str>,
    style: CarouselStyle,
}

impl<'a, T: TextureSource> CarouselWidget<'a, T> {
    /// Draw `view` at scheduler time `now`
    pub fn new(view: &'a CarouselView, textures: &'a mut T, now: Duration) -> Self {
        Self {
            view,
            textures,
            now,
            size: 160.0,
            clickable: false,
            alt_text: None,
            style: CarouselStyle::default(),
        }
    }

    /// Diameter in points
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Make the carousel clickable
    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    /// Text shown on hover and exposed to screen readers
    pub fn alt_text(mut self, text: &'a str) -> Self {
        self.alt_text = Some(text);
        self
    }

    /// Override the colors
    pub fn style(mut self, style: CarouselStyle) -> Self {
        self.style = style;
        self
    }
}

impl<'a, T: TextureSource> Widget for CarouselWidget<'a, T> {
    fn ui(self, ui: &mut Ui) -> Response {
        let sense = if self.clickable {
            Sense::click()
        } else {
            Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(self.size), sense);

        if let Some(alt) = self.alt_text {
            let enabled = ui.is_enabled();
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::ImageButton, enabled, alt)
            });
        }

        if ui.is_rect_visible(rect) {
            let rect = if self.clickable && response.hovered() {
                rect.expand(self.size * HOVER_GROW * 0.5)
            } else {
                rect
            };
            let painter = ui.painter();

            for layer in self.view.layers(self.now) {
                if !layer.visual.is_visible() {
                    continue;
                }
                let texture = self.textures.texture_for(&layer.image);
                paint_disc(painter, rect, texture, &layer.visual, &self.style);
                if layer.phase != LayerPhase::Steady {
                    ui.ctx().request_repaint();
                }
            }
        }

        match self.alt_text {
            Some(alt) => response.on_hover_text(alt),
            None => response,
        }
    }
}

/// Paint one image disc inside `rect` with `visual` applied
pub fn paint_disc(
    painter: &egui::Painter,
    rect: Rect,
    texture: Option<TextureId>,
    visual: &VisualState,
    style: &CarouselStyle,
) {
    let center = rect.center() + Vec2::new(visual.offset_x * rect.width(), visual.offset_y * rect.height());
    let radius = rect.width().min(rect.height()) * 0.5 * visual.scale.max(0.0);
    let visible = visual.reveal.clamp(0.0, 1.0);
    let visible_radius = radius * visible;
    if visible_radius <= 0.0 {
        return;
    }
    let opacity = visual.opacity.clamp(0.0, 1.0);

    match texture {
        Some(texture) => {
            let tint = Color32::WHITE.gamma_multiply(opacity);
            let rotation = visual.rotation.to_radians();
            let mut mesh = Mesh::with_texture(texture);
            mesh.vertices.push(Vertex {
                pos: center,
                uv: Pos2::new(0.5, 0.5),
                color: tint,
            });
            for segment in 0..=DISC_SEGMENTS {
                let angle = segment as f32 / DISC_SEGMENTS as f32 * TAU;
                let screen = Vec2::angled(angle);
                // The image turns with the disc, so sample it at the unrotated angle.
                let local = Vec2::angled(angle - rotation) * (0.5 * visible);
                mesh.vertices.push(Vertex {
                    pos: center + screen * visible_radius,
                    uv: Pos2::new(0.5 + local.x, 0.5 + local.y),
                    color: tint,
                });
            }
            for segment in 1..=DISC_SEGMENTS as u32 {
                mesh.add_triangle(0, segment, segment + 1);
            }
            painter.add(egui::Shape::mesh(mesh));
        }
        None => {
            painter.circle_filled(center, visible_radius, style.placeholder.gamma_multiply(opacity));
        }
    }

    let border = Stroke::new(style.border.width, style.border.color.gamma_multiply(opacity));
    painter.circle_stroke(center, visible_radius, border);
}
