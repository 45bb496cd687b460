// SPDX-License-Identifier: MIT OR Apache-2.0
//! Site palette and egui style.

use egui::{Color32, Rounding, Stroke, Style, Visuals};

/// Colors used across the pages
#[derive(Debug, Clone)]
pub struct SiteTheme {
    /// Page background
    pub background: Color32,
    /// Card fill
    pub card: Color32,
    /// Card outline
    pub card_border: Color32,
    /// Body text
    pub text: Color32,
    /// Secondary text
    pub text_muted: Color32,
    /// Links and highlights
    pub accent: Color32,
    /// Name heading
    pub heading: Color32,
    /// Section titles
    pub section_title: Color32,
    /// Portfolio card fill
    pub portfolio: Color32,
    /// Social card fill
    pub social: Color32,
    /// Technology chip fill
    pub chip: Color32,
    /// Stats number color
    pub stat: Color32,
    /// Primary button fill
    pub button: Color32,
    /// Success toast fill
    pub success: Color32,
    /// Error toast fill
    pub error: Color32,
    /// Carousel ring
    pub carousel_border: Color32,
    /// Rounding of cards
    pub card_rounding: f32,
}

impl Default for SiteTheme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(236, 253, 245),
            card: Color32::from_rgba_unmultiplied(255, 255, 255, 230),
            card_border: Color32::from_rgb(209, 250, 229),
            text: Color32::from_rgb(17, 24, 39),
            text_muted: Color32::from_rgb(107, 114, 128),
            accent: Color32::from_rgb(5, 150, 105),
            heading: Color32::from_rgb(252, 53, 76),
            section_title: Color32::from_rgb(139, 92, 246),
            portfolio: Color32::from_rgb(13, 148, 136),
            social: Color32::from_rgb(238, 156, 167),
            chip: Color32::from_rgb(0, 201, 255),
            stat: Color32::from_rgb(244, 63, 94),
            button: Color32::from_rgb(139, 92, 246),
            success: Color32::from_rgb(16, 185, 129),
            error: Color32::from_rgb(239, 68, 68),
            carousel_border: Color32::from_rgb(38, 208, 206),
            card_rounding: 16.0,
        }
    }
}

impl SiteTheme {
    /// Convert to egui Visuals
    pub fn to_egui_visuals(&self) -> Visuals {
        let mut visuals = Visuals::light();

        visuals.panel_fill = self.background;
        visuals.window_fill = Color32::WHITE;
        visuals.window_stroke = Stroke::new(1.0, self.card_border);
        visuals.window_rounding = Rounding::same(24.0);

        visuals.widgets.inactive.rounding = Rounding::same(8.0);
        visuals.widgets.hovered.rounding = Rounding::same(8.0);
        visuals.widgets.active.rounding = Rounding::same(8.0);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);

        visuals.selection.bg_fill = self.card_border;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.accent;
        visuals.override_text_color = Some(self.text);

        visuals
    }

    /// Convert to egui Style
    pub fn to_egui_style(&self) -> Style {
        let mut style = Style {
            visuals: self.to_egui_visuals(),
            ..Style::default()
        };
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style
    }

    /// Apply this theme to an egui context
    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_style(self.to_egui_style());
    }

    /// Frame used for cards
    pub fn card_frame(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.card)
            .stroke(Stroke::new(1.0, self.card_border))
            .rounding(Rounding::same(self.card_rounding))
            .inner_margin(egui::Margin::same(16.0))
    }

    /// Frame used for a solid colored card
    pub fn filled_frame(&self, fill: Color32) -> egui::Frame {
        egui::Frame::none()
            .fill(fill)
            .rounding(Rounding::same(self.card_rounding))
            .inner_margin(egui::Margin::same(16.0))
    }

    /// Carousel ring and placeholder colors
    pub fn carousel_style(&self) -> folio_carousel::CarouselStyle {
        folio_carousel::CarouselStyle {
            border: Stroke::new(4.0, self.carousel_border),
            placeholder: self.card_border,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visuals_use_palette() {
        let theme = SiteTheme::default();
        let visuals = theme.to_egui_visuals();
        assert!(!visuals.dark_mode);
        assert_eq!(visuals.panel_fill, theme.background);
        assert_eq!(visuals.hyperlink_color, theme.accent);
    }
}
