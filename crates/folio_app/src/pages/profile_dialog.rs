// SPDX-License-Identifier: MIT OR Apache-2.0
//! Profile picture dialog.

use crate::images::ImageLoader;
use crate::state::SiteState;
use egui::{Align, Color32, Id, Layout, RichText};
use folio_carousel::CarouselWidget;

pub(super) fn show(ctx: &egui::Context, site: &mut SiteState, images: &mut ImageLoader) {
    let now = site.now();
    let name = site.config.profile.name.clone();
    let style = site.theme.carousel_style();
    let title_color = site.theme.section_title;
    let button_color = site.theme.button;
    let size = site.dialog.config().size;

    let mut close_clicked = false;
    let modal = egui::Modal::new(Id::new("profile_dialog")).show(ctx, |ui| {
        ui.set_width(size + 64.0);

        ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
            let close = egui::Button::new(RichText::new("✕").color(Color32::WHITE))
                .fill(button_color)
                .rounding(16.0);
            close_clicked = ui.add(close).on_hover_text("Close").clicked();
        });

        ui.vertical_centered(|ui| {
            if let Some(carousel) = site.dialog.carousel() {
                ui.add(
                    CarouselWidget::new(carousel, images, now)
                        .size(size)
                        .alt_text(&name)
                        .style(style),
                );
            }
            ui.add_space(12.0);
            ui.label(RichText::new(&name).size(20.0).strong().color(title_color));
        });
    });

    if close_clicked || modal.should_close() {
        site.close_dialog();
    }
}
