// SPDX-License-Identifier: MIT OR Apache-2.0
//! Page rendering.

mod home;
mod privacy;
mod profile_dialog;

use crate::images::ImageLoader;
use crate::state::{Route, SiteState};
use crate::toast::ToastKind;
use egui::{Align2, Color32, Id, Order, RichText};

/// Render one frame of the site
pub fn show(ctx: &egui::Context, site: &mut SiteState, images: &mut ImageLoader) {
    site.update();

    egui::CentralPanel::default().show(ctx, |ui| match site.route {
        Route::Home => home::show(ui, site, images),
        Route::Privacy => privacy::show(ui, site),
    });

    if site.dialog.is_open() {
        profile_dialog::show(ctx, site, images);
    }

    show_toast(ctx, site);

    if site.is_animating() {
        ctx.request_repaint();
    }
}

fn show_toast(ctx: &egui::Context, site: &mut SiteState) {
    let now = site.now();
    let (success, error) = (site.theme.success, site.theme.error);
    let Some(toast) = site.toast.visible(now) else {
        return;
    };

    let fill = match toast.kind {
        ToastKind::Success => success,
        ToastKind::Error => error,
    };
    let icon = match toast.kind {
        ToastKind::Success => "✔",
        ToastKind::Error => "⚠",
    };
    let text = format!("{icon}  {}", toast.message);
    ctx.request_repaint_after(toast.expires_at().saturating_sub(now));

    let mut close = false;
    egui::Area::new(Id::new("toast"))
        .order(Order::Foreground)
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(fill)
                .rounding(8.0)
                .inner_margin(egui::Margin::symmetric(16.0, 12.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(text).color(Color32::WHITE));
                        close = ui
                            .small_button(RichText::new("✕").color(Color32::WHITE))
                            .clicked();
                    });
                });
        });

    if close {
        site.toast.close();
    }
}
