// SPDX-License-Identifier: MIT OR Apache-2.0
//! Portfolio page.

use crate::contact::FormStatus;
use crate::images::ImageLoader;
use crate::state::{Route, SiteState};
use egui::{Align, Color32, CursorIcon, Layout, RichText, Sense, Ui};
use folio_carousel::CarouselWidget;

/// Widest the page content grows
const CONTENT_WIDTH: f32 = 720.0;

pub(super) fn show(ui: &mut Ui, site: &mut SiteState, images: &mut ImageLoader) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(CONTENT_WIDTH);
                ui.add_space(32.0);

                header(ui, site, images);
                ui.add_space(32.0);
                portfolio_card(ui, site);
                ui.add_space(32.0);
                social_links(ui, site);
                ui.add_space(32.0);
                technologies(ui, site);
                ui.add_space(32.0);
                contact_form(ui, site);
                ui.add_space(32.0);
                stats(ui, site);
                ui.add_space(32.0);
                hire_me(ui, site);
                ui.add_space(32.0);
                footer(ui, site);
                ui.add_space(16.0);
            });
        });
}

fn section_title(ui: &mut Ui, site: &SiteState, title: &str) {
    ui.label(
        RichText::new(title)
            .size(20.0)
            .strong()
            .color(site.theme.section_title),
    );
    ui.add_space(12.0);
}

fn header(ui: &mut Ui, site: &mut SiteState, images: &mut ImageLoader) {
    let now = site.now();
    let profile = &site.config.profile;
    let alt = format!("View {}'s profile picture", profile.name);

    let response = ui.add(
        CarouselWidget::new(site.inline.view(), images, now)
            .size(site.inline.config().size)
            .clickable()
            .alt_text(&alt)
            .style(site.theme.carousel_style()),
    );
    let clicked = response.on_hover_cursor(CursorIcon::PointingHand).clicked();

    ui.add_space(16.0);
    ui.label(
        RichText::new(&profile.name)
            .size(28.0)
            .strong()
            .color(site.theme.heading),
    );
    ui.label(RichText::new(&profile.title).strong());
    ui.hyperlink_to(profile.company.as_str(), &profile.company_url);
    ui.add_space(8.0);
    ui.label(RichText::new(&profile.headline).size(18.0));

    if clicked {
        site.activate_inline();
    }
}

fn portfolio_card(ui: &mut Ui, site: &SiteState) {
    let response = site
        .theme
        .filled_frame(site.theme.portfolio)
        .show(ui, |ui| {
            ui.set_width(ui.available_width().min(420.0));
            ui.horizontal(|ui| {
                ui.label(RichText::new("💼").size(24.0));
                ui.vertical(|ui| {
                    ui.label(RichText::new("My Portfolio").size(18.0).strong().color(Color32::WHITE));
                    ui.label(RichText::new("Live Projects & Case Studies").color(Color32::WHITE));
                });
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(RichText::new("↗").size(20.0).color(Color32::WHITE));
                });
            });
        })
        .response
        .interact(Sense::click())
        .on_hover_cursor(CursorIcon::PointingHand);

    if response.clicked() {
        ui.ctx()
            .open_url(egui::OpenUrl::new_tab(&site.config.profile.portfolio_url));
    }
}

fn social_links(ui: &mut Ui, site: &SiteState) {
    section_title(ui, site, "Connect & Follow");

    let columns = if ui.available_width() > 600.0 { 3 } else { 2 };
    let card_width = ui.available_width() / columns as f32 - 16.0;

    egui::Grid::new("social_links")
        .num_columns(columns)
        .spacing([12.0, 12.0])
        .show(ui, |ui| {
            for (i, link) in site.config.social_links.iter().enumerate() {
                let response = site
                    .theme
                    .filled_frame(site.theme.social)
                    .show(ui, |ui| {
                        ui.set_width(card_width);
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(&link.name).strong());
                                ui.label(RichText::new(&link.label).small());
                            });
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label("›");
                            });
                        });
                    })
                    .response
                    .interact(Sense::click())
                    .on_hover_cursor(CursorIcon::PointingHand)
                    .on_hover_text(link.url.as_str());

                if response.clicked() {
                    tracing::debug!("Opening {}", link.url);
                    ui.ctx().open_url(egui::OpenUrl::new_tab(&link.url));
                }
                if (i + 1) % columns == 0 {
                    ui.end_row();
                }
            }
        });
}

fn technologies(ui: &mut Ui, site: &SiteState) {
    section_title(ui, site, "Technologies I Work With");

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(8.0, 8.0);
        for tech in &site.config.tech {
            egui::Frame::none()
                .fill(site.theme.chip)
                .rounding(16.0)
                .inner_margin(egui::Margin::symmetric(12.0, 6.0))
                .show(ui, |ui| {
                    ui.label(format!("{} {}", tech.icon, tech.name));
                });
        }
    });
}

fn contact_form(ui: &mut Ui, site: &mut SiteState) {
    section_title(ui, site, "Get In Touch");

    let frame = site.theme.card_frame();
    let mut submit = false;
    let mut show_privacy = false;

    frame.show(ui, |ui| {
        ui.set_width(ui.available_width().min(480.0));
        let sending = site.form.status() == FormStatus::Sending;
        let mut changed = false;

        ui.add_enabled_ui(!sending, |ui| {
            let draft = site.form.draft_mut();
            egui::Grid::new("contact_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Name");
                    changed |= ui.text_edit_singleline(&mut draft.name).changed();
                    ui.end_row();

                    ui.label("Email");
                    changed |= ui.text_edit_singleline(&mut draft.email).changed();
                    ui.end_row();

                    ui.label("Subject");
                    changed |= ui.text_edit_singleline(&mut draft.subject).changed();
                    ui.end_row();
                });

            ui.label("Message");
            changed |= ui
                .add(
                    egui::TextEdit::multiline(&mut draft.message)
                        .desired_rows(5)
                        .desired_width(f32::INFINITY),
                )
                .changed();
        });

        if changed {
            site.form.commit_edit();
        }

        if let Some(error) = site.form.error() {
            ui.colored_label(site.theme.error, error.to_string());
        }

        ui.add_space(8.0);
        let label = if sending { "Sending..." } else { "Send Message" };
        let button = egui::Button::new(RichText::new(label).color(Color32::WHITE))
            .fill(site.theme.button);
        submit = ui.add_enabled(!sending, button).clicked();

        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("By submitting, you agree to the").small());
            show_privacy = ui.link(RichText::new("Privacy Policy").small()).clicked();
        });
    });

    if submit {
        site.submit_contact();
    }
    if show_privacy {
        site.navigate(Route::Privacy);
    }
}

fn stats(ui: &mut Ui, site: &mut SiteState) {
    let now = site.now();
    let count = site.stats.len().max(1);
    let frame = site.theme.card_frame();
    let color = site.theme.stat;

    ui.columns(count, |columns| {
        for (card, ui) in site.stats.iter_mut().zip(columns.iter_mut()) {
            let response = frame
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new(card.display(now))
                                .size(28.0)
                                .strong()
                                .color(color),
                        );
                        ui.label(RichText::new(&card.label).small());
                    });
                })
                .response;

            if ui.is_rect_visible(response.rect) {
                card.count.trigger(now);
            }
        }
    });
}

fn hire_me(ui: &mut Ui, site: &SiteState) {
    site.theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width().min(420.0));
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("Ready to Start Your Project?")
                    .size(18.0)
                    .strong()
                    .color(site.theme.section_title),
            );
            ui.label(
                RichText::new("Let's discuss how I can help bring your ideas to life.")
                    .color(site.theme.text_muted),
            );
            ui.add_space(8.0);

            let button = egui::Button::new(RichText::new("✉ Hire Me").color(Color32::WHITE))
                .fill(site.theme.button);
            if ui.add(button).clicked() {
                let url = format!("mailto:{}", site.config.profile.hire_email);
                ui.ctx().open_url(egui::OpenUrl::same_tab(url));
            }
        });
    });
}

fn footer(ui: &mut Ui, site: &mut SiteState) {
    ui.separator();
    ui.label(
        RichText::new(format!("© {}. Built with Rust & egui.", site.config.profile.name))
            .small()
            .color(site.theme.text_muted),
    );
    if ui.link("Privacy Policy").clicked() {
        site.navigate(Route::Privacy);
    }
}
