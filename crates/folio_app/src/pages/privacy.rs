// SPDX-License-Identifier: MIT OR Apache-2.0
//! Privacy policy page.

use crate::state::{Route, SiteState};
use egui::{RichText, Ui};

/// Policy sections as (heading, body)
const SECTIONS: &[(&str, &str)] = &[
    (
        "Information I Collect",
        "When you use the contact form I receive the name, email address, subject and \
         message you enter. Nothing else is collected.",
    ),
    (
        "How It Is Used",
        "Your message is delivered to my inbox through EmailJS and is only used to reply \
         to you. It is never sold or shared for marketing.",
    ),
    (
        "Drafts On Your Device",
        "While you type, the form is saved on this device so you do not lose your message. \
         The draft is deleted as soon as the message is sent.",
    ),
    (
        "Third-Party Links",
        "Social and portfolio links open external sites that have their own privacy \
         policies.",
    ),
    (
        "Contact",
        "Questions about this policy can be sent through the contact form or the email \
         link on the main page.",
    ),
];

pub(super) fn show(ui: &mut Ui, site: &mut SiteState) {
    let mut back = false;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(640.0);
                ui.add_space(24.0);

                ui.horizontal(|ui| {
                    back = ui.button("← Back").clicked();
                });
                ui.add_space(16.0);

                ui.label(
                    RichText::new("Privacy Policy")
                        .size(28.0)
                        .strong()
                        .color(site.theme.section_title),
                );
                ui.add_space(16.0);

                site.theme.card_frame().show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                        for (heading, body) in SECTIONS {
                            ui.label(RichText::new(*heading).size(18.0).strong());
                            ui.label(*body);
                            ui.add_space(12.0);
                        }
                    });
                });
            });
        });

    if back {
        site.navigate(Route::Home);
    }
}
