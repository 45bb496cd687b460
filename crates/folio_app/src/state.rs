// SPDX-License-Identifier: MIT OR Apache-2.0
//! Site state.
//!
//! Owns the carousels, the contact form, the stats and the toast, plus the
//! scheduler clock they all read. Pages render from it and call back into it.

use crate::config::{ConfigError, SiteConfig};
use crate::contact::{ContactForm, DraftStore};
use crate::mailer::{MailDispatcher, Mailer};
use crate::stats::StatCard;
use crate::theme::SiteTheme;
use crate::toast::{Toast, ToastKind, ToastSlot};
use folio_carousel::{InlineEmbedding, ProfileDialog, Scheduler};
use std::sync::Arc;
use std::time::Duration;

/// Message shown after a successful submission
pub const SENT_MESSAGE: &str = "Message sent! I'll get back to you soon.";

/// Message shown after a failed submission
pub const FAILED_MESSAGE: &str = "Failed to send message. Please try again later.";

/// Which page is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// Portfolio page
    #[default]
    Home,
    /// Privacy policy
    Privacy,
}

/// Everything the pages render
pub struct SiteState {
    /// Site configuration
    pub config: SiteConfig,
    /// Palette
    pub theme: SiteTheme,
    /// Current page
    pub route: Route,
    /// Header avatar carousel
    pub inline: InlineEmbedding,
    /// Profile picture dialog
    pub dialog: ProfileDialog,
    /// Contact form
    pub form: ContactForm,
    /// Stats cards
    pub stats: Vec<StatCard>,
    /// Notification slot
    pub toast: ToastSlot,
    mail: MailDispatcher,
    scheduler: Scheduler,
}

impl SiteState {
    /// Build the site from `config`, starting the header carousel on `scheduler`
    pub fn new(
        config: SiteConfig,
        scheduler: Scheduler,
        mailer: Arc<dyn Mailer>,
        draft_store: Option<DraftStore>,
        ctx: egui::Context,
    ) -> Result<Self, ConfigError> {
        let images = config.carousel.image_list()?;
        let catalog = config.carousel.catalog()?;

        let inline = InlineEmbedding::mount(
            images.clone(),
            catalog.clone(),
            config.carousel.inline(),
            &scheduler,
        );
        let dialog = ProfileDialog::new(images, catalog, config.carousel.modal());
        let stats = config.stats.iter().map(StatCard::new).collect();

        Ok(Self {
            theme: SiteTheme::default(),
            route: Route::Home,
            inline,
            dialog,
            form: ContactForm::new(draft_store),
            stats,
            toast: ToastSlot::default(),
            mail: MailDispatcher::new(mailer, ctx),
            scheduler,
            config,
        })
    }

    /// Current site time
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Scheduler driving the carousels
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The header carousel was clicked
    pub fn activate_inline(&mut self) {
        let signal = self.inline.click();
        self.dialog.handle(signal, &self.scheduler);
    }

    /// Close the profile dialog
    pub fn close_dialog(&mut self) {
        self.dialog.close(&self.scheduler);
    }

    /// Switch pages
    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            tracing::debug!("Navigating to {:?}", route);
            self.route = route;
        }
    }

    /// Validate the form and hand it to the mailer
    pub fn submit_contact(&mut self) {
        if let Some(message) = self.form.submit() {
            tracing::info!("Sending contact message");
            self.mail.dispatch(message);
        }
    }

    /// Per-frame housekeeping: collect mail outcomes and drop finished exits
    pub fn update(&mut self) {
        let now = self.now();

        for outcome in self.mail.poll() {
            let delivered = outcome.is_ok();
            self.form.finish(delivered);
            let toast = if delivered {
                Toast::new(ToastKind::Success, SENT_MESSAGE, now)
            } else {
                Toast::new(ToastKind::Error, FAILED_MESSAGE, now)
            };
            self.toast.show(toast);
        }

        self.inline.view_mut().prune(now);
        if let Some(carousel) = self.dialog.carousel_mut() {
            carousel.prune(now);
        }
    }

    /// Whether something is animating and needs another frame soon
    pub fn is_animating(&self) -> bool {
        let now = self.now();
        self.inline.view().is_animating(now)
            || self.dialog.carousel().is_some_and(|carousel| carousel.is_animating(now))
            || self
                .stats
                .iter()
                .any(|card| card.count.is_started() && !card.count.is_finished(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactDraft;
    use crate::mailer::{MailError, MailOutcome};
    use futures::future::BoxFuture;
    use std::time::Instant;

    struct StubMailer {
        deliver: bool,
    }

    impl Mailer for StubMailer {
        fn send<'a>(
            &'a self,
            _message: &'a crate::contact::ContactMessage,
        ) -> BoxFuture<'a, MailOutcome> {
            let deliver = self.deliver;
            Box::pin(async move {
                if deliver {
                    Ok(())
                } else {
                    Err(MailError::NotConfigured)
                }
            })
        }
    }

    fn site(deliver: bool) -> SiteState {
        SiteState::new(
            SiteConfig::default(),
            Scheduler::new(),
            Arc::new(StubMailer { deliver }),
            None,
            egui::Context::default(),
        )
        .unwrap()
    }

    fn fill(site: &mut SiteState) {
        *site.form.draft_mut() = ContactDraft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hi".to_string(),
            message: "Hello there".to_string(),
        };
        site.form.commit_edit();
    }

    fn settle(site: &mut SiteState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while site.toast.visible(site.now()).is_none() && Instant::now() < deadline {
            site.update();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_click_opens_dialog_and_close_releases_timer() {
        let mut site = site(true);
        assert_eq!(site.scheduler().active_timers(), 1);

        site.activate_inline();
        assert!(site.dialog.is_open());
        assert_eq!(site.scheduler().active_timers(), 2);

        site.close_dialog();
        assert!(!site.dialog.is_open());
        assert_eq!(site.scheduler().active_timers(), 1);
    }

    #[test]
    fn test_privacy_page_keeps_header_carousel_running() {
        let mut site = site(true);
        site.scheduler().advance(Duration::from_millis(3000));
        assert_eq!(site.inline.view().current_index(), 1);

        site.navigate(Route::Privacy);
        site.scheduler().advance(Duration::from_millis(3000));
        site.navigate(Route::Home);

        assert_eq!(site.route, Route::Home);
        assert_eq!(site.inline.view().current_index(), 2);
    }

    #[test]
    fn test_successful_submission_shows_success_toast() {
        let mut site = site(true);
        fill(&mut site);
        site.submit_contact();
        settle(&mut site);

        let toast = site.toast.visible(site.now()).unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert!(site.form.draft().is_empty());
    }

    #[test]
    fn test_failed_submission_shows_one_error_toast() {
        let mut site = site(false);
        fill(&mut site);
        site.submit_contact();
        settle(&mut site);

        let toast = site.toast.visible(site.now()).unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, FAILED_MESSAGE);
        assert!(!site.form.draft().is_empty());

        site.toast.close();
        std::thread::sleep(Duration::from_millis(50));
        site.update();
        assert!(site.toast.visible(site.now()).is_none());
    }

    #[test]
    fn test_invalid_form_is_not_sent() {
        let mut site = site(true);
        site.submit_contact();
        site.update();
        assert!(site.form.error().is_some());
        assert!(site.toast.visible(site.now()).is_none());
    }
}
