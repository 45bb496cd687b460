// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contact form delivery.
//!
//! Messages are sent from a worker thread that owns its own tokio runtime.
//! The UI thread hands messages over a channel and drains outcomes once per
//! frame. Each message gets exactly one attempt.

use crate::config::EmailConfig;
use crate::contact::ContactMessage;
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Mail delivery errors
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Service identifiers are missing from the configuration
    #[error("Email service is not configured")]
    NotConfigured,

    /// The request could not be sent
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status
    #[error("Email service rejected the message ({status}): {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response text
        body: String,
    },

    /// The delivery worker is gone
    #[error("Mail worker stopped")]
    WorkerStopped,
}

/// Result of one delivery attempt
pub type MailOutcome = Result<(), MailError>;

/// Something that can deliver a contact message
pub trait Mailer: Send + Sync {
    /// Deliver `message` once
    fn send<'a>(&'a self, message: &'a ContactMessage) -> BoxFuture<'a, MailOutcome>;
}

#[derive(Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a ContactMessage,
}

/// Mailer posting to the EmailJS REST API
pub struct EmailJsMailer {
    client: reqwest::Client,
    config: EmailConfig,
}

impl EmailJsMailer {
    /// Create a mailer for the given service settings
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn request<'a>(&'a self, message: &'a ContactMessage) -> EmailJsRequest<'a> {
        EmailJsRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: message,
        }
    }
}

impl Mailer for EmailJsMailer {
    fn send<'a>(&'a self, message: &'a ContactMessage) -> BoxFuture<'a, MailOutcome> {
        Box::pin(async move {
            if !self.config.is_configured() {
                return Err(MailError::NotConfigured);
            }

            let response = self
                .client
                .post(&self.config.endpoint)
                .json(&self.request(message))
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(());
            }

            let body = response.text().await.unwrap_or_default();
            Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            })
        })
    }
}

/// Hands messages to a background worker and collects outcomes
pub struct MailDispatcher {
    request_tx: mpsc::UnboundedSender<ContactMessage>,
    result_rx: mpsc::UnboundedReceiver<MailOutcome>,
    pending: usize,
}

impl MailDispatcher {
    /// Spawn the worker thread for `mailer`; `ctx` is woken when an outcome is ready
    pub fn new(mailer: Arc<dyn Mailer>, ctx: egui::Context) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            mail_worker(mailer, ctx, request_rx, result_tx);
        });

        Self {
            request_tx,
            result_rx,
            pending: 0,
        }
    }

    /// Queue a message for delivery
    pub fn dispatch(&mut self, message: ContactMessage) {
        self.pending += 1;
        if self.request_tx.send(message).is_err() {
            tracing::error!("Mail worker is not running");
        }
    }

    /// Collect finished deliveries without blocking
    pub fn poll(&mut self) -> Vec<MailOutcome> {
        let mut outcomes = Vec::new();

        while self.pending > 0 {
            match self.result_rx.try_recv() {
                Ok(outcome) => {
                    self.pending -= 1;
                    outcomes.push(outcome);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Nothing will answer the remaining messages.
                    for _ in 0..self.pending {
                        outcomes.push(Err(MailError::WorkerStopped));
                    }
                    self.pending = 0;
                }
            }
        }

        outcomes
    }
}

/// Worker thread delivering queued messages one at a time
fn mail_worker(
    mailer: Arc<dyn Mailer>,
    ctx: egui::Context,
    mut request_rx: mpsc::UnboundedReceiver<ContactMessage>,
    result_tx: mpsc::UnboundedSender<MailOutcome>,
) {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create mail runtime: {}", e);
            return;
        }
    };

    rt.block_on(async {
        while let Some(message) = request_rx.recv().await {
            let outcome = mailer.send(&message).await;
            match &outcome {
                Ok(()) => tracing::info!("Contact message delivered"),
                Err(e) => tracing::warn!("Contact message delivery failed: {}", e),
            }
            if result_tx.send(outcome).is_err() {
                break;
            }
            ctx.request_repaint();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    struct FakeMailer {
        fail: bool,
        sent: Mutex<Vec<ContactMessage>>,
    }

    impl FakeMailer {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    impl Mailer for FakeMailer {
        fn send<'a>(&'a self, message: &'a ContactMessage) -> BoxFuture<'a, MailOutcome> {
            Box::pin(async move {
                self.sent.lock().push(message.clone());
                if self.fail {
                    Err(MailError::Rejected {
                        status: 400,
                        body: "The template ID is invalid".to_string(),
                    })
                } else {
                    Ok(())
                }
            })
        }
    }

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "Nice site".to_string(),
        }
    }

    fn wait_for(dispatcher: &mut MailDispatcher, count: usize) -> Vec<MailOutcome> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut outcomes = Vec::new();
        while outcomes.len() < count && Instant::now() < deadline {
            outcomes.extend(dispatcher.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        outcomes
    }

    #[test]
    fn test_dispatch_success() {
        let mailer = FakeMailer::new(false);
        let mut dispatcher = MailDispatcher::new(mailer.clone(), egui::Context::default());
        assert!(dispatcher.poll().is_empty());

        dispatcher.dispatch(message());
        assert_eq!(dispatcher.pending, 1);

        let outcomes = wait_for(&mut dispatcher, 1);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_ok());
        assert_eq!(dispatcher.pending, 0);
        assert_eq!(mailer.sent.lock().as_slice(), &[message()]);
    }

    #[test]
    fn test_dispatch_failure_is_reported_once() {
        let mailer = FakeMailer::new(true);
        let mut dispatcher = MailDispatcher::new(mailer.clone(), egui::Context::default());
        dispatcher.dispatch(message());

        let outcomes = wait_for(&mut dispatcher, 1);
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], Err(MailError::Rejected { status: 400, .. })));

        std::thread::sleep(Duration::from_millis(50));
        assert!(dispatcher.poll().is_empty());
        assert_eq!(mailer.sent.lock().len(), 1, "no retry");
    }

    #[test]
    fn test_outcome_wakes_the_ui() {
        let ctx = egui::Context::default();
        let wakeups = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&wakeups);
        ctx.set_request_repaint_callback(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let mut dispatcher = MailDispatcher::new(FakeMailer::new(false), ctx);
        dispatcher.dispatch(message());
        assert_eq!(wait_for(&mut dispatcher, 1).len(), 1);

        let deadline = Instant::now() + Duration::from_secs(5);
        while wakeups.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(wakeups.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn test_unconfigured_emailjs_fails_without_network() {
        let mailer = EmailJsMailer::new(EmailConfig::default());
        let outcome = futures::executor::block_on(mailer.send(&message()));
        assert!(matches!(outcome, Err(MailError::NotConfigured)));
    }

    #[test]
    fn test_emailjs_request_body() {
        let mailer = EmailJsMailer::new(EmailConfig {
            service_id: "service_x".to_string(),
            template_id: "template_y".to_string(),
            public_key: "key_z".to_string(),
            ..EmailConfig::default()
        });
        let message = message();
        let body = serde_json::to_value(mailer.request(&message)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "service_id": "service_x",
                "template_id": "template_y",
                "user_id": "key_z",
                "template_params": {
                    "name": "Ada",
                    "email": "ada@example.com",
                    "subject": "Hello",
                    "message": "Nice site",
                },
            })
        );
    }
}
