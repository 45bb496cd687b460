// SPDX-License-Identifier: MIT OR Apache-2.0
//! Folio - a single-page personal portfolio.
//!
//! The page shows a profile header with an auto-rotating image carousel,
//! social links, technologies, a contact form delivered through EmailJS,
//! animated stats and a privacy policy view.
//!
//! ## Architecture
//!
//! Rendering uses egui on winit + wgpu. The carousels live in the
//! `folio_carousel` crate and are driven by a scheduler that the frame loop
//! advances with real elapsed time. Network work (image fetching, mail
//! delivery) runs on worker threads and reports back over channels.

mod app;
mod config;
mod contact;
mod images;
mod mailer;
mod pages;
mod stats;
mod state;
mod theme;
mod toast;

use app::FolioApp;
use config::SiteConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "folio_app=debug,folio_carousel=info,wgpu=warn,naga=warn";

fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    let config_path = SiteConfig::resolve_path();
    let config = match SiteConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };

    if !config.email.is_configured() {
        tracing::warn!("Email service not configured, contact form submissions will fail");
    }

    if let Err(e) = FolioApp::run(config) {
        tracing::error!("Folio crashed: {e}");
        std::process::exit(1);
    }
}
