// SPDX-License-Identifier: MIT OR Apache-2.0
//! Site configuration.
//!
//! Everything the pages show comes from one RON file:
//! - Profile header and call-to-action text
//! - Carousel images, transition order, periods and sizes
//! - Social links, technologies and stats
//! - Email service identifiers and draft storage location

use folio_carousel::{
    CarouselError, EmbeddingConfig, ImageList, ImageRef, TransitionCatalog, TransitionStyle,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "folio.ron";

/// Environment variable overriding the configuration path
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";

/// Default EmailJS REST endpoint
pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for this schema
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The file was written by a newer version
    #[error("Configuration version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// Carousel inputs are invalid
    #[error("Invalid carousel configuration: {0}")]
    Carousel(#[from] CarouselError),
}

/// Profile header and call-to-action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Display name, also used as the carousel's alt text
    pub name: String,
    /// Line shown under the name
    pub title: String,
    /// Company name
    pub company: String,
    /// Company link
    pub company_url: String,
    /// One-sentence pitch
    pub headline: String,
    /// Portfolio card link
    pub portfolio_url: String,
    /// Address used by the "Hire Me" button
    pub hire_email: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Muhammad Sameer".to_string(),
            title: "Freelancer • React • Node • TypeScript • WordPress • Flutter".to_string(),
            company: "ATEMZ AI".to_string(),
            company_url: "https://atmez.ai".to_string(),
            headline: "I build reliable web apps and delightful developer experiences.".to_string(),
            portfolio_url: "https://github.com/sameerx07".to_string(),
            hire_email: "hello@muhammadsameer.com".to_string(),
        }
    }
}

/// Carousel images and embedding parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Images shown by both carousels, in order
    pub images: Vec<ImageRef>,
    /// Transition catalog order
    pub transitions: Vec<TransitionStyle>,
    /// Header avatar period in milliseconds
    pub inline_period_ms: u64,
    /// Header avatar diameter in points
    pub inline_size: f32,
    /// Profile dialog period in milliseconds
    pub modal_period_ms: u64,
    /// Profile dialog diameter in points
    pub modal_size: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        let images = [4307869, 3777943, 3769021, 5220075, 415829]
            .iter()
            .map(|id| {
                ImageRef::Url(format!(
                    "https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg?auto=compress&cs=tinysrgb&w=400&h=400&fit=crop&crop=face"
                ))
            })
            .collect();

        Self {
            images,
            transitions: TransitionStyle::all().to_vec(),
            inline_period_ms: 3000,
            inline_size: EmbeddingConfig::INLINE.size,
            modal_period_ms: 3000,
            modal_size: EmbeddingConfig::MODAL.size,
        }
    }
}

impl CarouselConfig {
    /// Validated image list
    pub fn image_list(&self) -> Result<ImageList, ConfigError> {
        Ok(ImageList::new(self.images.clone())?)
    }

    /// Validated transition catalog
    pub fn catalog(&self) -> Result<TransitionCatalog, ConfigError> {
        Ok(TransitionCatalog::from_styles(&self.transitions)?)
    }

    /// Header avatar embedding parameters
    pub fn inline(&self) -> EmbeddingConfig {
        EmbeddingConfig {
            period: Duration::from_millis(self.inline_period_ms),
            size: self.inline_size,
        }
    }

    /// Profile dialog embedding parameters
    pub fn modal(&self) -> EmbeddingConfig {
        EmbeddingConfig {
            period: Duration::from_millis(self.modal_period_ms),
            size: self.modal_size,
        }
    }
}

/// One entry of the social links grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Network name
    pub name: String,
    /// Short description under the name
    pub label: String,
    /// Link target
    pub url: String,
}

impl SocialLink {
    fn new(name: &str, label: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

/// One technology chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechItem {
    /// Technology name
    pub name: String,
    /// Glyph shown before the name
    pub icon: String,
}

/// One stats card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatConfig {
    /// Value counted up to
    pub value: u32,
    /// Caption
    pub label: String,
    /// Text appended to the number
    #[serde(default)]
    pub suffix: String,
}

/// Email service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// EmailJS service id
    pub service_id: String,
    /// EmailJS template id
    pub template_id: String,
    /// EmailJS public key
    pub public_key: String,
    /// REST endpoint
    pub endpoint: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            endpoint: EMAILJS_ENDPOINT.to_string(),
        }
    }
}

impl EmailConfig {
    /// Whether all identifiers are filled in
    pub fn is_configured(&self) -> bool {
        !self.service_id.is_empty() && !self.template_id.is_empty() && !self.public_key.is_empty()
    }
}

/// Complete site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Format version
    pub format_version: u32,
    /// Profile header
    pub profile: ProfileConfig,
    /// Carousels
    pub carousel: CarouselConfig,
    /// Social links grid
    pub social_links: Vec<SocialLink>,
    /// Technology chips
    pub tech: Vec<TechItem>,
    /// Stats cards
    pub stats: Vec<StatConfig>,
    /// Contact form delivery
    pub email: EmailConfig,
    /// Draft store file; the user data directory when unset
    pub draft_path: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let tech = [
            ("React", "⚛"),
            ("Node.js", "🟢"),
            ("TypeScript", "🔷"),
            ("WordPress", "📝"),
            ("Flutter", "📱"),
            ("Next.js", "▲"),
            ("Tailwind", "🎨"),
            ("MongoDB", "🍃"),
        ]
        .iter()
        .map(|(name, icon)| TechItem {
            name: (*name).to_string(),
            icon: (*icon).to_string(),
        })
        .collect();

        let stats = [
            (20, "Projects Completed", "+"),
            (98, "Client Satisfaction", "%"),
            (2, "Years Experience", "yrs"),
            (24, "Response Time", "h"),
        ]
        .iter()
        .map(|(value, label, suffix)| StatConfig {
            value: *value,
            label: (*label).to_string(),
            suffix: (*suffix).to_string(),
        })
        .collect();

        Self {
            format_version: CONFIG_FORMAT_VERSION,
            profile: ProfileConfig::default(),
            carousel: CarouselConfig::default(),
            social_links: vec![
                SocialLink::new("GitHub", "Code & Projects", "https://github.com/sameerx07"),
                SocialLink::new(
                    "LinkedIn",
                    "Professional",
                    "https://linkedin.com/in/muhammad-sameer-9767921b7/",
                ),
                SocialLink::new("Twitter", "Thoughts & Updates", "https://twitter.com/"),
                SocialLink::new("Instagram", "Behind the Scenes", "https://instagram.com/sameerx.07_"),
                SocialLink::new("Email", "Direct Contact", "mailto:sameersam.s199@gmail.com"),
                SocialLink::new("WhatsApp", "Quick Chat", "https://wa.me/918978704174"),
            ],
            tech,
            stats,
            email: EmailConfig::default(),
            draft_path: None,
        }
    }
}

impl SiteConfig {
    /// Path the configuration is read from
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Parse a configuration from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = ron::from_str(content)?;

        if config.format_version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.format_version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Load a configuration file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config = Self::load(path)?;
        tracing::info!(
            "Loaded configuration from {} ({} carousel images)",
            path.display(),
            config.carousel.images.len()
        );
        Ok(config)
    }

    /// Reject configurations the carousels cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.carousel.image_list()?;
        let catalog = self.carousel.catalog()?;

        // Short periods are allowed; images are then superseded mid-entry.
        let settle = catalog.longest_settle_time();
        let embeddings = [
            ("inline", self.carousel.inline()),
            ("modal", self.carousel.modal()),
        ];
        for (name, embedding) in embeddings {
            if embedding.period < settle {
                tracing::warn!(
                    "{} carousel period {:?} is shorter than its transitions ({:?})",
                    name,
                    embedding.period,
                    settle
                );
            }
        }
        Ok(())
    }

    /// Where the contact form draft lives
    pub fn draft_store_path(&self) -> PathBuf {
        self.draft_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join("drafts.json"))
    }
}

/// Per-user data directory for Folio
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("folio"))
        .unwrap_or_else(|| PathBuf::from(".folio"))
}
