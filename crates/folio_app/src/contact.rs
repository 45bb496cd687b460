// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contact form state and draft persistence.
//!
//! The draft is written to a small JSON key-value file on every edit and
//! removed once a submission succeeds. Persistence is best effort: failures
//! are logged and never shown to the visitor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key the draft is stored under
pub const DRAFT_KEY: &str = "contact-form-data";

/// Draft store errors
#[derive(Debug, thiserror::Error)]
pub enum DraftStoreError {
    /// Reading or writing the store failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The store or the draft is not valid JSON
    #[error("Invalid draft store contents: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a form cannot be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Name left blank
    #[error("Please enter your name")]
    MissingName,
    /// Email left blank
    #[error("Please enter your email address")]
    MissingEmail,
    /// Email has no usable shape
    #[error("Please enter a valid email address")]
    InvalidEmail,
    /// Subject left blank
    #[error("Please enter a subject")]
    MissingSubject,
    /// Message left blank
    #[error("Please enter a message")]
    MissingMessage,
}

/// Form fields as typed so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDraft {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub message: String,
}

impl ContactDraft {
    /// Whether every field is blank
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .all(|field| field.trim().is_empty())
    }

    /// Check the fields and produce the message to send
    pub fn validate(&self) -> Result<ContactMessage, ValidationError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let subject = self.subject.trim();
        let message = self.message.trim();

        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !is_plausible_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if subject.is_empty() {
            return Err(ValidationError::MissingSubject);
        }
        if message.is_empty() {
            return Err(ValidationError::MissingMessage);
        }

        Ok(ContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Validated message handed to the mailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub message: String,
}

/// JSON key-value file holding the draft
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    /// Store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved draft, if any
    pub fn read(&self) -> Result<Option<ContactDraft>, DraftStoreError> {
        let mut entries = self.read_entries()?;
        match entries.remove(DRAFT_KEY) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Save the draft, replacing any previous one
    pub fn write(&self, draft: &ContactDraft) -> Result<(), DraftStoreError> {
        // A corrupt store is replaced rather than blocking new drafts.
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(DRAFT_KEY.to_string(), serde_json::to_value(draft)?);
        self.write_entries(&entries)
    }

    /// Forget the saved draft
    pub fn remove(&self) -> Result<(), DraftStoreError> {
        let mut entries = self.read_entries()?;
        if entries.remove(DRAFT_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }

    fn read_entries(&self) -> Result<Map<String, Value>, DraftStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), DraftStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Submission progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    /// Accepting edits
    #[default]
    Idle,
    /// Waiting for the mailer
    Sending,
}

/// Contact form with its persisted draft
#[derive(Debug)]
pub struct ContactForm {
    draft: ContactDraft,
    store: Option<DraftStore>,
    status: FormStatus,
    error: Option<ValidationError>,
}

impl ContactForm {
    /// Form restored from `store`, or blank without one
    pub fn new(store: Option<DraftStore>) -> Self {
        let draft = store
            .as_ref()
            .and_then(|store| match store.read() {
                Ok(draft) => draft,
                Err(e) => {
                    tracing::warn!("Failed to restore contact draft: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        if !draft.is_empty() {
            tracing::debug!("Restored contact draft");
        }

        Self {
            draft,
            store,
            status: FormStatus::Idle,
            error: None,
        }
    }

    /// Current fields
    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    /// Fields for editing; call [`ContactForm::commit_edit`] after a change
    pub fn draft_mut(&mut self) -> &mut ContactDraft {
        &mut self.draft
    }

    /// Persist the current fields
    pub fn commit_edit(&mut self) {
        self.error = None;
        if let Some(store) = &self.store {
            if let Err(e) = store.write(&self.draft) {
                tracing::warn!("Failed to save contact draft to {}: {}", store.path().display(), e);
            }
        }
    }

    /// Submission progress
    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// Last validation failure
    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    /// Validate and start sending.
    ///
    /// Returns the message to dispatch, or `None` when the form is invalid or
    /// already sending.
    pub fn submit(&mut self) -> Option<ContactMessage> {
        if self.status == FormStatus::Sending {
            return None;
        }

        match self.draft.validate() {
            Ok(message) => {
                self.status = FormStatus::Sending;
                self.error = None;
                Some(message)
            }
            Err(e) => {
                tracing::debug!("Contact form rejected: {}", e);
                self.error = Some(e);
                None
            }
        }
    }

    /// Record the outcome of a dispatched message
    pub fn finish(&mut self, delivered: bool) {
        self.status = FormStatus::Idle;
        if !delivered {
            return;
        }

        self.draft = ContactDraft::default();
        if let Some(store) = &self.store {
            if let Err(e) = store.remove() {
                tracing::warn!("Failed to clear contact draft: {}", e);
            }
        }
    }
}
