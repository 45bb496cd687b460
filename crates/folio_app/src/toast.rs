// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transient success/error notification.

use std::time::Duration;

/// Time a toast stays up unless closed
pub const TOAST_LIFETIME: Duration = Duration::from_secs(5);

/// Toast flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Something worked
    Success,
    /// Something failed
    Error,
}

/// A message shown in the corner until it expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Flavor
    pub kind: ToastKind,
    /// Text
    pub message: String,
    shown_at: Duration,
}

impl Toast {
    /// Show `message` from `now`
    pub fn new(kind: ToastKind, message: impl Into<String>, now: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: now,
        }
    }

    /// Time at which the toast disappears
    pub fn expires_at(&self) -> Duration {
        self.shown_at + TOAST_LIFETIME
    }

    /// Whether the toast should be gone at `now`
    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.expires_at()
    }
}

/// Slot holding at most one toast; a new one replaces the old
#[derive(Debug, Default)]
pub struct ToastSlot {
    current: Option<Toast>,
}

impl ToastSlot {
    /// Show a toast, replacing any other
    pub fn show(&mut self, toast: Toast) {
        tracing::debug!("Toast: {}", toast.message);
        self.current = Some(toast);
    }

    /// Dismiss the current toast
    pub fn close(&mut self) {
        self.current = None;
    }

    /// Drop the toast once expired and return what is still visible
    pub fn visible(&mut self, now: Duration) -> Option<&Toast> {
        if self.current.as_ref().is_some_and(|toast| toast.is_expired(now)) {
            self.current = None;
        }
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_lifetime() {
        let mut slot = ToastSlot::default();
        slot.show(Toast::new(ToastKind::Success, "Sent", Duration::from_secs(10)));

        assert!(slot.visible(Duration::from_millis(14_999)).is_some());
        assert!(slot.visible(Duration::from_secs(15)).is_none());
        assert!(slot.visible(Duration::from_secs(1)).is_none(), "stays gone");
    }

    #[test]
    fn test_close_and_replace() {
        let mut slot = ToastSlot::default();
        slot.show(Toast::new(ToastKind::Success, "first", Duration::ZERO));
        slot.show(Toast::new(ToastKind::Error, "second", Duration::from_secs(4)));

        let toast = slot.visible(Duration::from_secs(6)).unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "second");

        slot.close();
        assert!(slot.visible(Duration::from_secs(6)).is_none());
    }
}
