//! User-facing notifications for cart mutations.
//!
//! The cart store reports what happened through a [`Notifier`]. Notifications
//! are fire-and-forget: the store logs a failing notifier and carries on, so
//! a broken toast backend can never fail or roll back a cart mutation.

use core::fmt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;

/// How a notification should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }
}

/// Cart mutations that produce a notification.
///
/// `update_quantity` has no variant: quantity changes are silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A product was added for the first time.
    ItemAdded { name: String },
    /// A product already in the cart was added again.
    QuantityIncremented { name: String },
    /// A remove was requested, whether or not the product was in the cart.
    ItemRemoved,
    /// The cart was emptied.
    Cleared,
}

impl CartEvent {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::ItemAdded { name } => format!("{name} added to cart"),
            Self::QuantityIncremented { name } => format!("Added another {name} to cart"),
            Self::ItemRemoved => "Item removed from cart".to_string(),
            Self::Cleared => "Cart cleared".to_string(),
        }
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        Severity::Success
    }

    #[must_use]
    pub fn notification(&self) -> Notification {
        Notification {
            message: self.message(),
            severity: self.severity(),
        }
    }
}

/// Errors a notification backend can report.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The backend cannot display anything right now.
    #[error("notification backend unavailable: {0}")]
    Unavailable(String),

    /// Writing the notification failed.
    #[error("failed to write notification: {0}")]
    Io(#[from] std::io::Error),
}

/// A sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Display a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not display it. Callers treat
    /// this as non-fatal.
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).notify(notification)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).notify(notification)
    }
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            severity = %notification.severity,
            "{}",
            notification.message
        );
        Ok(())
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Keeps notifications in memory, oldest first.
///
/// Unbounded by default. [`RecordingNotifier::bounded`] keeps only the most
/// recent entries, for recorders that live as long as an interactive session.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<VecDeque<Notification>>,
    limit: Option<usize>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` notifications, dropping the oldest first.
    #[must_use]
    pub fn bounded(limit: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(limit)),
            limit: Some(limit),
        }
    }

    /// The retained notifications.
    #[must_use]
    pub fn entries(&self) -> Vec<Notification> {
        self.lock().iter().cloned().collect()
    }

    /// Messages of the retained notifications.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut entries = self.lock();
        if let Some(limit) = self.limit {
            if limit == 0 {
                return Ok(());
            }
            while entries.len() >= limit {
                entries.pop_front();
            }
        }
        entries.push_back(notification.clone());
        Ok(())
    }
}
