//! Notification sinks for terminal sessions.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use shieldsync_core::{
    Notification, NotifyError, Notifier, NullNotifier, RecordingNotifier, Severity,
    TracingNotifier,
};

use crate::config::NotificationMode;

/// Writes each notification as a one-line toast.
pub struct TerminalNotifier<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalNotifier<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let icon = match notification.severity {
            Severity::Success => "✔",
            Severity::Info => "ℹ",
        };

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{icon} {}", notification.message)?;
        out.flush()?;
        Ok(())
    }
}

/// Notifications kept for the `history` command.
pub const HISTORY_LIMIT: usize = 100;

/// Records each notification for the `history` command, then forwards it.
pub struct HistoryNotifier {
    history: Arc<RecordingNotifier>,
    sink: Box<dyn Notifier>,
}

impl HistoryNotifier {
    pub fn new(history: Arc<RecordingNotifier>, sink: Box<dyn Notifier>) -> Self {
        Self { history, sink }
    }
}

impl Notifier for HistoryNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.history.notify(notification)?;
        self.sink.notify(notification)
    }
}

/// Build the sink selected by configuration.
pub fn sink_for(mode: NotificationMode) -> Box<dyn Notifier> {
    match mode {
        NotificationMode::Terminal => Box::new(TerminalNotifier::new(std::io::stderr())),
        NotificationMode::Log => Box::new(TracingNotifier),
        NotificationMode::Off => Box::new(NullNotifier),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io;

    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_terminal_notifier_writes_toasts() {
        let notifier = TerminalNotifier::new(Vec::new());

        notifier
            .notify(&Notification::success("Cart cleared"))
            .unwrap();
        notifier
            .notify(&Notification::info("Session started"))
            .unwrap();

        let written = String::from_utf8(notifier.out.into_inner().unwrap()).unwrap();
        assert_eq!(written, "✔ Cart cleared\nℹ Session started\n");
    }

    #[test]
    fn test_terminal_notifier_reports_write_errors() {
        let notifier = TerminalNotifier::new(ClosedPipe);
        let result = notifier.notify(&Notification::success("Cart cleared"));
        assert!(matches!(result, Err(NotifyError::Io(_))));
    }

    #[test]
    fn test_history_notifier_keeps_only_recent_toasts() {
        let history = Arc::new(RecordingNotifier::bounded(HISTORY_LIMIT));
        let notifier = HistoryNotifier::new(Arc::clone(&history), Box::new(NullNotifier));

        for n in 0..=HISTORY_LIMIT {
            notifier
                .notify(&Notification::success(format!("toast {n}")))
                .unwrap();
        }

        let messages = history.messages();
        assert_eq!(messages.len(), HISTORY_LIMIT);
        assert_eq!(messages.first().map(String::as_str), Some("toast 1"));
        assert_eq!(
            messages.last().cloned(),
            Some(format!("toast {HISTORY_LIMIT}"))
        );
    }

    #[test]
    fn test_history_notifier_records_before_forwarding() {
        let history = Arc::new(RecordingNotifier::new());
        let notifier = HistoryNotifier::new(
            Arc::clone(&history),
            Box::new(TerminalNotifier::new(ClosedPipe)),
        );

        let result = notifier.notify(&Notification::success("Item removed from cart"));

        assert!(result.is_err());
        assert_eq!(history.messages(), vec!["Item removed from cart"]);
    }
}
