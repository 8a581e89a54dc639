//! Root-level error sink.
//!
//! Unrecognized failures propagate here for user-facing display; the page
//! layer polls the latest entry. Notifications-path failures never reach the
//! sink (they are logged and swallowed by their partition).

use parking_lot::RwLock;
use tracing::error;

use crate::StoreError;

/// Destination for failures no partition could translate.
pub trait ErrorSink: Send + Sync {
    /// Record a failure reported by `namespace`.
    fn report(&self, namespace: &str, error: &StoreError);
}

/// Production sink: logs the failure and retains the latest message for the
/// page chrome to display.
pub struct PageErrorSink {
    last: RwLock<Option<String>>,
}

impl PageErrorSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: RwLock::new(None),
        }
    }

    /// The most recently reported failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last.read().clone()
    }

    /// Clear the displayed failure (page navigation does this).
    pub fn clear(&self) {
        *self.last.write() = None;
    }
}

impl Default for PageErrorSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorSink for PageErrorSink {
    fn report(&self, namespace: &str, err: &StoreError) {
        error!(%namespace, %err, "unhandled partition failure");
        *self.last.write() = Some(err.to_string());
    }
}

/// Test sink that accumulates every report.
pub struct CapturingErrorSink {
    reports: RwLock<Vec<String>>,
}

impl CapturingErrorSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(Vec::new()),
        }
    }

    /// Drain all captured reports.
    #[must_use]
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.reports.write())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.read().is_empty()
    }
}

impl Default for CapturingErrorSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorSink for CapturingErrorSink {
    fn report(&self, namespace: &str, err: &StoreError) {
        self.reports.write().push(format!("{namespace}: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_sink_retains_latest() {
        let sink = PageErrorSink::new();
        assert!(sink.last_error().is_none());

        sink.report("Project", &StoreError::Channel("boom".into()));
        sink.report("Project", &StoreError::Channel("later".into()));
        assert!(sink.last_error().unwrap().contains("later"));

        sink.clear();
        assert!(sink.last_error().is_none());
    }
}
