//! Exception reporting side channel
//!
//! Migrations hand anomalies to a reporter and carry on. The extension
//! forwards them to its crash reporter; tests record them.

use crate::MigrationError;
use parking_lot::Mutex;
use tracing::error;

/// Receives anomalies found during migration
pub trait ExceptionReporter: Send + Sync {
    /// Report one anomaly
    fn capture_exception(&self, error: &MigrationError);
}

/// Logs anomalies at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ExceptionReporter for TracingReporter {
    fn capture_exception(&self, err: &MigrationError) {
        error!(event = "migration_anomaly", error = %err, "Migration anomaly captured");
    }
}

/// Keeps the message of every captured anomaly
#[derive(Debug, Default)]
pub struct RecordingReporter {
    captured: Mutex<Vec<String>>,
}

impl RecordingReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages captured so far
    pub fn captured(&self) -> Vec<String> {
        self.captured.lock().clone()
    }

    /// Number of captured anomalies
    pub fn len(&self) -> usize {
        self.captured.lock().len()
    }

    /// True when nothing was captured
    pub fn is_empty(&self) -> bool {
        self.captured.lock().is_empty()
    }
}

impl ExceptionReporter for RecordingReporter {
    fn capture_exception(&self, err: &MigrationError) {
        self.captured.lock().push(err.to_string());
    }
}
