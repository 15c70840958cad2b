//! Migration step trait

use crate::reporter::ExceptionReporter;
use crate::versioned::VersionedData;
use serde_json::{Map, Value};

/// One schema step.
///
/// `transform` must tolerate any input: anomalies go to the reporter and
/// the affected sub-state is left as it was.
pub trait Migration: Send + Sync {
    /// Version this step produces
    fn version(&self) -> u64;

    /// Short description for logs
    fn description(&self) -> &'static str;

    /// Rewrite controller states in place
    fn transform(&self, state: &mut Map<String, Value>, reporter: &dyn ExceptionReporter);

    /// Apply the step to a copy of `original`
    fn migrate(&self, original: &VersionedData, reporter: &dyn ExceptionReporter) -> VersionedData {
        let mut versioned = original.clone();
        versioned.meta.version = self.version();
        self.transform(&mut versioned.data, reporter);
        versioned
    }
}
