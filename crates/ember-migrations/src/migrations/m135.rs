//! Reset the smart transactions migration marker.

use crate::migration::Migration;
use crate::reporter::ExceptionReporter;
use crate::versioned::type_name;
use crate::MigrationError;
use serde_json::{Map, Value};
use tracing::debug;

const VERSION: u64 = 135;

/// Sets `PreferencesController.preferences.smartTransactionsMigrationApplied`
/// to `false` so the opt-in follow-up runs again. The user's opt-in status
/// is left alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct Migration135;

impl Migration for Migration135 {
    fn version(&self) -> u64 {
        VERSION
    }

    fn description(&self) -> &'static str {
        "Reset smartTransactionsMigrationApplied"
    }

    fn transform(&self, state: &mut Map<String, Value>, reporter: &dyn ExceptionReporter) {
        let controller = match state.get_mut("PreferencesController") {
            None => return,
            Some(Value::Object(controller)) => controller,
            Some(other) => {
                reporter.capture_exception(&MigrationError::invalid_state(
                    VERSION,
                    "PreferencesController",
                    type_name(other),
                ));
                return;
            }
        };

        match controller.get_mut("preferences") {
            Some(Value::Object(preferences)) => {
                preferences.insert(
                    "smartTransactionsMigrationApplied".to_string(),
                    Value::Bool(false),
                );
                debug!("Migration 135: reset smartTransactionsMigrationApplied");
            }
            other => {
                let found = other.map(|value| type_name(value)).unwrap_or("undefined");
                reporter.capture_exception(&MigrationError::invalid_state(
                    VERSION,
                    "PreferencesController.preferences",
                    found,
                ));
            }
        }
    }
}
