//! Error types

/// Migration errors
///
/// Anomalies found while transforming state are reported, never returned;
/// only building a [`crate::Migrator`] or loading a state file can fail.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// A controller sub-state has an unexpected shape
    #[error("Migration {version}: Invalid {controller} state: {found}")]
    InvalidState {
        /// Migration that found the anomaly
        version: u64,
        /// Path of the offending sub-state
        controller: String,
        /// Type actually found
        found: &'static str,
    },

    /// Any other anomaly worth reporting
    #[error("Migration {version}: {message}")]
    Anomaly {
        /// Migration that found the anomaly
        version: u64,
        /// Description
        message: String,
    },

    /// Two migrations share a version
    #[error("Duplicate migration version: {0}")]
    DuplicateVersion(u64),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MigrationError {
    /// Shorthand for [`MigrationError::InvalidState`]
    pub fn invalid_state(version: u64, controller: impl Into<String>, found: &'static str) -> Self {
        Self::InvalidState {
            version,
            controller: controller.into(),
            found,
        }
    }

    /// Shorthand for [`MigrationError::Anomaly`]
    pub fn anomaly(version: u64, message: impl Into<String>) -> Self {
        Self::Anomaly {
            version,
            message: message.into(),
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, MigrationError>;
