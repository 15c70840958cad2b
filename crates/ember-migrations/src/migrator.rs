//! Ordered migration runner

use crate::migration::Migration;
use crate::migrations;
use crate::reporter::ExceptionReporter;
use crate::versioned::VersionedData;
use crate::{MigrationError, Result};
use std::collections::HashSet;
use tracing::{debug, info};

/// Applies pending migrations in ascending version order
pub struct Migrator {
    migrations: Vec<Box<dyn Migration>>,
}

impl Migrator {
    /// Build a runner; two steps with the same version are rejected
    pub fn new(mut migrations: Vec<Box<dyn Migration>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for migration in &migrations {
            if !seen.insert(migration.version()) {
                return Err(MigrationError::DuplicateVersion(migration.version()));
            }
        }
        migrations.sort_by_key(|m| m.version());
        Ok(Self { migrations })
    }

    /// Runner over the built-in migrations
    pub fn builtin() -> Result<Self> {
        Self::new(migrations::builtin())
    }

    /// Highest version known to this runner
    pub fn latest_version(&self) -> Option<u64> {
        self.migrations.last().map(|m| m.version())
    }

    /// Versions that would run for data at `version`
    pub fn pending_versions(&self, version: u64) -> Vec<u64> {
        self.pending(version).map(|m| m.version()).collect()
    }

    fn pending(&self, version: u64) -> impl Iterator<Item = &dyn Migration> {
        self.migrations
            .iter()
            .filter(move |m| m.version() > version)
            .map(|m| &**m)
    }

    /// Migrate `data` to the latest version. `data` itself is never modified.
    pub fn run(&self, data: &VersionedData, reporter: &dyn ExceptionReporter) -> VersionedData {
        let from = data.version();
        let mut current = data.clone();

        for migration in self.pending(from) {
            debug!(
                version = migration.version(),
                description = migration.description(),
                "Applying migration"
            );
            current = migration.migrate(&current, reporter);
        }

        if current.version() != from {
            info!(from, to = current.version(), "State migrated");
        }
        current
    }
}

impl std::fmt::Debug for Migrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator")
            .field("versions", &self.pending_versions(0))
            .finish()
    }
}
