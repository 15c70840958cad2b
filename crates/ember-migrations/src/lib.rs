//! Versioned state migrations for the Ember wallet extension
//!
//! Persisted state is a `{ meta: { version }, data }` blob. Each migration
//! takes a copy to its own version; anomalies in the input are handed to an
//! [`ExceptionReporter`] instead of aborting the upgrade.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod migration;
pub mod migrations;
pub mod migrator;
pub mod reporter;
pub mod versioned;

pub use error::{MigrationError, Result};
pub use migration::Migration;
pub use migrations::{Migration135, Migration147};
pub use migrator::Migrator;
pub use reporter::{ExceptionReporter, RecordingReporter, TracingReporter};
pub use versioned::{type_name, Meta, VersionedData};
