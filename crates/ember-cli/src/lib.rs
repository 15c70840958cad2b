//! Ember command-line tools
//!
//! Offline helpers for the wallet core: migrate persisted state files,
//! classify RPC methods and check CAIP-25 caveat values.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod commands;
pub mod config;

pub use commands::{
    describe_method, migrate_file, validate_caveat_file, MethodInfo, MigrationReport,
};
pub use config::EnvironmentConfig;
