//! Subcommand implementations

use crate::config::EnvironmentConfig;
use anyhow::Context;
use ember_migrations::{Migrator, RecordingReporter, VersionedData};
use ember_permissions::{
    get_caveat_specifications, is_unrestricted_eth_signing_method, is_unrestricted_method,
    Caveat, CaveatTypes,
};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of a `migrate` run
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationReport {
    /// Version read from the input file
    pub from_version: u64,
    /// Version after migrating
    pub to_version: u64,
    /// Anomalies reported along the way
    pub anomalies: Vec<String>,
    /// Migrated state
    pub migrated: VersionedData,
}

/// Migrate the state file at `input`, writing the result to `output` when given
pub async fn migrate_file(input: &Path, output: Option<&Path>) -> anyhow::Result<MigrationReport> {
    let text = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("reading state file {}", input.display()))?;
    let original = VersionedData::from_json(&text)
        .with_context(|| format!("parsing state file {}", input.display()))?;

    let migrator = Migrator::builtin()?;
    let reporter = RecordingReporter::new();
    let migrated = migrator.run(&original, &reporter);

    for anomaly in reporter.captured() {
        warn!(event = "migration_anomaly", %anomaly, "Anomaly during migration");
    }

    if let Some(output) = output {
        tokio::fs::write(output, migrated.to_json_pretty()?)
            .await
            .with_context(|| format!("writing state file {}", output.display()))?;
        info!(path = %output.display(), "Wrote migrated state");
    }

    Ok(MigrationReport {
        from_version: original.version(),
        to_version: migrated.version(),
        anomalies: reporter.captured(),
        migrated,
    })
}

/// Permission classification of one RPC method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Callable without a permission
    pub unrestricted: bool,
    /// Unrestricted Ethereum signing method
    pub eth_signing: bool,
}

impl fmt::Display for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: unrestricted={} eth_signing={}",
            self.name, self.unrestricted, self.eth_signing
        )
    }
}

/// Classify `name`
pub fn describe_method(name: &str) -> MethodInfo {
    MethodInfo {
        name: name.to_string(),
        unrestricted: is_unrestricted_method(name),
        eth_signing: is_unrestricted_eth_signing_method(name),
    }
}

/// Validate the CAIP-25 caveat value at `value_path` against the wallet
/// described by `env_path`
pub async fn validate_caveat_file(value_path: &Path, env_path: &Path) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(value_path)
        .await
        .with_context(|| format!("reading caveat value {}", value_path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing caveat value {}", value_path.display()))?;
    let environment = EnvironmentConfig::load(env_path).await?;

    let specifications = get_caveat_specifications(&environment.hooks(), std::iter::empty())?;
    let specification = specifications
        .get(CaveatTypes::CAIP25)
        .context("no specification registered for authorizedScopes")?;

    specification.validate(&Caveat::new(CaveatTypes::CAIP25, value))?;
    info!(path = %value_path.display(), "Caveat value is valid");
    Ok(())
}
