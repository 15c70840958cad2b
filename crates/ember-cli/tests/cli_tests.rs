//! File round trips for the CLI commands

use ember_cli::{migrate_file, validate_caveat_file, EnvironmentConfig};
use ember_migrations::VersionedData;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ACCOUNT: &str = "0x5cfe73b6021e818b776b421b1c4db2474086a7e1";

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn environment() -> serde_json::Value {
    json!({
        "accounts": [{ "id": "acc-1", "address": ACCOUNT }],
        "networkClientIds": { "0x1": "mainnet" },
    })
}

#[tokio::test]
async fn test_migrate_writes_output() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "state.json",
        &json!({
            "meta": { "version": 134 },
            "data": {
                "PreferencesController": {
                    "preferences": { "smartTransactionsMigrationApplied": true },
                },
            },
        }),
    );
    let output = dir.path().join("migrated.json");

    let report = migrate_file(&input, Some(&output)).await.unwrap();

    assert_eq!(report.from_version, 134);
    assert_eq!(report.to_version, 147);
    assert!(report.anomalies.is_empty());

    let written = VersionedData::from_json(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, report.migrated);
    assert_eq!(
        written.data["PreferencesController"]["preferences"]["smartTransactionsMigrationApplied"],
        json!(false)
    );
}

#[tokio::test]
async fn test_migrate_reports_anomalies() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "state.json",
        &json!({ "meta": { "version": 134 }, "data": { "PreferencesController": "invalid" } }),
    );

    let report = migrate_file(&input, None).await.unwrap();

    assert_eq!(report.to_version, 147);
    assert_eq!(
        report.anomalies,
        vec!["Migration 135: Invalid PreferencesController state: string".to_string()]
    );
}

#[tokio::test]
async fn test_migrate_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("state.json");
    std::fs::write(&input, "not json").unwrap();

    let err = migrate_file(&input, None).await.unwrap_err();
    assert!(err.to_string().contains("parsing state file"));
}

#[tokio::test]
async fn test_validate_caveat_accepts_known_account() {
    let dir = TempDir::new().unwrap();
    let env = write_json(dir.path(), "env.json", &environment());
    let value = write_json(
        dir.path(),
        "caveat.json",
        &json!({
            "requiredScopes": {},
            "optionalScopes": { "eip155:1": { "accounts": [format!("eip155:1:{ACCOUNT}")] } },
            "isMultichainOrigin": false,
        }),
    );

    validate_caveat_file(&value, &env).await.unwrap();
}

#[tokio::test]
async fn test_validate_caveat_rejects_unknown_chain() {
    let dir = TempDir::new().unwrap();
    let env = write_json(dir.path(), "env.json", &environment());
    let value = write_json(
        dir.path(),
        "caveat.json",
        &json!({
            "requiredScopes": {},
            "optionalScopes": { "eip155:5": { "accounts": [format!("eip155:5:{ACCOUNT}")] } },
            "isMultichainOrigin": false,
        }),
    );

    let err = validate_caveat_file(&value, &env).await.unwrap_err();
    assert!(err.to_string().contains("0x5"));
}

#[tokio::test]
async fn test_environment_load() {
    let dir = TempDir::new().unwrap();
    let env = write_json(dir.path(), "env.json", &environment());

    let config = EnvironmentConfig::load(&env).await.unwrap();

    assert_eq!(config.accounts.len(), 1);
    assert_eq!(config.network_client_ids.get("0x1").map(String::as_str), Some("mainnet"));
    assert!(EnvironmentConfig::load(&dir.path().join("missing.json")).await.is_err());
}
