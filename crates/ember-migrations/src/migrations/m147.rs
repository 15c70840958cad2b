//! Convert legacy Ethereum permissions into CAIP-25 grants.

use crate::migration::Migration;
use crate::reporter::ExceptionReporter;
use crate::versioned::type_name;
use crate::{MigrationError, Result};
use ember_permissions::{
    build_caip25_value, merge_caip25_values, Caip25CaveatValue, CaveatTypes, PermissionNames,
};
use serde_json::{json, Map, Value};
use tracing::debug;

const VERSION: u64 = 147;

/// Replaces each subject's `eth_accounts` and `endowment:permitted-chains`
/// permissions with a single `endowment:caip25` permission.
///
/// Subjects without permitted chains are authorized on the globally
/// selected network. Malformed subjects are reported and left as they were.
#[derive(Debug, Default, Clone, Copy)]
pub struct Migration147;

impl Migration for Migration147 {
    fn version(&self) -> u64 {
        VERSION
    }

    fn description(&self) -> &'static str {
        "Convert eth_accounts and permitted-chains to endowment:caip25"
    }

    fn transform(&self, state: &mut Map<String, Value>, reporter: &dyn ExceptionReporter) {
        let Some(controller) = state.get("PermissionController") else {
            return;
        };
        let subjects = match subjects_of(controller) {
            Ok(subjects) => subjects,
            Err(err) => {
                reporter.capture_exception(&err);
                return;
            }
        };
        if !subjects
            .values()
            .any(|subject| subject.pointer("/permissions/eth_accounts").is_some())
        {
            return;
        }

        let current_chain_id = match selected_chain_id(state) {
            Ok(chain_id) => chain_id,
            Err(err) => {
                reporter.capture_exception(&err);
                return;
            }
        };

        let Some(subjects) = state
            .get_mut("PermissionController")
            .and_then(|controller| controller.get_mut("subjects"))
            .and_then(Value::as_object_mut)
        else {
            return;
        };

        let mut converted = 0usize;
        for (origin, subject) in subjects.iter_mut() {
            match migrate_subject(origin, subject, &current_chain_id) {
                Ok(true) => converted += 1,
                Ok(false) => {}
                Err(err) => reporter.capture_exception(&err),
            }
        }

        debug!(
            converted,
            chain_id = %current_chain_id,
            "Migration 147: converted legacy permissions"
        );
    }
}

fn subjects_of(controller: &Value) -> Result<&Map<String, Value>> {
    let Some(controller) = controller.as_object() else {
        return Err(MigrationError::invalid_state(
            VERSION,
            "PermissionController",
            type_name(controller),
        ));
    };
    match controller.get("subjects") {
        Some(Value::Object(subjects)) => Ok(subjects),
        other => Err(MigrationError::invalid_state(
            VERSION,
            "PermissionController.subjects",
            other.map(type_name).unwrap_or("undefined"),
        )),
    }
}

/// Chain ID of the network configuration owning `selectedNetworkClientId`
fn selected_chain_id(state: &Map<String, Value>) -> Result<String> {
    let network = match state.get("NetworkController") {
        Some(Value::Object(network)) => network,
        other => {
            return Err(MigrationError::invalid_state(
                VERSION,
                "NetworkController",
                other.map(type_name).unwrap_or("undefined"),
            ))
        }
    };

    let selected = match network.get("selectedNetworkClientId") {
        Some(Value::String(selected)) => selected,
        other => {
            return Err(MigrationError::invalid_state(
                VERSION,
                "NetworkController.selectedNetworkClientId",
                other.map(type_name).unwrap_or("undefined"),
            ))
        }
    };

    let configurations = match network.get("networkConfigurationsByChainId") {
        Some(Value::Object(configurations)) => configurations,
        other => {
            return Err(MigrationError::invalid_state(
                VERSION,
                "NetworkController.networkConfigurationsByChainId",
                other.map(type_name).unwrap_or("undefined"),
            ))
        }
    };

    configurations
        .iter()
        .find(|(_, configuration)| {
            configuration
                .get("rpcEndpoints")
                .and_then(Value::as_array)
                .map(|endpoints| {
                    endpoints.iter().any(|endpoint| {
                        endpoint.get("networkClientId").and_then(Value::as_str)
                            == Some(selected.as_str())
                    })
                })
                .unwrap_or(false)
        })
        .map(|(chain_id, _)| chain_id.clone())
        .ok_or_else(|| {
            MigrationError::anomaly(
                VERSION,
                format!(
                    "No network configuration found for selectedNetworkClientId \"{selected}\""
                ),
            )
        })
}

/// String values of the caveat of type `caveat_type`
fn caveat_strings(permission: &Value, caveat_type: &str) -> Option<Vec<String>> {
    permission
        .get("caveats")?
        .as_array()?
        .iter()
        .find(|caveat| caveat.get("type").and_then(Value::as_str) == Some(caveat_type))?
        .get("value")?
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn existing_caip25_value(permission: &Value) -> Option<Caip25CaveatValue> {
    let value = permission
        .get("caveats")?
        .as_array()?
        .iter()
        .find(|caveat| caveat.get("type").and_then(Value::as_str) == Some(CaveatTypes::CAIP25))?
        .get("value")?;
    serde_json::from_value(value.clone()).ok()
}

/// Returns `Ok(true)` when the subject was converted
fn migrate_subject(origin: &str, subject: &mut Value, current_chain_id: &str) -> Result<bool> {
    let invalid = |what: &str| {
        MigrationError::anomaly(
            VERSION,
            format!("Invalid {what} for subject \"{origin}\""),
        )
    };

    let permissions = subject
        .get_mut("permissions")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| invalid("permissions"))?;

    let Some(eth_accounts) = permissions.get(PermissionNames::ETH_ACCOUNTS) else {
        return Ok(false);
    };
    let accounts = caveat_strings(eth_accounts, CaveatTypes::RESTRICT_RETURNED_ACCOUNTS)
        .filter(|accounts| !accounts.is_empty())
        .ok_or_else(|| invalid("eth_accounts caveat"))?;
    let id = eth_accounts.get("id").cloned();
    let date = eth_accounts.get("date").cloned();

    let mut chain_ids = match permissions.get(PermissionNames::PERMITTED_CHAINS) {
        Some(permitted) => caveat_strings(permitted, CaveatTypes::RESTRICT_NETWORK_SWITCHING)
            .ok_or_else(|| invalid("permitted-chains caveat"))?,
        None => Vec::new(),
    };
    if chain_ids.is_empty() {
        chain_ids.push(current_chain_id.to_string());
    }

    let mut value = build_caip25_value(&accounts, &chain_ids).map_err(|err| {
        MigrationError::anomaly(
            VERSION,
            format!("Cannot convert permissions for subject \"{origin}\": {err}"),
        )
    })?;
    if let Some(existing) = permissions.get(PermissionNames::CAIP25) {
        let existing =
            existing_caip25_value(existing).ok_or_else(|| invalid("endowment:caip25 caveat"))?;
        value = merge_caip25_values(&existing, &value);
    }

    let mut permission = json!({
        "parentCapability": PermissionNames::CAIP25,
        "invoker": origin,
        "caveats": [{
            "type": CaveatTypes::CAIP25,
            "value": serde_json::to_value(&value)?,
        }],
    });
    if let Some(fields) = permission.as_object_mut() {
        if let Some(id) = id {
            fields.insert("id".to_string(), id);
        }
        if let Some(date) = date {
            fields.insert("date".to_string(), date);
        }
    }

    permissions.remove(PermissionNames::ETH_ACCOUNTS);
    permissions.remove(PermissionNames::PERMITTED_CHAINS);
    permissions.insert(PermissionNames::CAIP25.to_string(), permission);

    debug!(
        origin,
        accounts = accounts.len(),
        chains = chain_ids.len(),
        "Converted legacy permissions"
    );
    Ok(true)
}
