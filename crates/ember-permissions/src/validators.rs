//! Caveat input validation
//!
//! Both validators take the raw JSON value of a caveat field, since the
//! value arrives from a dApp request and its shape is not yet known.

use crate::names::PermissionNames;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use tracing::error;

/// Wallet-managed account, as listed by the accounts controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalAccount {
    /// Account ID
    pub id: String,
    /// Hex address
    pub address: String,
}

impl InternalAccount {
    /// Create an account entry
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
        }
    }
}

/// Check that `accounts` is a non-empty array of addresses the wallet knows.
///
/// Addresses are compared case-insensitively against `get_internal_accounts()`.
pub fn validate_caveat_accounts<F>(accounts: &Value, get_internal_accounts: F) -> Result<()>
where
    F: FnOnce() -> Vec<InternalAccount>,
{
    let invalid = || Error::InvalidAccounts {
        permission: PermissionNames::ETH_ACCOUNTS,
    };

    let items = accounts
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(invalid)?;
    let addresses = items
        .iter()
        .map(|item| item.as_str().ok_or_else(invalid))
        .collect::<Result<Vec<_>>>()?;

    let internal = get_internal_accounts();
    for address in addresses {
        let known = internal
            .iter()
            .any(|account| account.address.eq_ignore_ascii_case(address));
        if !known {
            return Err(Error::UnrecognizedAddress {
                permission: PermissionNames::ETH_ACCOUNTS,
                address: address.to_string(),
            });
        }
    }

    Ok(())
}

/// Check that `chain_ids` is a non-empty array of chain IDs with a configured
/// network client.
///
/// A failing lookup is logged and replaced by [`Error::UnrecognizedChainId`].
pub fn validate_caveat_networks<F, E>(
    chain_ids: &Value,
    find_network_client_id_by_chain_id: F,
) -> Result<()>
where
    F: Fn(&str) -> std::result::Result<String, E>,
    E: Display,
{
    let items = chain_ids
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or(Error::InvalidChainIds {
            permission: PermissionNames::PERMITTED_CHAINS,
        })?;

    for item in items {
        let chain_id = match item.as_str() {
            Some(s) => s.to_string(),
            None => item.to_string(),
        };

        if let Err(e) = find_network_client_id_by_chain_id(&chain_id) {
            error!(chain_id = %chain_id, error = %e, "Network client lookup failed");
            return Err(Error::UnrecognizedChainId {
                permission: PermissionNames::PERMITTED_CHAINS,
                chain_id,
            });
        }
    }

    Ok(())
}
