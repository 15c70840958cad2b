//! CAIP-25 caveat values
//!
//! A CAIP-25 value authorizes an origin for a set of chain scopes, each
//! listing the CAIP-10 accounts the origin may see on that chain. Ethereum
//! chains use `eip155:<decimal id>` scopes; `wallet:eip155` covers accounts
//! that are not tied to a particular chain.

use crate::chain::{decimal_to_hex_chain_id, hex_chain_id_to_decimal};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// EVM namespace
pub const EIP155_NAMESPACE: &str = "eip155";
/// Wallet namespace
pub const WALLET_NAMESPACE: &str = "wallet";
/// Chain-agnostic EVM wallet scope
pub const WALLET_EIP155_SCOPE: &str = "wallet:eip155";

/// Accounts authorized within one scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeObject {
    /// CAIP-10 account IDs
    #[serde(default)]
    pub accounts: Vec<String>,
}

/// Value of an `authorizedScopes` caveat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caip25CaveatValue {
    /// Scopes the dApp declared as required
    pub required_scopes: BTreeMap<String, ScopeObject>,
    /// Scopes the dApp declared as optional
    pub optional_scopes: BTreeMap<String, ScopeObject>,
    /// Whether the grant came through the multichain API rather than the
    /// legacy Ethereum provider
    pub is_multichain_origin: bool,
    /// Opaque session properties
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub session_properties: Map<String, Value>,
}

impl Caip25CaveatValue {
    /// Iterate required scopes, then optional scopes
    pub fn scopes(&self) -> impl Iterator<Item = (&String, &ScopeObject)> {
        self.required_scopes.iter().chain(self.optional_scopes.iter())
    }

    /// True when neither scope map has entries
    pub fn is_empty(&self) -> bool {
        self.required_scopes.is_empty() && self.optional_scopes.is_empty()
    }
}

/// A parsed CAIP-2 scope string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `eip155:<chain>`
    Eip155(u64),
    /// `wallet:eip155`
    WalletEip155,
    /// `wallet`
    Wallet,
    /// Any other well-formed scope
    Other {
        /// CAIP-2 namespace
        namespace: String,
        /// CAIP-2 reference, absent for namespace-wide scopes
        reference: Option<String>,
    },
}

impl Scope {
    /// Parse a scope string such as `eip155:1` or `wallet:eip155`
    pub fn parse(scope: &str) -> Result<Self> {
        let (namespace, reference) = match scope.split_once(':') {
            Some((ns, r)) => (ns, Some(r)),
            None => (scope, None),
        };

        if !is_valid_namespace(namespace) {
            return Err(Error::InvalidScope(scope.to_string()));
        }
        if let Some(r) = reference {
            if !is_valid_reference(r) {
                return Err(Error::InvalidScope(scope.to_string()));
            }
        }

        match (namespace, reference) {
            (EIP155_NAMESPACE, Some(r)) => {
                if r.len() > 1 && r.starts_with('0') {
                    return Err(Error::InvalidScope(scope.to_string()));
                }
                r.parse::<u64>()
                    .map(Scope::Eip155)
                    .map_err(|_| Error::InvalidScope(scope.to_string()))
            }
            (WALLET_NAMESPACE, Some(EIP155_NAMESPACE)) => Ok(Scope::WalletEip155),
            (WALLET_NAMESPACE, None) => Ok(Scope::Wallet),
            (ns, r) => Ok(Scope::Other {
                namespace: ns.to_string(),
                reference: r.map(str::to_string),
            }),
        }
    }

    /// Scope whose accounts are Ethereum addresses
    pub fn is_eth(&self) -> bool {
        matches!(self, Scope::Eip155(_) | Scope::WalletEip155)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Eip155(id) => write!(f, "{}:{}", EIP155_NAMESPACE, id),
            Scope::WalletEip155 => write!(f, "{}", WALLET_EIP155_SCOPE),
            Scope::Wallet => write!(f, "{}", WALLET_NAMESPACE),
            Scope::Other {
                namespace,
                reference: Some(r),
            } => write!(f, "{}:{}", namespace, r),
            Scope::Other {
                namespace,
                reference: None,
            } => write!(f, "{}", namespace),
        }
    }
}

/// A CAIP-10 account ID: `<scope>:<address>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caip10Account {
    /// Scope the account lives in
    pub scope: Scope,
    /// Account address
    pub address: String,
}

impl Caip10Account {
    /// Parse `eip155:1:0xabc…` or `wallet:eip155:0xabc…`
    pub fn parse(account: &str) -> Result<Self> {
        let (scope, address) = account
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidScope(account.to_string()))?;

        if !scope.contains(':') || !is_valid_address(address) {
            return Err(Error::InvalidScope(account.to_string()));
        }

        Ok(Self {
            scope: Scope::parse(scope)?,
            address: address.to_string(),
        })
    }
}

impl fmt::Display for Caip10Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.address)
    }
}

fn is_valid_namespace(ns: &str) -> bool {
    (3..=8).contains(&ns.len())
        && ns
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn is_valid_reference(r: &str) -> bool {
    (1..=32).contains(&r.len())
        && r
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_valid_address(a: &str) -> bool {
    (1..=128).contains(&a.len())
        && a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '%'))
}

/// Ethereum addresses authorized across all EVM scopes.
///
/// Order follows first appearance; duplicates (case-insensitive) are dropped.
pub fn get_eth_accounts(value: &Caip25CaveatValue) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut accounts = Vec::new();

    for (key, scope_object) in value.scopes() {
        match Scope::parse(key) {
            Ok(scope) if scope.is_eth() => {}
            _ => continue,
        }
        for account in &scope_object.accounts {
            if let Ok(parsed) = Caip10Account::parse(account) {
                if seen.insert(parsed.address.to_ascii_lowercase()) {
                    accounts.push(parsed.address);
                }
            }
        }
    }

    accounts
}

/// Hex chain IDs of every `eip155:<chain>` scope, in ascending numeric order
pub fn get_permitted_eth_chain_ids(value: &Caip25CaveatValue) -> Vec<String> {
    let chain_ids: BTreeSet<u64> = value
        .scopes()
        .filter_map(|(key, _)| match Scope::parse(key) {
            Ok(Scope::Eip155(id)) => Some(id),
            _ => None,
        })
        .collect();
    chain_ids.into_iter().map(decimal_to_hex_chain_id).collect()
}

/// Replace the accounts of every EVM scope with `accounts`
pub fn set_eth_accounts(value: &Caip25CaveatValue, accounts: &[String]) -> Caip25CaveatValue {
    let mut updated = value.clone();

    for scopes in [&mut updated.required_scopes, &mut updated.optional_scopes] {
        for (key, scope_object) in scopes.iter_mut() {
            if !Scope::parse(key).map(|s| s.is_eth()).unwrap_or(false) {
                continue;
            }
            scope_object.accounts = accounts
                .iter()
                .map(|address| format!("{}:{}", key, address))
                .collect();
        }
    }

    updated
}

/// Restrict the optional EVM chain scopes to `chain_ids` (hex).
///
/// Required scopes are never removed. New scopes receive the accounts
/// already authorized elsewhere in the value.
pub fn set_permitted_eth_chain_ids(
    value: &Caip25CaveatValue,
    chain_ids: &[String],
) -> Result<Caip25CaveatValue> {
    let decimals = chain_ids
        .iter()
        .map(|id| hex_chain_id_to_decimal(id))
        .collect::<Result<Vec<_>>>()?;
    let accounts = get_eth_accounts(value);

    let mut updated = value.clone();
    updated.optional_scopes.retain(|key, _| match Scope::parse(key) {
        Ok(Scope::Eip155(id)) => decimals.contains(&id),
        _ => true,
    });

    for id in decimals {
        let key = Scope::Eip155(id).to_string();
        if !updated.required_scopes.contains_key(&key) {
            updated.optional_scopes.entry(key).or_default();
        }
    }

    Ok(set_eth_accounts(&updated, &accounts))
}

/// Build the value granted to a legacy Ethereum provider request
pub fn build_caip25_value(accounts: &[String], chain_ids: &[String]) -> Result<Caip25CaveatValue> {
    let mut base = Caip25CaveatValue::default();
    base.optional_scopes
        .insert(WALLET_EIP155_SCOPE.to_string(), ScopeObject::default());

    let with_chains = set_permitted_eth_chain_ids(&base, chain_ids)?;
    Ok(set_eth_accounts(&with_chains, accounts))
}

/// Union of two values: scopes and accounts are combined, `right` wins on
/// conflicting session properties.
pub fn merge_caip25_values(
    left: &Caip25CaveatValue,
    right: &Caip25CaveatValue,
) -> Caip25CaveatValue {
    let mut merged = left.clone();

    merge_scopes(&mut merged.required_scopes, &right.required_scopes);
    merge_scopes(&mut merged.optional_scopes, &right.optional_scopes);
    merged.is_multichain_origin = left.is_multichain_origin || right.is_multichain_origin;
    for (k, v) in &right.session_properties {
        merged.session_properties.insert(k.clone(), v.clone());
    }

    merged
}

fn merge_scopes(into: &mut BTreeMap<String, ScopeObject>, from: &BTreeMap<String, ScopeObject>) {
    for (key, scope_object) in from {
        let target = into.entry(key.clone()).or_default();
        for account in &scope_object.accounts {
            if !target.accounts.contains(account) {
                target.accounts.push(account.clone());
            }
        }
    }
}
