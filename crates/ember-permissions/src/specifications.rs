//! Caveat and permission specification registry
//!
//! The maps built here are handed to the permission controller when it is
//! constructed. Each entry names a caveat or permission and carries the
//! closures the controller calls to validate, merge or build it.

use crate::caip25::{
    get_eth_accounts, get_permitted_eth_chain_ids, merge_caip25_values, Caip10Account,
    Caip25CaveatValue, Scope,
};
use crate::names::{CaveatTypes, PermissionNames};
use crate::validators::{validate_caveat_accounts, validate_caveat_networks, InternalAccount};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Lists the wallet's internal accounts
pub type ListAccountsFn = Arc<dyn Fn() -> Vec<InternalAccount> + Send + Sync>;

/// Resolves a hex chain ID to a network client ID
pub type FindNetworkClientIdFn =
    Arc<dyn Fn(&str) -> std::result::Result<String, String> + Send + Sync>;

/// Validates a caveat before it is granted
pub type CaveatValidator = Arc<dyn Fn(&Caveat) -> Result<()> + Send + Sync>;

/// Merges an existing caveat value with an incoming one
pub type CaveatMerger = Arc<dyn Fn(&Value, &Value) -> Result<Value> + Send + Sync>;

/// Builds a permission from request options
pub type PermissionFactory = Arc<dyn Fn(PermissionOptions) -> Result<Permission> + Send + Sync>;

/// A restriction attached to a permission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caveat {
    /// Caveat type name
    #[serde(rename = "type")]
    pub caveat_type: String,
    /// Caveat value
    pub value: Value,
}

impl Caveat {
    /// Create a caveat
    pub fn new(caveat_type: impl Into<String>, value: Value) -> Self {
        Self {
            caveat_type: caveat_type.into(),
            value,
        }
    }
}

/// A permission granted to an origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Permission target name
    pub parent_capability: String,
    /// Origin holding the permission
    pub invoker: String,
    /// Attached caveats
    pub caveats: Vec<Caveat>,
}

/// Input to a [`PermissionFactory`]
#[derive(Debug, Clone)]
pub struct PermissionOptions {
    /// Origin the permission is built for
    pub invoker: String,
    /// Requested caveats
    pub caveats: Vec<Caveat>,
}

/// Kind of permission target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionType {
    /// Grants a capability rather than access to one RPC method
    Endowment,
    /// Guards a single RPC method
    RestrictedMethod,
}

/// Caveat specification entry
#[derive(Clone)]
pub struct CaveatSpecification {
    /// Caveat type name
    pub caveat_type: String,
    /// Optional value validator
    pub validator: Option<CaveatValidator>,
    /// Optional value merger
    pub merger: Option<CaveatMerger>,
}

impl CaveatSpecification {
    /// Create a specification with no validator or merger
    pub fn new(caveat_type: impl Into<String>) -> Self {
        Self {
            caveat_type: caveat_type.into(),
            validator: None,
            merger: None,
        }
    }

    /// Attach a validator
    pub fn with_validator(mut self, validator: CaveatValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Attach a merger
    pub fn with_merger(mut self, merger: CaveatMerger) -> Self {
        self.merger = Some(merger);
        self
    }

    /// Run the validator, if any
    pub fn validate(&self, caveat: &Caveat) -> Result<()> {
        match &self.validator {
            Some(validator) => validator(caveat),
            None => Ok(()),
        }
    }

    /// Run the merger, if any
    pub fn merge(&self, left: &Value, right: &Value) -> Option<Result<Value>> {
        self.merger.as_ref().map(|merger| merger(left, right))
    }
}

impl fmt::Debug for CaveatSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaveatSpecification")
            .field("caveat_type", &self.caveat_type)
            .field("validator", &self.validator.is_some())
            .field("merger", &self.merger.is_some())
            .finish()
    }
}

/// Permission specification entry
#[derive(Clone)]
pub struct PermissionSpecification {
    /// Permission kind
    pub permission_type: PermissionType,
    /// Permission target name
    pub target_name: &'static str,
    /// Caveat types the permission accepts
    pub allowed_caveats: Vec<&'static str>,
    /// Builds the permission from request options
    pub factory: PermissionFactory,
}

impl PermissionSpecification {
    /// Build a permission through the factory
    pub fn build(&self, options: PermissionOptions) -> Result<Permission> {
        (self.factory)(options)
    }
}

impl fmt::Debug for PermissionSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionSpecification")
            .field("permission_type", &self.permission_type)
            .field("target_name", &self.target_name)
            .field("allowed_caveats", &self.allowed_caveats)
            .finish()
    }
}

/// Wallet lookups the CAIP-25 caveat validator depends on
#[derive(Clone)]
pub struct CaveatSpecificationHooks {
    /// Lists internal accounts
    pub list_accounts: ListAccountsFn,
    /// Resolves chain IDs to network clients
    pub find_network_client_id_by_chain_id: FindNetworkClientIdFn,
}

/// Build the caveat specification map.
///
/// The CAIP-25 entry is registered first; `snap_specifications` are added
/// after it and may not reuse a type name already present.
pub fn get_caveat_specifications<I>(
    hooks: &CaveatSpecificationHooks,
    snap_specifications: I,
) -> Result<BTreeMap<String, CaveatSpecification>>
where
    I: IntoIterator<Item = CaveatSpecification>,
{
    let mut specifications = BTreeMap::new();
    specifications.insert(CaveatTypes::CAIP25.to_string(), caip25_caveat_specification(hooks));

    for spec in snap_specifications {
        if specifications.contains_key(&spec.caveat_type) {
            return Err(Error::DuplicateCaveatSpecification(spec.caveat_type));
        }
        specifications.insert(spec.caveat_type.clone(), spec);
    }

    debug!(count = specifications.len(), "Built caveat specifications");
    Ok(specifications)
}

/// Build the permission specification map: the CAIP-25 endowment only
pub fn get_permission_specifications() -> BTreeMap<String, PermissionSpecification> {
    let mut specifications = BTreeMap::new();
    specifications.insert(
        PermissionNames::CAIP25.to_string(),
        PermissionSpecification {
            permission_type: PermissionType::Endowment,
            target_name: PermissionNames::CAIP25,
            allowed_caveats: vec![CaveatTypes::CAIP25],
            factory: Arc::new(build_caip25_permission),
        },
    );
    specifications
}

fn caip25_caveat_specification(hooks: &CaveatSpecificationHooks) -> CaveatSpecification {
    let hooks = hooks.clone();
    CaveatSpecification::new(CaveatTypes::CAIP25)
        .with_validator(Arc::new(move |caveat: &Caveat| {
            validate_caip25_caveat(caveat, &hooks)
        }))
        .with_merger(Arc::new(merge_caip25_caveat_values))
}

fn decode_caip25_value(value: &Value) -> Result<Caip25CaveatValue> {
    serde_json::from_value(value.clone()).map_err(|e| {
        Error::InvalidCaveat(format!("{} value is malformed: {}", CaveatTypes::CAIP25, e))
    })
}

fn validate_caip25_caveat(caveat: &Caveat, hooks: &CaveatSpecificationHooks) -> Result<()> {
    if caveat.caveat_type != CaveatTypes::CAIP25 {
        return Err(Error::InvalidCaveat(format!(
            "expected caveat of type {}, got {}",
            CaveatTypes::CAIP25,
            caveat.caveat_type
        )));
    }

    let value = decode_caip25_value(&caveat.value)?;
    if value.is_empty() {
        return Err(Error::InvalidCaveat(format!(
            "{} value must contain at least one scope",
            CaveatTypes::CAIP25
        )));
    }

    for (key, scope_object) in value.scopes() {
        let scope = Scope::parse(key)?;
        for account in &scope_object.accounts {
            let parsed = Caip10Account::parse(account)?;
            if parsed.scope != scope {
                return Err(Error::InvalidScope(format!(
                    "account {} does not belong to scope {}",
                    account, key
                )));
            }
        }
    }

    let accounts = get_eth_accounts(&value);
    if !accounts.is_empty() {
        validate_caveat_accounts(&Value::from(accounts), || (hooks.list_accounts)())?;
    }

    let chain_ids = get_permitted_eth_chain_ids(&value);
    if !chain_ids.is_empty() {
        validate_caveat_networks(&Value::from(chain_ids), |chain_id| {
            (hooks.find_network_client_id_by_chain_id)(chain_id)
        })?;
    }

    Ok(())
}

fn merge_caip25_caveat_values(left: &Value, right: &Value) -> Result<Value> {
    let merged = merge_caip25_values(&decode_caip25_value(left)?, &decode_caip25_value(right)?);
    Ok(serde_json::to_value(merged)?)
}

fn build_caip25_permission(options: PermissionOptions) -> Result<Permission> {
    let caveat = match options.caveats.as_slice() {
        [caveat] if caveat.caveat_type == CaveatTypes::CAIP25 => caveat,
        _ => {
            return Err(Error::InvalidCaveat(format!(
                "{} requires exactly one {} caveat",
                PermissionNames::CAIP25,
                CaveatTypes::CAIP25
            )))
        }
    };
    decode_caip25_value(&caveat.value)?;

    Ok(Permission {
        parent_capability: PermissionNames::CAIP25.to_string(),
        invoker: options.invoker,
        caveats: options.caveats,
    })
}
