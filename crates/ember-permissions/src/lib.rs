//! Permission and caveat specifications for the Ember wallet extension
//!
//! This crate describes the permissions a dApp origin can hold and the
//! caveats that restrict them. The permission controller that stores and
//! enforces grants lives outside this workspace; it consumes the
//! specification maps built here.
//!
//! ## Contents
//!
//! - **CAIP-25 values**: the multichain authorization shape, plus helpers to
//!   read, rewrite and merge the Ethereum accounts and chains it covers
//! - **Validators**: account and network checks used by the caveat validator
//! - **Specification registry**: caveat and permission specification maps
//! - **Unrestricted methods**: RPC methods that bypass permission checks

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod caip25;
pub mod chain;
pub mod error;
pub mod methods;
pub mod names;
pub mod specifications;
pub mod validators;

pub use caip25::{
    build_caip25_value, get_eth_accounts, get_permitted_eth_chain_ids, merge_caip25_values,
    set_eth_accounts, set_permitted_eth_chain_ids, Caip10Account, Caip25CaveatValue, Scope,
    ScopeObject,
};
pub use chain::{decimal_to_hex_chain_id, hex_chain_id_to_decimal};
pub use error::{Error, Result};
pub use methods::{
    is_unrestricted_eth_signing_method, is_unrestricted_method, UNRESTRICTED_ETH_SIGNING_METHODS,
    UNRESTRICTED_METHODS,
};
pub use names::{CaveatTypes, PermissionNames};
pub use specifications::{
    get_caveat_specifications, get_permission_specifications, Caveat, CaveatMerger,
    CaveatSpecification, CaveatSpecificationHooks, CaveatValidator, FindNetworkClientIdFn,
    ListAccountsFn, Permission, PermissionFactory, PermissionOptions, PermissionSpecification,
    PermissionType,
};
pub use validators::{validate_caveat_accounts, validate_caveat_networks, InternalAccount};
