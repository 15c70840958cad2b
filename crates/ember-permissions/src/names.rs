//! Permission and caveat name constants

/// Permission target names
pub struct PermissionNames;

impl PermissionNames {
    /// Multichain (CAIP-25) endowment permission
    pub const CAIP25: &'static str = "endowment:caip25";
    /// Legacy account permission, superseded by [`PermissionNames::CAIP25`]
    pub const ETH_ACCOUNTS: &'static str = "eth_accounts";
    /// Legacy chain permission, superseded by [`PermissionNames::CAIP25`]
    pub const PERMITTED_CHAINS: &'static str = "endowment:permitted-chains";
}

/// Caveat type names
pub struct CaveatTypes;

impl CaveatTypes {
    /// Caveat carrying a [`crate::Caip25CaveatValue`]
    pub const CAIP25: &'static str = "authorizedScopes";
    /// Legacy caveat listing permitted addresses
    pub const RESTRICT_RETURNED_ACCOUNTS: &'static str = "restrictReturnedAccounts";
    /// Legacy caveat listing permitted hex chain IDs
    pub const RESTRICT_NETWORK_SWITCHING: &'static str = "restrictNetworkSwitching";
}
