//! Wallet hooks consumed by the account handlers

use crate::error::RpcError;
use async_trait::async_trait;
use ember_permissions::Caip25CaveatValue;

/// Hooks into the wallet controllers needed to answer account requests.
///
/// Errors returned by a hook reach the dApp unchanged.
#[async_trait]
pub trait AccountHooks: Send + Sync {
    /// Accounts `origin` is permitted to see, most recently selected first.
    ///
    /// With `ignore_lock` unset, a locked wallet reports no accounts.
    async fn get_accounts(&self, origin: &str, ignore_lock: bool) -> Result<Vec<String>, RpcError>;

    /// Resolve once the wallet is unlocked, optionally prompting the user
    async fn wait_for_unlock(&self, show_unlock_request: bool) -> Result<(), RpcError>;

    /// Ask the user to approve a CAIP-25 authorization for `origin`
    async fn request_caip25_approval(&self, origin: &str) -> Result<Caip25CaveatValue, RpcError>;

    /// Grant the approved CAIP-25 value to `origin`
    async fn grant_permissions(
        &self,
        origin: &str,
        approval: Caip25CaveatValue,
    ) -> Result<(), RpcError>;
}
