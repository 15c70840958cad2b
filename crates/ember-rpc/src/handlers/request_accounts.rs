//! `eth_requestAccounts`

use crate::error::RpcError;
use crate::hooks::AccountHooks;
use crate::locks::OriginLocks;
use tracing::{debug, info, warn};

/// Method name
pub const METHOD: &str = "eth_requestAccounts";

/// Return the accounts `origin` may use, asking the user for a CAIP-25
/// grant when it has none.
///
/// At most one call per origin runs at a time; a concurrent call fails
/// immediately with a resource-unavailable error and touches no hooks. The
/// origin lock is released on every exit path, including cancellation.
pub async fn request_ethereum_accounts(
    origin: &str,
    locks: &OriginLocks,
    hooks: &dyn AccountHooks,
) -> Result<Vec<String>, RpcError> {
    let Some(_guard) = locks.try_acquire(origin) else {
        warn!(origin = %origin, method = METHOD, "Rejected duplicate account request");
        return Err(RpcError::resource_unavailable(format!(
            "Already processing {}. Please wait.",
            METHOD
        )));
    };

    let accounts = hooks.get_accounts(origin, true).await?;
    if !accounts.is_empty() {
        // Already permitted: only the unlock stands between the dApp and
        // its accounts.
        debug!(origin = %origin, count = accounts.len(), "Origin already permitted");
        hooks.wait_for_unlock(true).await?;
        return Ok(accounts);
    }

    let approval = hooks.request_caip25_approval(origin).await?;
    hooks.grant_permissions(origin, approval).await?;
    info!(origin = %origin, event = "permissions_granted", "Granted CAIP-25 permission");

    // Order comes from the accounts hook, not from the approval.
    hooks.get_accounts(origin, true).await
}
