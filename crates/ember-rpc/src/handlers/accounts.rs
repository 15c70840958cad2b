//! `eth_accounts`

use crate::error::RpcError;
use crate::hooks::AccountHooks;

/// Method name
pub const METHOD: &str = "eth_accounts";

/// Accounts `origin` may currently see. Never prompts; a locked wallet or
/// an origin without permission yields an empty list.
pub async fn eth_accounts(origin: &str, hooks: &dyn AccountHooks) -> Result<Vec<String>, RpcError> {
    hooks.get_accounts(origin, false).await
}
