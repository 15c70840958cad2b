//! Wallet environment used to validate caveats offline

use anyhow::Context;
use ember_permissions::{CaveatSpecificationHooks, InternalAccount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Accounts and networks known to the wallet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentConfig {
    /// Internal accounts
    pub accounts: Vec<InternalAccount>,
    /// Hex chain ID to network client ID
    pub network_client_ids: BTreeMap<String, String>,
}

impl EnvironmentConfig {
    /// Load from a JSON file
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading environment file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing environment file {}", path.display()))
    }

    /// Lookups backed by this environment
    pub fn hooks(&self) -> CaveatSpecificationHooks {
        let accounts = self.accounts.clone();
        let networks = self.network_client_ids.clone();

        CaveatSpecificationHooks {
            list_accounts: Arc::new(move || accounts.clone()),
            find_network_client_id_by_chain_id: Arc::new(move |chain_id: &str| {
                networks
                    .get(chain_id)
                    .cloned()
                    .ok_or_else(|| format!("No network client for chain {chain_id}"))
            }),
        }
    }
}
