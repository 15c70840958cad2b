//! RPC methods that bypass permission checks
//!
//! Any method outside these lists that is not backed by a restricted
//! permission is answered with "method not found". Membership is an exact
//! string match.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const UNRESTRICTED_METHOD_NAMES: &[&str] = &[
    "eth_blockNumber",
    "eth_call",
    "eth_chainId",
    "eth_coinbase",
    "eth_decrypt",
    "eth_estimateGas",
    "eth_feeHistory",
    "eth_gasPrice",
    "eth_getBalance",
    "eth_getBlockByHash",
    "eth_getBlockByNumber",
    "eth_getBlockTransactionCountByHash",
    "eth_getBlockTransactionCountByNumber",
    "eth_getCode",
    "eth_getEncryptionPublicKey",
    "eth_getFilterChanges",
    "eth_getFilterLogs",
    "eth_getLogs",
    "eth_getProof",
    "eth_getStorageAt",
    "eth_getTransactionByBlockHashAndIndex",
    "eth_getTransactionByBlockNumberAndIndex",
    "eth_getTransactionByHash",
    "eth_getTransactionCount",
    "eth_getTransactionReceipt",
    "eth_getUncleByBlockHashAndIndex",
    "eth_getUncleByBlockNumberAndIndex",
    "eth_getUncleCountByBlockHash",
    "eth_getUncleCountByBlockNumber",
    "eth_getWork",
    "eth_hashrate",
    "eth_mining",
    "eth_newBlockFilter",
    "eth_newFilter",
    "eth_newPendingTransactionFilter",
    "eth_protocolVersion",
    "eth_requestAccounts",
    "eth_sendRawTransaction",
    "eth_sendTransaction",
    "eth_signTypedData",
    "eth_signTypedData_v1",
    "eth_signTypedData_v3",
    "eth_signTypedData_v4",
    "eth_submitHashrate",
    "eth_submitWork",
    "eth_subscribe",
    "eth_syncing",
    "eth_uninstallFilter",
    "eth_unsubscribe",
    "net_listening",
    "net_peerCount",
    "net_version",
    "personal_ecRecover",
    "personal_sign",
    "wallet_addEthereumChain",
    "wallet_getCallsStatus",
    "wallet_getCapabilities",
    "wallet_getPermissions",
    "wallet_registerOnboarding",
    "wallet_requestPermissions",
    "wallet_revokePermissions",
    "wallet_sendCalls",
    "wallet_switchEthereumChain",
    "wallet_watchAsset",
    "web3_clientVersion",
    "web3_sha3",
];

const UNRESTRICTED_ETH_SIGNING_METHOD_NAMES: &[&str] = &[
    "eth_sendTransaction",
    "eth_signTypedData",
    "eth_signTypedData_v1",
    "eth_signTypedData_v3",
    "eth_signTypedData_v4",
    "personal_sign",
];

/// Methods answered without consulting the permission system
pub static UNRESTRICTED_METHODS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| UNRESTRICTED_METHOD_NAMES.iter().copied().collect());

/// Signing methods that need an account but no method permission
pub static UNRESTRICTED_ETH_SIGNING_METHODS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| UNRESTRICTED_ETH_SIGNING_METHOD_NAMES.iter().copied().collect());

/// Check whether `method` bypasses permission checks
pub fn is_unrestricted_method(method: &str) -> bool {
    UNRESTRICTED_METHODS.contains(method)
}

/// Check whether `method` is an unrestricted signing method
pub fn is_unrestricted_eth_signing_method(method: &str) -> bool {
    UNRESTRICTED_ETH_SIGNING_METHODS.contains(method)
}
