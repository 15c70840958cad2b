//! JSON-RPC account handlers for the Ember wallet extension
//!
//! Answers `eth_requestAccounts` and `eth_accounts` for dApp origins,
//! delegating permission state, unlocking and approval prompts to
//! [`AccountHooks`] implemented by the wallet.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod hooks;
pub mod locks;
pub mod request;

pub use dispatcher::{EndOfStack, Next, RpcDispatcher};
pub use error::{ErrorCode, RpcError};
pub use gate::{MethodAccess, MethodGate};
pub use handlers::{eth_accounts, request_ethereum_accounts};
pub use hooks::AccountHooks;
pub use locks::{OriginLockGuard, OriginLocks};
pub use request::{Id, Request, Response, JSONRPC_VERSION};
