//! Admission and approval flow tests for `eth_requestAccounts`

use async_trait::async_trait;
use ember_permissions::{build_caip25_value, get_eth_accounts, Caip25CaveatValue};
use ember_rpc::{
    request_ethereum_accounts, AccountHooks, ErrorCode, Id, Next, OriginLocks, Request,
    RpcDispatcher, RpcError,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

const ORIGIN: &str = "https://dapp.example";
const ACCOUNT: &str = "0x5cfe73b6021e818b776b421b1c4db2474086a7e1";

/// Scriptable wallet hooks
struct MockHooks {
    accounts: Mutex<Vec<String>>,
    wallet_locked: bool,
    block_unlock: bool,
    block_approval: bool,
    release: Semaphore,
    entered: Notify,
    unlock_result: Mutex<Result<(), RpcError>>,
    approval_result: Mutex<Result<Caip25CaveatValue, RpcError>>,
    grant_result: Mutex<Result<(), RpcError>>,
    get_accounts_calls: AtomicUsize,
    unlock_calls: AtomicUsize,
    approval_calls: AtomicUsize,
    granted: Mutex<Vec<Caip25CaveatValue>>,
}

impl MockHooks {
    fn new(accounts: &[&str]) -> Self {
        let approval = build_caip25_value(&[ACCOUNT.to_string()], &["0x1".to_string()]).unwrap();
        Self {
            accounts: Mutex::new(accounts.iter().map(|s| s.to_string()).collect()),
            wallet_locked: false,
            block_unlock: false,
            block_approval: false,
            release: Semaphore::new(0),
            entered: Notify::new(),
            unlock_result: Mutex::new(Ok(())),
            approval_result: Mutex::new(Ok(approval)),
            grant_result: Mutex::new(Ok(())),
            get_accounts_calls: AtomicUsize::new(0),
            unlock_calls: AtomicUsize::new(0),
            approval_calls: AtomicUsize::new(0),
            granted: Mutex::new(Vec::new()),
        }
    }

    async fn park(&self) {
        self.entered.notify_one();
        self.release.acquire().await.unwrap().forget();
    }
}

#[async_trait]
impl AccountHooks for MockHooks {
    async fn get_accounts(
        &self,
        _origin: &str,
        ignore_lock: bool,
    ) -> Result<Vec<String>, RpcError> {
        self.get_accounts_calls.fetch_add(1, Ordering::SeqCst);
        if self.wallet_locked && !ignore_lock {
            return Ok(Vec::new());
        }
        Ok(self.accounts.lock().clone())
    }

    async fn wait_for_unlock(&self, show_unlock_request: bool) -> Result<(), RpcError> {
        assert!(show_unlock_request);
        self.unlock_calls.fetch_add(1, Ordering::SeqCst);
        if self.block_unlock {
            self.park().await;
        }
        self.unlock_result.lock().clone()
    }

    async fn request_caip25_approval(&self, _origin: &str) -> Result<Caip25CaveatValue, RpcError> {
        self.approval_calls.fetch_add(1, Ordering::SeqCst);
        if self.block_approval {
            self.park().await;
        }
        self.approval_result.lock().clone()
    }

    async fn grant_permissions(
        &self,
        _origin: &str,
        approval: Caip25CaveatValue,
    ) -> Result<(), RpcError> {
        self.grant_result.lock().clone()?;
        *self.accounts.lock() = get_eth_accounts(&approval);
        self.granted.lock().push(approval);
        Ok(())
    }
}

fn spawn_request(
    locks: &OriginLocks,
    hooks: &Arc<MockHooks>,
) -> tokio::task::JoinHandle<Result<Vec<String>, RpcError>> {
    let locks = locks.clone();
    let hooks = Arc::clone(hooks);
    tokio::spawn(async move { request_ethereum_accounts(ORIGIN, &locks, hooks.as_ref()).await })
}

#[tokio::test]
async fn test_existing_accounts_wait_for_unlock() {
    let locks = OriginLocks::new();
    let hooks = MockHooks::new(&[ACCOUNT, "0x0c54fccd2e384b4bb6f2e405bf5cbc15a017aafb"]);

    let accounts = request_ethereum_accounts(ORIGIN, &locks, &hooks).await.unwrap();

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0], ACCOUNT);
    assert_eq!(hooks.unlock_calls.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.approval_calls.load(Ordering::SeqCst), 0);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_duplicate_rejected_while_unlock_pending() {
    let locks = OriginLocks::new();
    let mut hooks = MockHooks::new(&[ACCOUNT]);
    hooks.block_unlock = true;
    let hooks = Arc::new(hooks);

    let first = spawn_request(&locks, &hooks);
    hooks.entered.notified().await;

    let err = request_ethereum_accounts(ORIGIN, &locks, hooks.as_ref())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceUnavailable);
    assert_eq!(err.message, "Already processing eth_requestAccounts. Please wait.");
    assert_eq!(hooks.unlock_calls.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.get_accounts_calls.load(Ordering::SeqCst), 1);

    hooks.release.add_permits(1);
    assert_eq!(first.await.unwrap().unwrap(), vec![ACCOUNT.to_string()]);
    assert!(!locks.is_locked(ORIGIN));
}

#[tokio::test]
async fn test_duplicate_rejected_while_approval_pending() {
    let locks = OriginLocks::new();
    let mut hooks = MockHooks::new(&[]);
    hooks.block_approval = true;
    let hooks = Arc::new(hooks);

    let first = spawn_request(&locks, &hooks);
    hooks.entered.notified().await;

    let err = request_ethereum_accounts(ORIGIN, &locks, hooks.as_ref())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceUnavailable);
    assert_eq!(hooks.approval_calls.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.unlock_calls.load(Ordering::SeqCst), 0);

    hooks.release.add_permits(1);
    assert_eq!(first.await.unwrap().unwrap(), vec![ACCOUNT.to_string()]);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_other_origins_not_blocked() {
    let locks = OriginLocks::new();
    let mut hooks = MockHooks::new(&[ACCOUNT]);
    hooks.block_unlock = true;
    let hooks = Arc::new(hooks);

    let first = spawn_request(&locks, &hooks);
    hooks.entered.notified().await;

    let other = tokio::spawn({
        let locks = locks.clone();
        let hooks = Arc::clone(&hooks);
        async move {
            request_ethereum_accounts("https://other.example", &locks, hooks.as_ref()).await
        }
    });
    hooks.entered.notified().await;
    assert_eq!(locks.len(), 2);

    hooks.release.add_permits(2);
    assert!(first.await.unwrap().is_ok());
    assert!(other.await.unwrap().is_ok());
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_grants_approval_and_refetches_accounts() {
    let locks = OriginLocks::new();
    let hooks = MockHooks::new(&[]);
    let expected = hooks.approval_result.lock().clone().unwrap();

    let accounts = request_ethereum_accounts(ORIGIN, &locks, &hooks).await.unwrap();

    assert_eq!(accounts, vec![ACCOUNT.to_string()]);
    assert_eq!(hooks.approval_calls.load(Ordering::SeqCst), 1);
    assert_eq!(*hooks.granted.lock(), vec![expected]);
    assert_eq!(hooks.get_accounts_calls.load(Ordering::SeqCst), 2);
    assert_eq!(hooks.unlock_calls.load(Ordering::SeqCst), 0);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_rejected_approval_propagates_without_grant() {
    let locks = OriginLocks::new();
    let hooks = MockHooks::new(&[]);
    *hooks.approval_result.lock() = Err(RpcError::user_rejected_request());

    let err = request_ethereum_accounts(ORIGIN, &locks, &hooks).await.unwrap_err();

    assert_eq!(err, RpcError::user_rejected_request());
    assert!(hooks.granted.lock().is_empty());
    assert!(locks.is_empty());

    // A stale lock would turn this into a resource-unavailable error.
    *hooks.approval_result.lock() =
        Ok(build_caip25_value(&[ACCOUNT.to_string()], &["0x1".to_string()]).unwrap());
    assert!(request_ethereum_accounts(ORIGIN, &locks, &hooks).await.is_ok());
}

#[tokio::test]
async fn test_unlock_failure_propagates() {
    let locks = OriginLocks::new();
    let hooks = MockHooks::new(&[ACCOUNT]);
    *hooks.unlock_result.lock() = Err(RpcError::user_rejected_request());

    let err = request_ethereum_accounts(ORIGIN, &locks, &hooks).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UserRejectedRequest);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_grant_failure_propagates_unwrapped() {
    let locks = OriginLocks::new();
    let hooks = MockHooks::new(&[]);
    let failure = RpcError::internal_error("permission controller unavailable");
    *hooks.grant_result.lock() = Err(failure.clone());

    let err = request_ethereum_accounts(ORIGIN, &locks, &hooks).await.unwrap_err();
    assert_eq!(err, failure);
    assert_eq!(hooks.get_accounts_calls.load(Ordering::SeqCst), 1);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_cancelled_request_releases_lock() {
    let locks = OriginLocks::new();
    let mut hooks = MockHooks::new(&[ACCOUNT]);
    hooks.block_unlock = true;

    let outcome = tokio::time::timeout(
        Duration::from_millis(20),
        request_ethereum_accounts(ORIGIN, &locks, &hooks),
    )
    .await;

    assert!(outcome.is_err());
    assert!(locks.is_empty());
}

// ============================================================================
// Dispatcher
// ============================================================================

struct ChainIdNext;

#[async_trait]
impl Next for ChainIdNext {
    async fn handle(&self, request: &Request) -> Result<Value, RpcError> {
        match request.method.as_str() {
            "eth_chainId" => Ok(json!("0x1")),
            other => Err(RpcError::method_not_found(other)),
        }
    }
}

#[tokio::test]
async fn test_dispatcher_routes_account_methods() {
    let hooks = Arc::new(MockHooks::new(&[]));
    let dispatcher = RpcDispatcher::new(hooks.clone());

    let response = dispatcher
        .handle(Request::new(Id::Number(1), "eth_accounts", ORIGIN))
        .await;
    assert_eq!(response.result, Some(json!([])));

    let response = dispatcher
        .handle(Request::new(Id::Number(2), "eth_requestAccounts", ORIGIN))
        .await;
    assert_eq!(response.id, Id::Number(2));
    assert_eq!(response.result, Some(json!([ACCOUNT])));
    assert!(dispatcher.locks().is_empty());

    let response = dispatcher
        .handle(Request::new(Id::Number(3), "eth_accounts", ORIGIN))
        .await;
    assert_eq!(response.result, Some(json!([ACCOUNT])));
}

#[tokio::test]
async fn test_dispatcher_eth_accounts_respects_wallet_lock() {
    let mut hooks = MockHooks::new(&[ACCOUNT]);
    hooks.wallet_locked = true;
    let dispatcher = RpcDispatcher::new(Arc::new(hooks));

    let response = dispatcher
        .handle(Request::new(Id::Number(1), "eth_accounts", ORIGIN))
        .await;
    assert_eq!(response.result, Some(json!([])));
}

#[tokio::test]
async fn test_dispatcher_rejects_unknown_and_malformed() {
    let dispatcher = RpcDispatcher::new(Arc::new(MockHooks::new(&[])))
        .with_next(Arc::new(ChainIdNext));

    let response = dispatcher
        .handle(Request::new(Id::Number(1), "eth_chainId", ORIGIN))
        .await;
    assert_eq!(response.result, Some(json!("0x1")));

    let response = dispatcher
        .handle(Request::new(Id::Number(2), "evm_mine", ORIGIN))
        .await;
    assert_eq!(response.error.unwrap().code, ErrorCode::MethodNotFound);

    let mut request = Request::new(Id::Number(3), "eth_chainId", ORIGIN);
    request.jsonrpc = "1.0".to_string();
    let response = dispatcher.handle(request).await;
    assert_eq!(response.error.unwrap().code, ErrorCode::InvalidRequest);

    let response = dispatcher
        .handle(Request::new(Id::Number(4), "eth_chainId", ""))
        .await;
    assert!(response.is_error());
}

#[tokio::test]
async fn test_dispatcher_without_next_reports_method_not_found() {
    let dispatcher = RpcDispatcher::new(Arc::new(MockHooks::new(&[])));
    let response = dispatcher
        .handle(Request::new(Id::String("x".to_string()), "eth_blockNumber", ORIGIN))
        .await;
    let error = response.error.unwrap();
    assert_eq!(error.code, ErrorCode::MethodNotFound);
    assert!(error.message.contains("eth_blockNumber"));
}

#[tokio::test]
async fn test_dispatcher_raw_json() {
    let dispatcher = RpcDispatcher::new(Arc::new(MockHooks::new(&[ACCOUNT])));

    let response = dispatcher.handle_json("{\"jsonrpc\": \"2.0\", \"id\": 1,").await;
    assert_eq!(response.id, Id::Null);
    assert_eq!(response.error.unwrap().code, ErrorCode::ParseError);

    let response = dispatcher.handle_json(r#"{"jsonrpc":"2.0","id":5,"origin":"x"}"#).await;
    assert_eq!(response.id, Id::Number(5));
    assert_eq!(response.error.unwrap().code, ErrorCode::InvalidRequest);

    let raw = json!({
        "jsonrpc": "2.0",
        "id": "a",
        "method": "eth_accounts",
        "origin": ORIGIN,
    })
    .to_string();
    let response = dispatcher.handle_json(&raw).await;
    assert_eq!(response.id, Id::String("a".to_string()));
    assert_eq!(response.result, Some(json!([ACCOUNT])));
}
