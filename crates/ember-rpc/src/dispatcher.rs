//! Request dispatch
//!
//! The dispatcher owns the origin locks and routes each admitted request to
//! its handler. Methods without a local handler go to the next middleware.

use crate::error::RpcError;
use crate::gate::MethodGate;
use crate::handlers::{accounts, eth_accounts, request_accounts, request_ethereum_accounts};
use crate::hooks::AccountHooks;
use crate::locks::OriginLocks;
use crate::request::{Id, Request, Response, JSONRPC_VERSION};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Downstream middleware for methods not handled here
#[async_trait]
pub trait Next: Send + Sync {
    /// Handle `request`
    async fn handle(&self, request: &Request) -> Result<Value, RpcError>;
}

/// Terminal middleware: nothing further down the stack
#[derive(Debug, Default, Clone, Copy)]
pub struct EndOfStack;

#[async_trait]
impl Next for EndOfStack {
    async fn handle(&self, request: &Request) -> Result<Value, RpcError> {
        Err(RpcError::method_not_found(&request.method))
    }
}

/// Routes requests to account handlers
pub struct RpcDispatcher {
    hooks: Arc<dyn AccountHooks>,
    locks: OriginLocks,
    gate: MethodGate,
    next: Arc<dyn Next>,
}

impl RpcDispatcher {
    /// Create a dispatcher with the default gate and no downstream middleware
    pub fn new(hooks: Arc<dyn AccountHooks>) -> Self {
        Self {
            hooks,
            locks: OriginLocks::new(),
            gate: MethodGate::default(),
            next: Arc::new(EndOfStack),
        }
    }

    /// Replace the method gate
    pub fn with_gate(mut self, gate: MethodGate) -> Self {
        self.gate = gate;
        self
    }

    /// Set the downstream middleware
    pub fn with_next(mut self, next: Arc<dyn Next>) -> Self {
        self.next = next;
        self
    }

    /// Origin locks held by this dispatcher
    pub fn locks(&self) -> &OriginLocks {
        &self.locks
    }

    /// Handle one request
    pub async fn handle(&self, request: Request) -> Response {
        let result = self.dispatch(&request).await;

        if let Err(e) = &result {
            warn!(
                origin = %request.origin,
                method = %request.method,
                code = e.code.code(),
                error = %e.message,
                "Request failed"
            );
        }

        Response::from_result(request.id, result)
    }

    /// Handle one request given as raw JSON text.
    ///
    /// Text that is not JSON yields a parse error; JSON that is not a
    /// request yields an invalid-request error carrying the request ID when
    /// one can be read.
    pub async fn handle_json(&self, raw: &str) -> Response {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable request");
                return Response::failure(Id::Null, RpcError::parse_error(e.to_string()));
            }
        };

        match serde_json::from_value::<Request>(value.clone()) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                let id = value
                    .get("id")
                    .and_then(|id| serde_json::from_value(id.clone()).ok())
                    .unwrap_or(Id::Null);
                warn!(error = %e, "Malformed request");
                Response::failure(id, RpcError::invalid_request(e.to_string()))
            }
        }
    }

    async fn dispatch(&self, request: &Request) -> Result<Value, RpcError> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(RpcError::invalid_request(format!(
                "Unsupported jsonrpc version: {}",
                request.jsonrpc
            )));
        }
        if request.origin.is_empty() {
            return Err(RpcError::invalid_request("Request is missing an origin"));
        }

        let access = self.gate.check(&request.method)?;
        debug!(origin = %request.origin, method = %request.method, ?access, "Dispatching request");

        match request.method.as_str() {
            request_accounts::METHOD => {
                request_ethereum_accounts(&request.origin, &self.locks, self.hooks.as_ref())
                    .await
                    .map(Value::from)
            }
            accounts::METHOD => eth_accounts(&request.origin, self.hooks.as_ref())
                .await
                .map(Value::from),
            _ => self.next.handle(request).await,
        }
    }
}
