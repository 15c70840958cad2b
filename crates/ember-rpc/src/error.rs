//! JSON-RPC error bindings

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;

/// A JSON-RPC error returned to the dApp
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{}: {}", .code.message(), .message)]
pub struct RpcError {
    /// Error code
    pub code: ErrorCode,
    /// Error message
    pub message: Cow<'static, str>,
    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    /// New [`RpcError`] with the code's default message
    pub const fn new(code: ErrorCode) -> Self {
        Self {
            message: Cow::Borrowed(code.message()),
            code,
            data: None,
        }
    }

    /// New [`RpcError`] with a custom message
    pub fn with_message<M>(code: ErrorCode, message: M) -> Self
    where
        M: Into<String>,
    {
        Self {
            code,
            message: message.into().into(),
            data: None,
        }
    }

    /// `ParseError` error
    pub fn parse_error<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self::with_message(ErrorCode::ParseError, message)
    }

    /// `InvalidRequest` error
    pub fn invalid_request<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self::with_message(ErrorCode::InvalidRequest, message)
    }

    /// `MethodNotFound` error naming the method
    pub fn method_not_found(method: &str) -> Self {
        Self::with_message(
            ErrorCode::MethodNotFound,
            format!("The method \"{}\" does not exist / is not available.", method),
        )
    }

    /// `InvalidParams` error
    pub fn invalid_params<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self::with_message(ErrorCode::InvalidParams, message)
    }

    /// `InternalError` error
    pub fn internal_error<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self::with_message(ErrorCode::InternalError, message)
    }

    /// `ResourceUnavailable` error, used when a request cannot be admitted
    pub fn resource_unavailable<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self::with_message(ErrorCode::ResourceUnavailable, message)
    }

    /// The user declined an approval or unlock prompt
    pub const fn user_rejected_request() -> Self {
        Self::new(ErrorCode::UserRejectedRequest)
    }
}

impl From<ember_permissions::Error> for RpcError {
    fn from(err: ember_permissions::Error) -> Self {
        if err.is_validation_error() {
            Self::invalid_params(err.to_string())
        } else {
            Self::internal_error(err.to_string())
        }
    }
}

/// JSON-RPC and EIP-1193 provider error codes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received
    ParseError,
    /// The request object is not valid
    InvalidRequest,
    /// The method does not exist or is not available
    MethodNotFound,
    /// Invalid method parameters
    InvalidParams,
    /// Internal error
    InternalError,
    /// Requested resource not available
    ResourceUnavailable,
    /// The user rejected the request
    UserRejectedRequest,
    /// The requested method or account has not been authorized
    Unauthorized,
    /// Any other server error code
    ServerError(i64),
}

impl ErrorCode {
    /// Numeric code
    pub fn code(&self) -> i64 {
        match *self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ResourceUnavailable => -32002,
            Self::UserRejectedRequest => 4001,
            Self::Unauthorized => 4100,
            Self::ServerError(c) => c,
        }
    }

    /// Default message for the code
    pub const fn message(&self) -> &'static str {
        match *self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::ResourceUnavailable => "Resource unavailable",
            Self::UserRejectedRequest => "User rejected the request.",
            Self::Unauthorized => "Unauthorized",
            Self::ServerError(_) => "Server error",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'a> Deserialize<'a> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'a>,
    {
        i64::deserialize(deserializer).map(Into::into)
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            -32002 => Self::ResourceUnavailable,
            4001 => Self::UserRejectedRequest,
            4100 => Self::Unauthorized,
            _ => Self::ServerError(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ErrorCode::ResourceUnavailable.code(), -32002);
        assert_eq!(ErrorCode::from(-32002), ErrorCode::ResourceUnavailable);
        assert_eq!(ErrorCode::from(4001), ErrorCode::UserRejectedRequest);
        assert_eq!(ErrorCode::from(-32700), ErrorCode::ParseError);
        assert_eq!(ErrorCode::from(4100), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::Unauthorized.code(), 4100);
        assert_eq!(ErrorCode::from(-32099), ErrorCode::ServerError(-32099));
    }

    #[test]
    fn test_serialized_shape() {
        let message = "Already processing eth_requestAccounts. Please wait.";
        let err = RpcError::resource_unavailable(message);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], -32002);
        assert_eq!(json["message"], message);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_display() {
        let err = RpcError::method_not_found("eth_foo");
        assert_eq!(
            err.to_string(),
            "Method not found: The method \"eth_foo\" does not exist / is not available."
        );
    }

    #[test]
    fn test_from_permission_error() {
        let err: RpcError = ember_permissions::Error::InvalidChainIds {
            permission: "endowment:permitted-chains",
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidParams);
    }
}
