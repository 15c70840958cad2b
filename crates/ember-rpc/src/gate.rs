//! Method admission
//!
//! A method is served when it is on the unrestricted list or registered as
//! restricted by a permission. Anything else is answered with "method not
//! found".

use crate::error::RpcError;
use ember_permissions::{is_unrestricted_method, PermissionNames};
use std::collections::HashMap;

/// How a method is admitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodAccess {
    /// Exempt from permission checks
    Unrestricted,
    /// Guarded by the named permission
    Restricted {
        /// Permission target name
        permission: String,
    },
}

/// Classifies incoming method names
#[derive(Debug, Clone)]
pub struct MethodGate {
    restricted: HashMap<String, String>,
}

impl MethodGate {
    /// Gate with no restricted methods registered
    pub fn empty() -> Self {
        Self {
            restricted: HashMap::new(),
        }
    }

    /// Register `method` as guarded by `permission`
    pub fn with_restricted(
        mut self,
        method: impl Into<String>,
        permission: impl Into<String>,
    ) -> Self {
        self.restricted.insert(method.into(), permission.into());
        self
    }

    /// Classify `method`, or `None` if it is unknown
    pub fn classify(&self, method: &str) -> Option<MethodAccess> {
        if is_unrestricted_method(method) {
            return Some(MethodAccess::Unrestricted);
        }
        self.restricted
            .get(method)
            .map(|permission| MethodAccess::Restricted {
                permission: permission.clone(),
            })
    }

    /// Classify `method`, failing with "method not found" if it is unknown
    pub fn check(&self, method: &str) -> Result<MethodAccess, RpcError> {
        self.classify(method)
            .ok_or_else(|| RpcError::method_not_found(method))
    }
}

impl Default for MethodGate {
    fn default() -> Self {
        Self::empty().with_restricted(crate::handlers::accounts::METHOD, PermissionNames::CAIP25)
    }
}
