//! Error types

/// Permission and caveat errors
///
/// Validation messages carry the permission name as a prefix so the RPC
/// layer can serialize them without further context.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Accounts value is not a non-empty array of strings
    #[error("{permission} error: Expected non-empty array of Ethereum addresses.")]
    InvalidAccounts {
        /// Permission the value was validated for
        permission: &'static str,
    },

    /// Address is not one of the wallet's internal accounts
    #[error("{permission} error: Received unrecognized address: \"{address}\".")]
    UnrecognizedAddress {
        /// Permission the value was validated for
        permission: &'static str,
        /// The offending address, as received
        address: String,
    },

    /// Chain ID value is not a non-empty array
    #[error("{permission} error: Expected non-empty array of chainIds.")]
    InvalidChainIds {
        /// Permission the value was validated for
        permission: &'static str,
    },

    /// No network client is configured for the chain ID
    #[error(
        "{permission} error: Received unrecognized chainId: \"{chain_id}\". Please try adding the network first via wallet_addEthereumChain."
    )]
    UnrecognizedChainId {
        /// Permission the value was validated for
        permission: &'static str,
        /// The offending chain ID
        chain_id: String,
    },

    /// Malformed hex or decimal chain ID
    #[error("Invalid chain ID: {0}")]
    InvalidChainId(String),

    /// Malformed CAIP-2 scope or CAIP-10 account
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// Caveat has the wrong type or an undecodable value
    #[error("Invalid caveat: {0}")]
    InvalidCaveat(String),

    /// Two caveat specifications share a type name
    #[error("Duplicate caveat specification: {0}")]
    DuplicateCaveatSpecification(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check whether this error came from validating caller-supplied input
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAccounts { .. }
                | Error::UnrecognizedAddress { .. }
                | Error::InvalidChainIds { .. }
                | Error::UnrecognizedChainId { .. }
                | Error::InvalidChainId(_)
                | Error::InvalidScope(_)
                | Error::InvalidCaveat(_)
        )
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
