//! Method handlers

pub mod accounts;
pub mod request_accounts;

pub use accounts::eth_accounts;
pub use request_accounts::request_ethereum_accounts;
