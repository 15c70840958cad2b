//! Hex / decimal chain ID conversion

use crate::{Error, Result};

/// Parse a `0x`-prefixed hex chain ID into its numeric value.
///
/// Leading zeros are rejected so that every chain has exactly one hex form.
pub fn hex_chain_id_to_decimal(chain_id: &str) -> Result<u64> {
    let digits = chain_id
        .strip_prefix("0x")
        .ok_or_else(|| Error::InvalidChainId(format!("expected 0x prefix: {}", chain_id)))?;

    if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
        return Err(Error::InvalidChainId(chain_id.to_string()));
    }

    u64::from_str_radix(digits, 16).map_err(|_| Error::InvalidChainId(chain_id.to_string()))
}

/// Format a numeric chain ID as lower-case `0x` hex.
pub fn decimal_to_hex_chain_id(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}
