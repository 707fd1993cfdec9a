//! Miscellaneous helper utilities.

use crate::errors::{AppError, Result};
use ethers::types::{I256, U256};
use ethers::utils::{format_ether, parse_ether};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Parse a user-entered decimal token amount (18 decimals) into base units.
pub fn parse_amount(raw: &str) -> Result<U256> {
    let raw = raw.trim();
    if raw.starts_with('-') {
        return Err(AppError::InvalidAmount(format!("{raw}: amount must not be negative")));
    }
    let amount = parse_ether(raw).map_err(|e| AppError::InvalidAmount(format!("{raw}: {e}")))?;
    // Must also fit the signed `amountSpecified` slot of the swap.
    if amount.bit(255) {
        return Err(AppError::AmountOutOfRange(raw.to_string()));
    }
    Ok(amount)
}

/// Reinterpret a parsed amount as the signed value the router expects.
pub fn signed_amount(amount: U256) -> Result<I256> {
    if amount.bit(255) {
        return Err(AppError::AmountOutOfRange(amount.to_string()));
    }
    Ok(I256::from_raw(amount))
}

/// Render base units as a decimal token amount (18 decimals).
pub fn format_amount(amount: U256) -> String {
    format_ether(amount)
}
