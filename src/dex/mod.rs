//! Ledger integration for the reward-hook pool.
//!
//! [`Ledger`] is the only way the rest of the crate touches the node, so
//! the orchestration in [`crate::swap_client`] can run against
//! [`EthersLedger`] in production and an in-memory ledger in tests.

use crate::errors::Result;
use crate::models::SwapRequest;
use ethers::types::{Address, TxHash, U256};
use std::future::Future;

pub mod bindings;
pub mod client;
pub mod request;

pub use client::{EthersLedger, SignerClient};
pub use request::{build_swap_request, encode_hook_data, price_limit};

/// Remote calls the swap client issues, each awaited to completion.
pub trait Ledger: Send + Sync {
    /// Address of the signing identity.
    fn account(&self) -> Address;

    /// Reward token the hook mints; the zero address when unset.
    fn reward_token(&self) -> impl Future<Output = Result<Address>> + Send;

    fn balance_of(
        &self,
        token: Address,
        owner: Address,
    ) -> impl Future<Output = Result<U256>> + Send;

    /// Let the swap router spend `amount` of `token`; resolves once confirmed.
    fn approve_router(
        &self,
        token: Address,
        amount: U256,
    ) -> impl Future<Output = Result<TxHash>> + Send;

    /// Submit the swap through the router; resolves once confirmed.
    fn swap(&self, request: &SwapRequest) -> impl Future<Output = Result<TxHash>> + Send;
}
