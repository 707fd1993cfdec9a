//! Shared data structures used throughout the application.

use ethers::types::{Address, Bytes, I256, TxHash, U256};

/// Identity of a pool: its token pair, fee tier, tick spacing and hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolKey {
    pub currency0: Address,
    pub currency1: Address,
    /// LP fee in hundredths of a bip (3000 = 0.30%).
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
}

/// Direction, size and price bound of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapParams {
    pub zero_for_one: bool,
    pub amount_specified: I256,
    pub sqrt_price_limit_x96: U256,
}

/// How the router settles the swap deltas with the pool manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementFlags {
    pub take_claims: bool,
    pub settle_using_burn: bool,
}

/// Everything the swap router needs for a single swap call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub key: PoolKey,
    pub params: SwapParams,
    pub settlement: SettlementFlags,
    /// ABI-encoded caller address, forwarded to the reward hook.
    pub hook_data: Bytes,
}

impl SwapRequest {
    /// Token spent by this request.
    pub fn input_token(&self) -> Address {
        if self.params.zero_for_one {
            self.key.currency0
        } else {
            self.key.currency1
        }
    }
}

/// Balances observed right after a confirmed swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    pub token0_balance: U256,
    pub token1_balance: U256,
    pub points_balance: U256,
    pub approve_tx: TxHash,
    pub swap_tx: TxHash,
}

/// What happened to a swap attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Completed(SwapResult),
    /// The client has not been initialized; nothing was sent.
    NotReady,
    /// Another swap on the same client has not finished yet; nothing was sent.
    InFlight,
}

/// Fixed identity established by a successful initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub account: Address,
    pub points_token: Address,
}
