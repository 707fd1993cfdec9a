use crate::config::ContractRegistry;
use crate::errors::Result;
use crate::models::{PoolKey, SettlementFlags, SwapParams, SwapRequest};
use crate::utils::signed_amount;
use ethers::abi::{Token, encode};
use ethers::types::{Address, Bytes, I256, U256};

/// LP fee tier of the reward pool (0.30%).
pub const POOL_FEE: u32 = 3000;
pub const POOL_TICK_SPACING: i32 = 60;

/// `MIN_SQRT_PRICE + 1` (4295128740), the loosest limit for a zero-for-one swap.
pub const MIN_PRICE_LIMIT: U256 = U256([4_295_128_740, 0, 0, 0]);
/// `MAX_SQRT_PRICE - 1`, the loosest limit for a one-for-zero swap.
/// 1461446703485210103287273052203988822378723970341 as little-endian limbs.
pub const MAX_PRICE_LIMIT: U256 = U256([0x5d95_1d52_6398_8d25, 0xefd1_fc6a_5064_8849, 0xfffd_8963, 0]);

/// Pool the client swaps through.
pub fn pool_key(contracts: &ContractRegistry) -> PoolKey {
    PoolKey {
        currency0: contracts.token0,
        currency1: contracts.token1,
        fee: POOL_FEE,
        tick_spacing: POOL_TICK_SPACING,
        hooks: contracts.reward_hook,
    }
}

/// sqrtPriceX96 limit that lets the swap run through the whole range.
pub fn price_limit(zero_for_one: bool) -> U256 {
    if zero_for_one {
        MIN_PRICE_LIMIT
    } else {
        MAX_PRICE_LIMIT
    }
}

/// `abi.encode(account)`: the reward hook reads the beneficiary from here.
pub fn encode_hook_data(account: Address) -> Bytes {
    Bytes::from(encode(&[Token::Address(account)]))
}

/// Token0-for-token1 swap of `amount_in` on behalf of `account`.
pub fn build_swap_request(
    contracts: &ContractRegistry,
    amount_in: U256,
    account: Address,
) -> Result<SwapRequest> {
    let zero_for_one = true;
    Ok(SwapRequest {
        key: pool_key(contracts),
        params: SwapParams {
            zero_for_one,
            amount_specified: signed_amount(amount_in)?,
            sqrt_price_limit_x96: price_limit(zero_for_one),
        },
        settlement: SettlementFlags::default(),
        hook_data: encode_hook_data(account),
    })
}

impl From<PoolKey> for (Address, Address, u32, i32, Address) {
    fn from(key: PoolKey) -> Self {
        (
            key.currency0,
            key.currency1,
            key.fee,
            key.tick_spacing,
            key.hooks,
        )
    }
}

impl From<SwapParams> for (bool, I256, U256) {
    fn from(params: SwapParams) -> Self {
        (
            params.zero_for_one,
            params.amount_specified,
            params.sqrt_price_limit_x96,
        )
    }
}

impl From<SettlementFlags> for (bool, bool) {
    fn from(flags: SettlementFlags) -> Self {
        (flags.take_claims, flags.settle_using_burn)
    }
}
