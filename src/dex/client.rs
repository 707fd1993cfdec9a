use crate::config::{AppConfig, ContractRegistry};
use crate::dex::Ledger;
use crate::dex::bindings::{Erc20, RewardHook, SwapRouter};
use crate::errors::{AppError, Result};
use crate::models::SwapRequest;
use ethers::{
    contract::builders::ContractCall,
    middleware::SignerMiddleware,
    providers::{Http, JsonRpcClient, Middleware, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, TransactionReceipt, TxHash, U256, U64},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Provider wrapped with the local signing identity.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Handle on the ledger node with the pool contracts resolved.
#[derive(Clone)]
pub struct EthersLedger {
    client: Arc<SignerClient>,
    reward_hook: RewardHook<SignerClient>,
    swap_router: SwapRouter<SignerClient>,
    confirmations: usize,
}

impl EthersLedger {
    /// Connect to the node, derive the signer and bind the contracts.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let provider = Provider::new(Http::new(config.rpc_url.clone()))
            .interval(config.poll_interval);
        let chain_id = match config.chain_id {
            Some(id) => id,
            None => provider.get_chainid().await?.as_u64(),
        };
        let wallet: LocalWallet = config
            .private_key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()?
            .with_chain_id(chain_id);
        info!(
            rpc_url = %config.rpc_url,
            chain_id,
            account = ?wallet.address(),
            "[INIT] connected to ledger"
        );

        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let contracts = &config.contracts;
        Ok(Self {
            reward_hook: RewardHook::new(contracts.reward_hook, client.clone()),
            swap_router: SwapRouter::new(contracts.swap_router, client.clone()),
            client,
            confirmations: config.confirmations,
        })
    }

    /// Warn about registry entries with no deployed code behind them.
    ///
    /// Returns the labels of the empty entries; a registry recorded from a
    /// different deployment shows up here before any transaction is sent.
    pub async fn check_deployment(&self, contracts: &ContractRegistry) -> Result<Vec<&'static str>> {
        missing_deployments(self.client.provider(), contracts).await
    }

    /// Broadcast a state-changing call and wait until it is mined.
    async fn send_and_confirm<D>(&self, call: ContractCall<SignerClient, D>) -> Result<TxHash>
    where
        D: ethers::abi::Detokenize,
    {
        let pending = call.send().await?;
        await_receipt(pending, self.confirmations).await
    }
}

async fn missing_deployments<P: JsonRpcClient>(
    provider: &Provider<P>,
    contracts: &ContractRegistry,
) -> Result<Vec<&'static str>> {
    let mut missing = Vec::new();
    for (label, address) in contracts.entries() {
        let code = provider.get_code(address, None).await?;
        if code.as_ref().is_empty() {
            warn!(contract = label, ?address, "[INIT] no code deployed at address");
            missing.push(label);
        }
    }
    Ok(missing)
}

/// Wait for a broadcast transaction and map its receipt to a result.
async fn await_receipt<P: JsonRpcClient>(
    pending: PendingTransaction<'_, P>,
    confirmations: usize,
) -> Result<TxHash> {
    let tx_hash = *pending;
    debug!(?tx_hash, "[TX] submitted");
    let receipt: Option<TransactionReceipt> = pending.confirmations(confirmations).await?;
    match receipt {
        None => Err(AppError::Dropped(tx_hash)),
        Some(r) if r.status == Some(U64::zero()) => Err(AppError::Reverted(tx_hash)),
        Some(r) => {
            debug!(?tx_hash, block = ?r.block_number, gas_used = ?r.gas_used, "[TX] confirmed");
            Ok(tx_hash)
        }
    }
}

impl Ledger for EthersLedger {
    fn account(&self) -> Address {
        self.client.address()
    }

    async fn reward_token(&self) -> Result<Address> {
        Ok(self.reward_hook.points_token().call().await?)
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let erc20 = Erc20::new(token, self.client.clone());
        Ok(erc20.balance_of(owner).call().await?)
    }

    async fn approve_router(&self, token: Address, amount: U256) -> Result<TxHash> {
        let erc20 = Erc20::new(token, self.client.clone());
        self.send_and_confirm(erc20.approve(self.swap_router.address(), amount))
            .await
    }

    async fn swap(&self, request: &SwapRequest) -> Result<TxHash> {
        let call = self.swap_router.swap(
            request.key.into(),
            request.params.into(),
            request.settlement.into(),
            Bytes::clone(&request.hook_data),
        );
        self.send_and_confirm(call).await
    }
}
