//! Swap orchestration against a [`Ledger`].
//!
//! Lifecycle: uninitialized -> ready -> (swap in flight) -> ready. The
//! session (signer address and reward token) is fixed once initialization
//! succeeds; display state keeps the last reward balance and the last
//! successful swap result.

use crate::config::ContractRegistry;
use crate::dex::{Ledger, build_swap_request};
use crate::errors::{AppError, Result};
use crate::models::{Session, SwapOutcome, SwapResult};
use crate::utils::{format_amount, parse_amount};
use ethers::types::{TxHash, U256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::{debug, info, warn};

/// Latest values shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientView {
    pub points_balance: Option<U256>,
    pub last_result: Option<SwapResult>,
}

pub struct SwapClient<L> {
    ledger: L,
    contracts: ContractRegistry,
    session: OnceLock<Session>,
    in_flight: AtomicBool,
    view: Mutex<ClientView>,
}

/// Holds the in-flight flag for the lifetime of one swap.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<L: Ledger> SwapClient<L> {
    pub fn new(ledger: L, contracts: ContractRegistry) -> Self {
        Self {
            ledger,
            contracts,
            session: OnceLock::new(),
            in_flight: AtomicBool::new(false),
            view: Mutex::new(ClientView::default()),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn contracts(&self) -> &ContractRegistry {
        &self.contracts
    }

    /// `None` until [`Self::initialize`] succeeds.
    pub fn session(&self) -> Option<Session> {
        self.session.get().copied()
    }

    pub fn is_swap_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn view(&self) -> ClientView {
        self.lock_view().clone()
    }

    /// Resolve the reward token and read the caller's reward balance.
    pub async fn initialize(&self) -> Result<Session> {
        let account = self.ledger.account();
        let points_token = self.ledger.reward_token().await?;
        if points_token.is_zero() {
            warn!(hook = ?self.contracts.reward_hook, "[INIT] failed to retrieve points token address");
            return Err(AppError::MissingRewardToken(self.contracts.reward_hook));
        }
        info!(
            ?account,
            swap_router = ?self.contracts.swap_router,
            reward_hook = ?self.contracts.reward_hook,
            token0 = ?self.contracts.token0,
            token1 = ?self.contracts.token1,
            ?points_token,
            "[INIT] contracts resolved"
        );

        let balance = self.ledger.balance_of(points_token, account).await?;
        let session = Session {
            account,
            points_token,
        };
        if self.session.set(session).is_err() {
            debug!("[INIT] client already initialized");
        }
        self.lock_view().points_balance = Some(balance);
        info!(points = %format_amount(balance), "[BALANCE] points balance");
        Ok(session)
    }

    /// Re-read the reward balance. `None` before initialization.
    pub async fn refresh_points_balance(&self) -> Result<Option<U256>> {
        let Some(session) = self.session() else {
            return Ok(None);
        };
        let balance = self
            .ledger
            .balance_of(session.points_token, session.account)
            .await?;
        self.lock_view().points_balance = Some(balance);
        info!(points = %format_amount(balance), "[BALANCE] points balance");
        Ok(Some(balance))
    }

    /// Swap `amount_in` (decimal, 18 decimals) of token0 for token1.
    ///
    /// Approves the router for token0 without limit, submits the swap, waits
    /// for both transactions, then re-reads the token and reward balances.
    /// On error the stored result is left as it was.
    pub async fn perform_swap(&self, amount_in: &str) -> Result<SwapOutcome> {
        let Some(session) = self.session() else {
            debug!("[SWAP] ignored, client not initialized");
            return Ok(SwapOutcome::NotReady);
        };
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("[SWAP] ignored, previous swap still in flight");
            return Ok(SwapOutcome::InFlight);
        };

        match self.execute_swap(session, amount_in).await {
            Ok(result) => {
                let mut view = self.lock_view();
                view.points_balance = Some(result.points_balance);
                view.last_result = Some(result);
                Ok(SwapOutcome::Completed(result))
            }
            Err(e) => {
                warn!(error = %e, amount_in, "[SWAP] swap failed");
                Err(e)
            }
        }
    }

    async fn execute_swap(&self, session: Session, amount_in: &str) -> Result<SwapResult> {
        let amount = parse_amount(amount_in)?;
        let request = build_swap_request(&self.contracts, amount, session.account)?;
        let input_token = request.input_token();

        let approve_tx: TxHash = self.ledger.approve_router(input_token, U256::MAX).await?;
        debug!(?approve_tx, token = ?input_token, "[SWAP] router approved");

        let swap_tx = self.ledger.swap(&request).await?;
        info!(?swap_tx, amount = %format_amount(amount), "[SWAP] swap confirmed");

        let token0_balance = self
            .ledger
            .balance_of(self.contracts.token0, session.account)
            .await?;
        let token1_balance = self
            .ledger
            .balance_of(self.contracts.token1, session.account)
            .await?;
        let points_balance = self
            .ledger
            .balance_of(session.points_token, session.account)
            .await?;
        info!(
            token0 = %format_amount(token0_balance),
            token1 = %format_amount(token1_balance),
            points = %format_amount(points_balance),
            "[BALANCE] balances after swap"
        );

        Ok(SwapResult {
            token0_balance,
            token1_balance,
            points_balance,
            approve_tx,
            swap_tx,
        })
    }

    fn lock_view(&self) -> MutexGuard<'_, ClientView> {
        // The view holds plain values; a poisoned lock still has usable data.
        self.view.lock().unwrap_or_else(|e| e.into_inner())
    }
}
