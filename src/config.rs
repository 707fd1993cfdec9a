//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use ethers::types::Address;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

const DEFAULT_RPC_URL: &str = "http://localhost:8545";
const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
const DEFAULT_CONFIRMATIONS: usize = 1;

/// Addresses of the deployed contracts the client talks to.
///
/// Only valid for the deployment they were recorded from; a fresh local
/// node needs a fresh registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ContractRegistry {
    pub pool_manager: Address,
    pub swap_router: Address,
    pub reward_hook: Address,
    /// Input token of the fixed swap direction.
    pub token0: Address,
    /// Output token of the fixed swap direction.
    pub token1: Address,
}

impl ContractRegistry {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            pool_manager: required_address(lookup, "POOL_MANAGER_ADDRESS")?,
            swap_router: required_address(lookup, "SWAP_ROUTER_ADDRESS")?,
            reward_hook: required_address(lookup, "REWARD_HOOK_ADDRESS")?,
            token0: required_address(lookup, "TOKEN0_ADDRESS")?,
            token1: required_address(lookup, "TOKEN1_ADDRESS")?,
        })
    }

    /// All registry entries with a label, in a stable order.
    pub fn entries(&self) -> [(&'static str, Address); 5] {
        [
            ("pool_manager", self.pool_manager),
            ("swap_router", self.swap_router),
            ("reward_hook", self.reward_hook),
            ("token0", self.token0),
            ("token1", self.token1),
        ]
    }
}

/// Consolidated application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// JSON-RPC endpoint of the ledger node.
    pub rpc_url: Url,
    /// Hex secret of the signing identity.
    pub private_key: String,
    /// Chain id override; the node is asked when unset.
    pub chain_id: Option<u64>,
    /// How often pending transactions are polled for a receipt.
    pub poll_interval: Duration,
    /// Confirmations awaited for every submitted transaction, at least 1.
    pub confirmations: usize,
    pub contracts: ContractRegistry,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("private_key", &"<redacted>")
            .field("chain_id", &self.chain_id)
            .field("poll_interval", &self.poll_interval)
            .field("confirmations", &self.confirmations)
            .field("contracts", &self.contracts)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rpc_url = Url::parse(
            &lookup("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.into()),
        )?;
        let private_key = lookup("PRIVATE_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::Config("Set PRIVATE_KEY to the signer's hex key".into()))?;
        let chain_id = optional_number::<u64>(&lookup, "CHAIN_ID")?;
        let poll_interval = Duration::from_millis(
            optional_number(&lookup, "POLL_INTERVAL_MS")?.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
        );
        let confirmations =
            optional_number(&lookup, "CONFIRMATIONS")?.unwrap_or(DEFAULT_CONFIRMATIONS);
        if confirmations == 0 {
            return Err(AppError::Config(
                "CONFIRMATIONS must be at least 1".into(),
            ));
        }

        let contracts = match lookup("CONTRACTS_FILE") {
            Some(path) => ContractRegistry::from_json_file(path)?,
            None => ContractRegistry::from_lookup(&lookup)?,
        };

        Ok(Self {
            rpc_url,
            private_key,
            chain_id,
            poll_interval,
            confirmations,
            contracts,
        })
    }
}

fn required_address(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Address> {
    let raw = lookup(key)
        .ok_or_else(|| AppError::Config(format!("Set {key} or CONTRACTS_FILE")))?;
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key} is not an address: {e}")))
}

fn optional_number<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{key} must be a number: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const REGISTRY_JSON: &str = r#"{
        "pool_manager": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
        "swap_router": "0xdc64a140aa3e981100a9beca4e685f962f0cf6c9",
        "reward_hook": "0xb3a4a38934711f34d4cd86ce5b573fe055b10040",
        "token0": "0x0165878a594ca255338adfa4d48449f69242eb8f",
        "token1": "0xa513e6e4b8f2a923d98304ec87f64353c4d5c853"
    }"#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn address_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("PRIVATE_KEY", "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"),
            ("POOL_MANAGER_ADDRESS", "0x5fbdb2315678afecb367f032d93f642f64180aa3"),
            ("SWAP_ROUTER_ADDRESS", "0xdc64a140aa3e981100a9beca4e685f962f0cf6c9"),
            ("REWARD_HOOK_ADDRESS", "0xb3a4a38934711f34d4cd86ce5b573fe055b10040"),
            ("TOKEN0_ADDRESS", "0x0165878a594ca255338adfa4d48449f69242eb8f"),
            ("TOKEN1_ADDRESS", "0xa513e6e4b8f2a923d98304ec87f64353c4d5c853"),
        ]
    }

    #[test]
    fn registry_parses_json() {
        let registry = ContractRegistry::from_json_str(REGISTRY_JSON).expect("valid registry");
        assert_eq!(
            registry.swap_router,
            "0xdc64a140aa3e981100a9beca4e685f962f0cf6c9".parse::<Address>().unwrap()
        );
        assert_eq!(registry.entries().len(), 5);
        assert_eq!(registry.entries()[2].0, "reward_hook");
    }

    #[test]
    fn registry_rejects_missing_field() {
        let raw = r#"{"pool_manager": "0x5fbdb2315678afecb367f032d93f642f64180aa3"}"#;
        assert!(matches!(
            ContractRegistry::from_json_str(raw),
            Err(AppError::SerdeJson(_))
        ));
    }

    #[test]
    fn registry_file_roundtrip_through_disk() {
        let path = std::env::temp_dir().join(format!("registry-{}.json", std::process::id()));
        std::fs::write(&path, REGISTRY_JSON).unwrap();
        let registry = ContractRegistry::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(registry, ContractRegistry::from_json_str(REGISTRY_JSON).unwrap());
    }

    #[test]
    fn config_uses_defaults() {
        let cfg = AppConfig::from_lookup(env(&address_env())).expect("config");
        assert_eq!(cfg.rpc_url.as_str(), "http://localhost:8545/");
        assert_eq!(cfg.chain_id, None);
        assert_eq!(cfg.poll_interval, Duration::from_millis(250));
        assert_eq!(cfg.confirmations, 1);
        assert!(!format!("{cfg:?}").contains("59c6995e"));
    }

    #[test]
    fn config_reads_overrides() {
        let mut pairs = address_env();
        pairs.push(("RPC_URL", "http://10.0.0.2:8545"));
        pairs.push(("CHAIN_ID", "31337"));
        pairs.push(("POLL_INTERVAL_MS", "1000"));
        pairs.push(("CONFIRMATIONS", "2"));
        let cfg = AppConfig::from_lookup(env(&pairs)).expect("config");
        assert_eq!(cfg.rpc_url.host_str(), Some("10.0.0.2"));
        assert_eq!(cfg.chain_id, Some(31337));
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
        assert_eq!(cfg.confirmations, 2);
    }

    #[test]
    fn config_requires_private_key() {
        let pairs: Vec<_> = address_env()
            .into_iter()
            .filter(|(k, _)| *k != "PRIVATE_KEY")
            .collect();
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn config_rejects_bad_address_and_number() {
        let mut pairs = address_env();
        pairs.retain(|(k, _)| *k != "TOKEN1_ADDRESS");
        pairs.push(("TOKEN1_ADDRESS", "not-an-address"));
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(AppError::Config(_))
        ));

        let mut pairs = address_env();
        pairs.push(("CONFIRMATIONS", "many"));
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn config_rejects_zero_confirmations() {
        let mut pairs = address_env();
        pairs.push(("CONFIRMATIONS", "0"));
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(AppError::Config(msg)) if msg.contains("CONFIRMATIONS")
        ));
    }

    #[test]
    fn config_rejects_bad_url() {
        let mut pairs = address_env();
        pairs.push(("RPC_URL", "localhost without scheme"));
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(AppError::UrlParse(_))
        ));
    }
}
