//! Runtime configuration.
//!
//! Layered the usual way: built-in defaults, then `.env`/environment
//! variables, then an optional TOML file, then CLI flags (applied by main).

use crate::abi::MULTICALL2;
use crate::multicall::BatchMode;

use alloy_primitives::Address;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Public mainnet endpoint used when RPC_URL is not set.
const DEFAULT_RPC_URL: &str = "https://eth.llamarpc.com";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint for read-only `eth_call`s.
    pub rpc_url: String,

    /// Chain ID (1 = Ethereum Mainnet). Informational; the aggregator
    /// address below must match the chain the endpoint serves.
    pub chain_id: u64,

    /// Multicall2 aggregator address.
    pub multicall_address: String,

    /// Deadline for each network round trip.
    pub request_timeout_secs: u64,

    /// Batch failure semantics; fail-fast matches the aggregator's plain
    /// `aggregate` entry point.
    pub batch_mode: BatchMode,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            rpc_url: env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            multicall_address: env::var("MULTICALL_ADDRESS")
                .unwrap_or_else(|_| MULTICALL2.to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            batch_mode: match env::var("BATCH_MODE")
                .unwrap_or_else(|_| "fail_fast".to_string())
                .to_lowercase()
                .as_str()
            {
                "tolerant" | "try_aggregate" => BatchMode::Tolerant,
                _ => BatchMode::FailFast,
            },
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() || self.rpc_url.contains("YOUR_API_KEY") {
            return Err(eyre::eyre!(
                "Invalid RPC_URL - please set a valid JSON-RPC endpoint"
            ));
        }
        if Address::from_str(&self.multicall_address).is_err() {
            return Err(eyre::eyre!(
                "MULTICALL_ADDRESS is not a valid address: {}",
                self.multicall_address
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(eyre::eyre!("REQUEST_TIMEOUT_SECS must be at least 1"));
        }
        Ok(())
    }

    pub fn multicall_address(&self) -> Address {
        // validate() gates every entry path before this is called.
        Address::from_str(&self.multicall_address).unwrap_or(MULTICALL2)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: 1,
            multicall_address: MULTICALL2.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            batch_mode: BatchMode::FailFast,
        }
    }
}
