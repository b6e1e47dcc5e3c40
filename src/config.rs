use std::{env, time::Duration};

use alloy::primitives::Address;
use anyhow::{Context, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PRICE_TABLE: &str = "historic_prices";
const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_RPC_MAX_RETRIES: u32 = 2;

/// Which deployment of the order book the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn chain_id(self) -> u64 {
        match self {
            Network::Mainnet => 369,
            Network::Testnet => 943,
        }
    }

    fn env_prefix(self) -> &'static str {
        match self {
            Network::Mainnet => "MAINNET",
            Network::Testnet => "TESTNET",
        }
    }
}

/// Chain settings resolved for the active network.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub network: Network,
    pub rpc_url: Option<String>,
    /// `None` when no order book is deployed (or configured) on this network.
    pub orderbook_address: Option<Address>,
    pub rpc_timeout: Duration,
    pub rpc_max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub chain: ChainConfig,
    /// Historic price store. Unset means the price feature is disabled.
    pub database_url: Option<String>,
    pub price_table: String,
    /// Static host serving `/coin-logos/*`. Unset disables prefetching.
    pub asset_host: Option<String>,
    pub cors_origin: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Reads the configuration from the process environment, loading `.env` first if present.
    pub fn init() -> Result<Config> {
        if dotenv::dotenv().is_err() {
            tracing::debug!("No .env file found, using process environment only");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let network = match get("USE_TESTNET").as_deref() {
            Some("1") | Some("true") | Some("yes") => Network::Testnet,
            _ => Network::Mainnet,
        };
        let prefix = network.env_prefix();

        let orderbook_address = get(&format!("{prefix}_ORDERBOOK_ADDRESS"))
            .map(|raw| {
                raw.parse::<Address>()
                    .with_context(|| format!("invalid {prefix}_ORDERBOOK_ADDRESS `{raw}`"))
            })
            .transpose()?;

        let rpc_timeout_ms = get("RPC_TIMEOUT_MS")
            .map(|raw| raw.parse::<u64>().context("RPC_TIMEOUT_MS must be an integer"))
            .transpose()?
            .unwrap_or(DEFAULT_RPC_TIMEOUT_MS);
        let rpc_max_retries = get("RPC_MAX_RETRIES")
            .map(|raw| raw.parse::<u32>().context("RPC_MAX_RETRIES must be an integer"))
            .transpose()?
            .unwrap_or(DEFAULT_RPC_MAX_RETRIES);

        Ok(Config {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            chain: ChainConfig {
                network,
                rpc_url: get(&format!("{prefix}_RPC_URL")),
                orderbook_address,
                rpc_timeout: Duration::from_millis(rpc_timeout_ms),
                rpc_max_retries,
            },
            database_url: get("DATABASE_URL"),
            price_table: get("PRICE_TABLE").unwrap_or_else(|| DEFAULT_PRICE_TABLE.to_string()),
            asset_host: get("ASSET_HOST").map(|host| host.trim_end_matches('/').to_string()),
            cors_origin: get("CORS_ORIGIN"),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}
