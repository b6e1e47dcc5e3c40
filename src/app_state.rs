use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::chain::{CallTransport, ChainReader, RetryingTransport, RpcTransport, UnconfiguredTransport};
use crate::config::Config;
use crate::database::{self, PostgresPriceStore, PriceStore};
use crate::external::AssetHost;
use crate::prices::HistoricPriceGateway;
use crate::scheduler::PrefetchScheduler;
use crate::whitelist::WhitelistAggregator;

pub struct AppState {
    pub config: Config,
    pub whitelist: WhitelistAggregator,
    pub prices: HistoricPriceGateway,
    /// `None` when no asset host is configured.
    pub prefetch: Option<PrefetchScheduler>,
}

impl AppState {
    /// Wires every component from `config`. Missing optional settings disable the
    /// corresponding feature instead of failing.
    pub fn from_config(config: Config) -> Result<Self> {
        let chain = &config.chain;
        let transport: Arc<dyn CallTransport> = match &chain.rpc_url {
            Some(url) => {
                info!(network = ?chain.network, chain_id = chain.network.chain_id(), "using RPC endpoint");
                Arc::new(RetryingTransport::new(
                    RpcTransport::connect(url)?,
                    chain.rpc_timeout,
                    chain.rpc_max_retries,
                ))
            }
            None => {
                warn!(network = ?chain.network, "no RPC URL configured, contract reads are disabled");
                Arc::new(UnconfiguredTransport)
            }
        };
        if chain.orderbook_address.is_none() {
            warn!(network = ?chain.network, "no order book address configured");
        }
        let whitelist =
            WhitelistAggregator::new(ChainReader::new(transport, chain.orderbook_address));

        let store: Option<Arc<dyn PriceStore>> = match &config.database_url {
            Some(url) => {
                info!("Connecting to PostgreSQL...");
                let pool = database::connect_sqlx(url)?;
                Some(Arc::new(PostgresPriceStore::new(pool, &config.price_table)))
            }
            None => {
                warn!("DATABASE_URL not set, historic prices will be served empty");
                None
            }
        };
        let prices = HistoricPriceGateway::new(store);

        let prefetch = match &config.asset_host {
            Some(host) => Some(PrefetchScheduler::new(Arc::new(AssetHost::new(host)?))),
            None => None,
        };

        Ok(AppState {
            config,
            whitelist,
            prices,
            prefetch,
        })
    }
}
