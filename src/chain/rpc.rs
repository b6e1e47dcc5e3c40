use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    transports::http::reqwest::Url,
};
use async_trait::async_trait;

use super::{CallTransport, ChainError};

/// `eth_call` over an HTTP JSON-RPC endpoint.
pub struct RpcTransport {
    provider: DynProvider,
}

impl RpcTransport {
    pub fn connect(rpc_url: &str) -> anyhow::Result<Self> {
        let url: Url = rpc_url.parse()?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(RpcTransport { provider })
    }
}

#[async_trait]
impl CallTransport for RpcTransport {
    async fn eth_call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        let request = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);
        self.provider
            .call(request)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }
}

/// Transport used when no RPC endpoint is configured: every call is a configuration error.
pub struct UnconfiguredTransport;

#[async_trait]
impl CallTransport for UnconfiguredTransport {
    async fn eth_call(&self, _to: Address, _calldata: Bytes) -> Result<Bytes, ChainError> {
        Err(ChainError::Configuration)
    }
}
