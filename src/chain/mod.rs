mod retry;
mod rpc;

pub use retry::RetryingTransport;
pub use rpc::{RpcTransport, UnconfiguredTransport};

use std::sync::Arc;

use alloy::{
    primitives::{Address, Bytes},
    sol,
    sol_types::SolCall,
};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

sol! {
    /// Read surface of the limit-order book contract.
    interface IOrderBook {
        struct TokenInfo {
            address tokenAddress;
            bool isActive;
        }

        function viewCountWhitelisted() external view returns (uint256);
        function viewWhitelisted(uint256 cursor, uint256 size) external view returns (TokenInfo[] memory tokens, uint256 nextCursor);
        function getTokenInfoAt(uint256 index) external view returns (address tokenAddress, bool isActive);
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// No contract address resolves for the active chain. Not retryable.
    #[error("contract address is not configured for the active chain")]
    Configuration,
    /// Transport failure, revert or undecodable answer. Retryable by caller policy.
    #[error("rpc call failed: {0}")]
    Rpc(String),
    #[error("{0} not found")]
    NotFound(String),
}

impl ChainError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChainError::Rpc(_))
    }
}

/// Executes raw read-only calls against a contract.
#[async_trait]
pub trait CallTransport: Send + Sync {
    async fn eth_call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError>;
}

/// Typed reader bound to one contract on the active chain.
#[derive(Clone)]
pub struct ChainReader {
    transport: Arc<dyn CallTransport>,
    contract: Option<Address>,
}

impl ChainReader {
    pub fn new(transport: Arc<dyn CallTransport>, contract: Option<Address>) -> Self {
        ChainReader {
            transport,
            contract,
        }
    }

    /// Encodes `call`, executes it and decodes the return data.
    ///
    /// Fails with [`ChainError::Configuration`] before touching the transport when
    /// no contract address is configured.
    pub async fn read<C: SolCall + Send>(&self, call: C) -> Result<C::Return, ChainError> {
        let contract = self.contract.ok_or(ChainError::Configuration)?;
        debug!(%contract, function = C::SIGNATURE, "contract read");

        let output = self
            .transport
            .eth_call(contract, Bytes::from(call.abi_encode()))
            .await?;

        C::abi_decode_returns(&output).map_err(|e| {
            ChainError::Rpc(format!("failed to decode {} output: {e}", C::SIGNATURE))
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use alloy::{
        primitives::U256,
        sol_types::{SolCall, SolValue},
    };

    use super::{IOrderBook, *};

    /// In-memory order book answering the whitelist read calls.
    #[derive(Default)]
    pub struct FakeOrderBook {
        pub tokens: Vec<(Address, bool)>,
        /// Overrides the count the contract reports, independent of `tokens`.
        pub reported_count: Option<U256>,
        /// Number of leading calls that fail with an rpc error.
        pub fail_first: Mutex<usize>,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl FakeOrderBook {
        pub fn with_tokens(tokens: Vec<(Address, bool)>) -> Self {
            FakeOrderBook {
                tokens,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CallTransport for FakeOrderBook {
        async fn eth_call(&self, _to: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
            {
                let mut fail_first = self.fail_first.lock().unwrap();
                if *fail_first > 0 {
                    *fail_first -= 1;
                    return Err(ChainError::Rpc("connection reset".to_string()));
                }
            }

            let selector: [u8; 4] = calldata[..4].try_into().unwrap();
            let output = match selector {
                IOrderBook::viewCountWhitelistedCall::SELECTOR => {
                    self.calls.lock().unwrap().push("viewCountWhitelisted");
                    let count = self
                        .reported_count
                        .unwrap_or(U256::from(self.tokens.len()));
                    count.abi_encode()
                }
                IOrderBook::viewWhitelistedCall::SELECTOR => {
                    self.calls.lock().unwrap().push("viewWhitelisted");
                    let call = IOrderBook::viewWhitelistedCall::abi_decode(&calldata).unwrap();
                    let cursor = call.cursor.to::<usize>().min(self.tokens.len());
                    let end = cursor.saturating_add(call.size.to::<usize>()).min(self.tokens.len());
                    let page: Vec<IOrderBook::TokenInfo> = self.tokens[cursor..end]
                        .iter()
                        .map(|(address, active)| IOrderBook::TokenInfo {
                            tokenAddress: *address,
                            isActive: *active,
                        })
                        .collect();
                    (page, U256::from(end)).abi_encode_params()
                }
                IOrderBook::getTokenInfoAtCall::SELECTOR => {
                    self.calls.lock().unwrap().push("getTokenInfoAt");
                    let call = IOrderBook::getTokenInfoAtCall::abi_decode(&calldata).unwrap();
                    let Some((address, active)) = self.tokens.get(call.index.to::<usize>()) else {
                        return Err(ChainError::Rpc("execution reverted".to_string()));
                    };
                    (*address, *active).abi_encode_params()
                }
                _ => return Err(ChainError::Rpc("unknown selector".to_string())),
            };
            Ok(Bytes::from(output))
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;

    use super::{testing::FakeOrderBook, *};

    #[tokio::test]
    async fn unresolved_address_is_a_configuration_error() {
        let book = Arc::new(FakeOrderBook::default());
        let reader = ChainReader::new(book.clone(), None);

        let err = reader
            .read(IOrderBook::viewCountWhitelistedCall {})
            .await
            .unwrap_err();

        assert_eq!(err, ChainError::Configuration);
        assert!(!err.is_retryable());
        assert!(book.calls().is_empty());
    }

    #[tokio::test]
    async fn decodes_typed_returns() {
        let book = Arc::new(FakeOrderBook::with_tokens(vec![
            (Address::repeat_byte(1), true),
            (Address::repeat_byte(2), false),
        ]));
        let reader = ChainReader::new(book, Some(Address::repeat_byte(0xaa)));

        let count = reader
            .read(IOrderBook::viewCountWhitelistedCall {})
            .await
            .unwrap();
        assert_eq!(count, U256::from(2));

        let info = reader
            .read(IOrderBook::getTokenInfoAtCall {
                index: U256::from(1),
            })
            .await
            .unwrap();
        assert_eq!(info.tokenAddress, Address::repeat_byte(2));
        assert!(!info.isActive);
    }

    #[tokio::test]
    async fn transport_failures_are_rpc_errors() {
        let book = FakeOrderBook::default();
        *book.fail_first.lock().unwrap() = 1;
        let reader = ChainReader::new(Arc::new(book), Some(Address::repeat_byte(0xaa)));

        let err = reader
            .read(IOrderBook::viewCountWhitelistedCall {})
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Rpc(_)));
        assert!(err.is_retryable());
    }
}
