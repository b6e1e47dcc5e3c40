use std::time::Duration;

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use tracing::warn;

use super::{CallTransport, ChainError};

const BACKOFF_STEP: Duration = Duration::from_millis(250);

/// Timeout and bounded-retry policy around another transport.
///
/// Each attempt is capped at `timeout`. Only retryable failures (see
/// [`ChainError::is_retryable`]) are attempted again, up to `max_retries` extra
/// times with a linearly growing pause in between.
pub struct RetryingTransport<T> {
    inner: T,
    timeout: Duration,
    max_retries: u32,
}

impl<T: CallTransport> RetryingTransport<T> {
    pub fn new(inner: T, timeout: Duration, max_retries: u32) -> Self {
        RetryingTransport {
            inner,
            timeout,
            max_retries,
        }
    }

    async fn attempt(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        match tokio::time::timeout(self.timeout, self.inner.eth_call(to, calldata)).await {
            Ok(result) => result,
            Err(_) => Err(ChainError::Rpc(format!(
                "call timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl<T: CallTransport> CallTransport for RetryingTransport<T> {
    async fn eth_call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        let mut attempt = 0;
        loop {
            match self.attempt(to, calldata.clone()).await {
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(%to, attempt, error = %e, "retrying contract read");
                    tokio::time::sleep(BACKOFF_STEP * attempt).await;
                }
                result => return result,
            }
        }
    }
}
