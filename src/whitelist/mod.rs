use alloy::primitives::{Address, U256};
use tracing::debug;

use crate::chain::{ChainError, ChainReader, IOrderBook};

/// Page size requested when the whitelist count is not known up front.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistEntry {
    pub token_address: Address,
    pub is_active: bool,
    /// Position in on-chain storage, used for detail lookups.
    pub index: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistPage {
    pub entries: Vec<WhitelistEntry>,
    pub next_cursor: u64,
}

/// Full whitelist as read in one pass. `entries.len() <= total_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistSnapshot {
    pub total_count: u64,
    pub entries: Vec<WhitelistEntry>,
}

impl WhitelistSnapshot {
    pub fn active(&self) -> impl Iterator<Item = &WhitelistEntry> {
        self.entries.iter().filter(|entry| entry.is_active)
    }
}

/// Assembles the token whitelist from the order book's paginated views.
#[derive(Clone)]
pub struct WhitelistAggregator {
    reader: ChainReader,
}

impl WhitelistAggregator {
    pub fn new(reader: ChainReader) -> Self {
        WhitelistAggregator { reader }
    }

    /// Total number of whitelisted tokens, active or not.
    pub async fn count(&self) -> Result<u64, ChainError> {
        let count = self
            .reader
            .read(IOrderBook::viewCountWhitelistedCall {})
            .await?;
        to_u64(count, "whitelist count")
    }

    /// Reads up to `size` raw entries starting at `cursor`.
    ///
    /// Without a size the request is capped at [`DEFAULT_PAGE_SIZE`] instead of
    /// asking the contract for an unbounded window.
    pub async fn page(&self, cursor: u64, size: Option<u64>) -> Result<WhitelistPage, ChainError> {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
        let page = self
            .reader
            .read(IOrderBook::viewWhitelistedCall {
                cursor: U256::from(cursor),
                size: U256::from(size),
            })
            .await?;

        let entries = page
            .tokens
            .into_iter()
            .zip(cursor..)
            .map(|(info, index)| WhitelistEntry {
                token_address: info.tokenAddress,
                is_active: info.isActive,
                index,
            })
            .collect();

        Ok(WhitelistPage {
            entries,
            next_cursor: to_u64(page.nextCursor, "next cursor")?,
        })
    }

    /// Count followed by a single page bounded by that count.
    pub async fn snapshot(&self) -> Result<WhitelistSnapshot, ChainError> {
        let total_count = self.count().await?;
        if total_count == 0 {
            return Ok(WhitelistSnapshot {
                total_count,
                entries: Vec::new(),
            });
        }

        let mut page = self.page(0, Some(total_count)).await?;
        let limit = usize::try_from(total_count).unwrap_or(usize::MAX);
        page.entries.truncate(limit);
        debug!(
            total_count,
            fetched = page.entries.len(),
            next_cursor = page.next_cursor,
            "read whitelist snapshot"
        );

        Ok(WhitelistSnapshot {
            total_count,
            entries: page.entries,
        })
    }

    /// Active whitelist entries in ascending index order.
    pub async fn active_tokens(&self) -> Result<Vec<WhitelistEntry>, ChainError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.active().cloned().collect())
    }

    pub async fn entry_at(&self, index: u64) -> Result<WhitelistEntry, ChainError> {
        let count = self.count().await?;
        if index >= count {
            return Err(ChainError::NotFound(format!(
                "whitelist entry {index} (count is {count})"
            )));
        }

        let info = self
            .reader
            .read(IOrderBook::getTokenInfoAtCall {
                index: U256::from(index),
            })
            .await?;

        Ok(WhitelistEntry {
            token_address: info.tokenAddress,
            is_active: info.isActive,
            index,
        })
    }
}

fn to_u64(value: U256, what: &str) -> Result<u64, ChainError> {
    u64::try_from(value).map_err(|_| ChainError::Rpc(format!("{what} {value} exceeds u64")))
}
