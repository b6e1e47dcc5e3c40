use serde::Serialize;
use utoipa::ToSchema;

use crate::whitelist::{WhitelistEntry, WhitelistSnapshot};

#[derive(Debug, Serialize, ToSchema)]
pub struct WhitelistEntryResponse {
    /// Checksummed token address
    pub token_address: String,
    pub is_active: bool,
    /// Position in the contract's whitelist storage
    pub index: u64,
}

impl From<WhitelistEntry> for WhitelistEntryResponse {
    fn from(entry: WhitelistEntry) -> Self {
        WhitelistEntryResponse {
            token_address: entry.token_address.to_checksum(None),
            is_active: entry.is_active,
            index: entry.index,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WhitelistSnapshotResponse {
    pub total_count: u64,
    pub entries: Vec<WhitelistEntryResponse>,
}

impl From<WhitelistSnapshot> for WhitelistSnapshotResponse {
    fn from(snapshot: WhitelistSnapshot) -> Self {
        WhitelistSnapshotResponse {
            total_count: snapshot.total_count,
            entries: snapshot.entries.into_iter().map(Into::into).collect(),
        }
    }
}
