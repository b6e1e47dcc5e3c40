use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::scheduler::PrefetchTarget;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PrefetchTargetInfo {
    /// Asset identifier, the ticker for coin logos
    pub id: String,
    #[serde(default)]
    pub priority: bool,
}

impl From<PrefetchTargetInfo> for PrefetchTarget {
    fn from(info: PrefetchTargetInfo) -> Self {
        PrefetchTarget {
            id: info.id,
            priority: info.priority,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrefetchResponse {
    /// Distinct assets queued for prefetching
    pub scheduled: usize,
}
