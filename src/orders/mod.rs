//! Normalizes how much of an order is still unfilled across order book generations.
//!
//! Older deployments report `remainingFillPercentage`, newer ones
//! `remainingExecutionPercentage`, and some report neither, in which case the
//! value is derived from the sell amounts. Every percentage is scaled by 1e18.

use alloy::primitives::U256;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// 100% in the 1e18 fixed-point scale used by the contract.
pub const PERCENT_SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(default)]
    pub original_sell_amount: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyOrder {
    pub remaining_fill_percentage: U256,
    #[serde(default)]
    pub remaining_sell_amount: Option<U256>,
    #[serde(default, alias = "orderDetailsWithID", alias = "orderDetailsWithId")]
    pub details: Option<OrderDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentOrder {
    pub remaining_execution_percentage: U256,
    #[serde(default)]
    pub remaining_sell_amount: Option<U256>,
    #[serde(default, alias = "orderDetailsWithID", alias = "orderDetailsWithId")]
    pub details: Option<OrderDetails>,
}

/// An order that carries no precomputed percentage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BareOrder {
    #[serde(default)]
    pub remaining_sell_amount: Option<U256>,
    #[serde(default, alias = "orderDetailsWithID", alias = "orderDetailsWithId")]
    pub details: Option<OrderDetails>,
}

/// Order record as returned by one of the known contract generations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRecord {
    Legacy(LegacyOrder),
    Current(CurrentOrder),
    Bare(BareOrder),
}

const FILL_PERCENTAGE_KEY: &str = "remainingFillPercentage";
const EXECUTION_PERCENTAGE_KEY: &str = "remainingExecutionPercentage";

/// The variant is picked by which percentage key is present and non-null, legacy
/// first. A present percentage must parse; it never falls through to the amounts.
impl<'de> Deserialize<'de> for OrderRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let present = |key: &str| value.get(key).is_some_and(|v| !v.is_null());
        let legacy = present(FILL_PERCENTAGE_KEY);
        let current = present(EXECUTION_PERCENTAGE_KEY);

        let record = if legacy {
            LegacyOrder::deserialize(value).map(OrderRecord::Legacy)
        } else if current {
            CurrentOrder::deserialize(value).map(OrderRecord::Current)
        } else {
            BareOrder::deserialize(value).map(OrderRecord::Bare)
        };
        record.map_err(de::Error::custom)
    }
}

/// Remaining unfilled proportion of `order`, scaled by 1e18. Never fails.
pub fn reconcile_fill_percentage(order: &OrderRecord) -> U256 {
    match order {
        OrderRecord::Legacy(order) => order.remaining_fill_percentage,
        OrderRecord::Current(order) => order.remaining_execution_percentage,
        OrderRecord::Bare(order) => {
            let remaining = order.remaining_sell_amount.unwrap_or(U256::ZERO);
            let original = order
                .details
                .as_ref()
                .and_then(|details| details.original_sell_amount)
                .unwrap_or(U256::from(1));
            scaled_ratio(remaining, original)
        }
    }
}

fn scaled_ratio(numerator: U256, denominator: U256) -> U256 {
    if denominator.is_zero() {
        return U256::ZERO;
    }
    match numerator.checked_mul(PERCENT_SCALE) {
        Some(scaled) => scaled / denominator,
        // Only reachable for amounts near 2^196; lose the sub-unit precision instead of wrapping.
        None => (numerator / denominator).saturating_mul(PERCENT_SCALE),
    }
}
