use serde::Serialize;
use utoipa::ToSchema;

/// Order record as returned by the contract. Amounts are decimal or `0x` hex strings.
/// At most one percentage field is expected; which one depends on the contract generation.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct OrderRecordBody {
    pub remaining_fill_percentage: Option<String>,
    pub remaining_execution_percentage: Option<String>,
    pub remaining_sell_amount: Option<String>,
    pub order_details_with_id: Option<OrderDetailsBody>,
}

#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct OrderDetailsBody {
    pub original_sell_amount: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FillPercentageResponse {
    /// Remaining unfilled proportion scaled by 1e18, as a decimal string
    pub remaining_fill_percentage: String,
}
