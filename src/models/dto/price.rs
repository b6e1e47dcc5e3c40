use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoricPriceQuery {
    /// Token symbol, e.g. `HEX`
    pub symbol: Option<String>,
    /// Stored column to serve, e.g. `priceUSD`
    pub field: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoricPriceResponse {
    /// Rows `{ date, <field>: value }` ascending by date, or `null` when there is no data
    #[schema(value_type = Option<Vec<Object>>)]
    pub data: Option<Vec<Value>>,
}
