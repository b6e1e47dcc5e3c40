pub mod message;
pub mod order;
pub mod prefetch;
pub mod price;
pub mod whitelist;
pub use message::*;
pub use order::*;
pub use prefetch::*;
pub use price::*;
pub use whitelist::*;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(components(schemas(
    Message,
    ErrorMessage,
    WhitelistEntryResponse,
    WhitelistSnapshotResponse,
    OrderRecordBody,
    OrderDetailsBody,
    FillPercentageResponse,
    HistoricPriceResponse,
    PrefetchTargetInfo,
    PrefetchResponse,
)))]
/// Captures OpenAPI schemas defined in the DTO module
pub struct OpenApiSchemas;
