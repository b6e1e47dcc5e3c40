use crate::models::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Order Book Market API",
    description = "Whitelist, order progress, historic prices and asset prefetching for the limit-order storefront",
))]
struct Api;

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
/// Merges in OpenAPI definitions from other locations in the app, such as the [dto] package
/// and the route submodules.
pub fn build_documentation() -> SwaggerUi {
    let mut api_docs = Api::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::health::HealthApi::openapi());
    api_docs.merge(super::prices::PricesApi::openapi());
    api_docs.merge(super::whitelist::WhitelistApi::openapi());
    api_docs.merge(super::orders::OrdersApi::openapi());
    api_docs.merge(super::prefetch::PrefetchApi::openapi());

    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs)
}
