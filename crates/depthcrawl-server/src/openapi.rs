use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "depthcrawl API",
        version = "0.1.0",
        description = "Depth-bounded same-origin web crawler."
    ),
    paths(crate::routes::crawl, crate::routes::health),
    components(schemas(
        crate::dto::CrawlRequest,
        crate::dto::CrawlResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "crawl", description = "Site crawling"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("token")
                        .description(Some(
                            "API key. Set via DEPTHCRAWL_API_KEY environment variable.",
                        ))
                        .build(),
                ),
            );
        }
    }
}
