//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the ripwave REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the ripwave REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (if enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ripwave REST API",
        version = "0.2.0",
        description = "Media acquisition and delivery API: submit a URL and a resolved format selection, receive the transcoded artifact as a stream",
        contact(
            name = "ripwave",
            url = "https://github.com/ripwave/ripwave"
        ),
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::api::routes::download,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::DownloadParams,
        crate::error::ApiError,
    )),
    tags(
        (name = "download", description = "Media acquisition and delivery"),
        (name = "system", description = "System endpoints - Health checks and the OpenAPI spec"),
    )
)]
pub struct ApiDoc;
