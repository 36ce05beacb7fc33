//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use imgpress_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgpress API",
        version = "0.1.0",
        description = "Image compression service. Uploads are re-encoded in their own format (JPEG, PNG or WebP) and served from /uploads when the result is smaller than the original."
    ),
    paths(
        handlers::compress::compress_image,
        handlers::health::health_check,
    ),
    components(schemas(
        models::CompressResponse,
        error::ErrorResponse,
        handlers::health::HealthCheckResponse,
    )),
    tags(
        (name = "compression", description = "Image compression"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
