//! OpenAPI document assembly.

use utoipa::OpenApi;

use super::handlers;

#[derive(OpenApi)]
#[openapi(info(
    title = "Innkeeper API",
    description = "Hotel reservation lifecycle and scoped authorization"
))]
struct ApiDoc;

/// Build the merged OpenAPI spec for all handler modules.
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(handlers::reservations::ReservationsApiDoc::openapi());
    doc
}
