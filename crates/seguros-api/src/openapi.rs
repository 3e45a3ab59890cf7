//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI document
//! served at `/openapi.json`. The `/api/InsuranceControllers` aliases share
//! handlers with `/insureds` and are not listed separately.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the insured API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Seguros API: Insured Person Registry",
        version = "0.1.0",
        description = "Create, read, update, and delete insured person records with field validation and email/phone uniqueness.",
        license(name = "BUSL-1.1")
    ),
    paths(
        crate::routes::insureds::create_insured,
        crate::routes::insureds::list_insureds,
        crate::routes::insureds::get_insured,
        crate::routes::insureds::update_insured,
        crate::routes::insureds::delete_insured,
    ),
    components(schemas(
        seguros_core::InsuredId,
        seguros_core::InsuredDraft,
        seguros_core::InsuredPerson,
        crate::routes::insureds::DeleteResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "insureds", description = "Insured person records"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_insured_operation() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = &spec["paths"];
        assert!(paths["/insureds"]["get"].is_object());
        assert!(paths["/insureds"]["post"].is_object());
        assert!(paths["/insureds/{id}"]["get"].is_object());
        assert!(paths["/insureds/{id}"]["put"].is_object());
        assert!(paths["/insureds/{id}"]["delete"].is_object());
    }

    #[test]
    fn spec_includes_record_schema() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &spec["components"]["schemas"];
        assert!(schemas["InsuredPerson"].is_object());
        assert!(schemas["ErrorBody"].is_object());
    }
}
