//! # Insured Person Records API
//!
//! ## Endpoints
//!
//! - `POST /insureds`: create record
//! - `GET /insureds`: list records, or one record with `?id=N`
//! - `GET /insureds/{id}`: get record
//! - `PUT /insureds/{id}`: replace record fields
//! - `DELETE /insureds/{id}`: delete record
//!
//! The same handlers are mounted under `/api/InsuranceControllers` so both
//! surfaces share one validator.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use seguros_core::{InsuredDraft, InsuredId, InsuredPerson};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_path, extract_query};
use crate::state::AppState;

/// Legacy controller route prefix.
pub const CONTROLLER_PREFIX: &str = "/api/InsuranceControllers";

// ── Request/Response DTOs ───────────────────────────────────────────

/// Optional filter on the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Return only the record with this id.
    pub id: Option<i32>,
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub id: InsuredId,
    pub message: String,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the insureds router on both the primary and controller paths.
pub fn router() -> Router<AppState> {
    let controller_item = format!("{CONTROLLER_PREFIX}/{{id}}");
    Router::new()
        .route("/insureds", get(list_insureds).post(create_insured))
        .route(
            "/insureds/{id}",
            get(get_insured).put(update_insured).delete(delete_insured),
        )
        .route(CONTROLLER_PREFIX, get(list_insureds).post(create_insured))
        .route(
            &controller_item,
            get(get_insured).put(update_insured).delete(delete_insured),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /insureds: Validate and store a new record.
#[utoipa::path(
    post,
    path = "/insureds",
    request_body = InsuredDraft,
    responses(
        (status = 201, description = "Insured created", body = InsuredPerson),
        (status = 400, description = "Validation failure or malformed body", body = crate::error::ErrorBody),
    ),
    tag = "insureds"
)]
async fn create_insured(
    State(state): State<AppState>,
    body: Result<Json<InsuredDraft>, JsonRejection>,
) -> Result<Response, AppError> {
    let draft = extract_json(body)?;
    let record = state.insureds.create(draft).await?;
    let location = format!("/insureds/{}", record.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    )
        .into_response())
}

/// GET /insureds: List all records, or fetch one when `?id=` is given.
#[utoipa::path(
    get,
    path = "/insureds",
    params(ListQuery),
    responses(
        (status = 200, description = "All records in creation order, or the single record matching `id`", body = Vec<InsuredPerson>),
        (status = 404, description = "No record with the given id", body = crate::error::ErrorBody),
    ),
    tag = "insureds"
)]
async fn list_insureds(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let query = extract_query(query)?;
    match query.id {
        Some(id) => {
            let record = state.insureds.get(InsuredId::new(id)).await?;
            Ok(Json(record).into_response())
        }
        None => {
            let records = state.insureds.list().await?;
            Ok(Json(records).into_response())
        }
    }
}

/// GET /insureds/{id}: Fetch one record.
#[utoipa::path(
    get,
    path = "/insureds/{id}",
    params(("id" = i32, Path, description = "Insured ID")),
    responses(
        (status = 200, description = "Insured found", body = InsuredPerson),
        (status = 404, description = "Insured not found", body = crate::error::ErrorBody),
    ),
    tag = "insureds"
)]
async fn get_insured(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<InsuredPerson>, AppError> {
    let id = InsuredId::new(extract_path(id)?);
    Ok(Json(state.insureds.get(id).await?))
}

/// PUT /insureds/{id}: Replace every mutable field of a record.
#[utoipa::path(
    put,
    path = "/insureds/{id}",
    params(("id" = i32, Path, description = "Insured ID")),
    request_body = InsuredDraft,
    responses(
        (status = 200, description = "Insured updated", body = InsuredPerson),
        (status = 400, description = "Validation failure or malformed body", body = crate::error::ErrorBody),
        (status = 404, description = "Insured not found", body = crate::error::ErrorBody),
    ),
    tag = "insureds"
)]
async fn update_insured(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<InsuredDraft>, JsonRejection>,
) -> Result<Json<InsuredPerson>, AppError> {
    let id = InsuredId::new(extract_path(id)?);
    let draft = extract_json(body)?;
    Ok(Json(state.insureds.update(id, draft).await?))
}

/// DELETE /insureds/{id}: Delete a record.
#[utoipa::path(
    delete,
    path = "/insureds/{id}",
    params(("id" = i32, Path, description = "Insured ID")),
    responses(
        (status = 200, description = "Insured deleted", body = DeleteResponse),
        (status = 404, description = "Insured not found", body = crate::error::ErrorBody),
    ),
    tag = "insureds"
)]
async fn delete_insured(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = InsuredId::new(extract_path(id)?);
    state.insureds.delete(id).await?;
    Ok(Json(DeleteResponse {
        id,
        message: format!("Insured with ID {id} has been deleted."),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        router().with_state(AppState::new())
    }

    fn ana_json() -> serde_json::Value {
        serde_json::json!({
            "firstName": "Ana",
            "lastName": "Lopez",
            "secondLastName": "Garcia",
            "phoneNumber": "555-0100",
            "email": "ana@x.com",
            "birthDate": "1990-01-01",
            "estimatedValue": 1000
        })
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_with_location() {
        let resp = test_app().oneshot(post("/insureds", &ana_json())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/insureds/1");
        let body = body_json(resp).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["firstName"], "Ana");
    }

    #[tokio::test]
    async fn create_without_content_type_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/insureds")
            .body(Body::from(ana_json().to_string()))
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let req = Request::builder()
            .uri("/insureds/abc")
            .body(Body::empty())
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn non_numeric_query_id_is_bad_request() {
        let req = Request::builder()
            .uri("/insureds?id=abc")
            .body(Body::empty())
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let req = Request::builder()
            .method("DELETE")
            .uri("/insureds/9")
            .body(Body::empty())
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["message"], "Insured with ID 9 not found.");
    }
}
