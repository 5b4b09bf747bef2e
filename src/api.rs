//! HTTP surface for the student registry.
//!
//! - `POST /students/` – Validate and insert a student; returns `201 {"id": ...}`.
//! - `GET /students/?country=&age=` – List `{name, age}` projections, optionally filtered by
//!   exact `address.country` and inclusive minimum `age`.
//! - `GET /students/{id}` – Fetch the full record.
//! - `PATCH /students/{id}` – Apply a partial update; returns `204` with an empty body.
//! - `DELETE /students/{id}` – Remove the record; returns `200 {"detail": ...}`.
//! - `GET /health` – Report whether the store answers a ping.
//!
//! Collection routes answer with and without the trailing slash.

use crate::store::StudentStore;
use crate::students::{
    ListFilter, StudentError, StudentPayload, StudentRecord, StudentService, StudentSummary,
    ValidationError,
};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the student API surface.
pub fn create_router<S>(service: Arc<StudentService<S>>) -> Router
where
    S: StudentStore + 'static,
{
    Router::new()
        .route(
            "/students",
            get(list_students::<S>).post(create_student::<S>),
        )
        .route(
            "/students/",
            get(list_students::<S>).post(create_student::<S>),
        )
        .route(
            "/students/:id",
            get(get_student::<S>)
                .patch(update_student::<S>)
                .delete(delete_student::<S>),
        )
        .route("/health", get(health::<S>))
        .with_state(service)
}

/// Success response for `POST /students/`.
#[derive(Serialize)]
struct CreatedResponse {
    id: String,
}

/// Insert a validated student.
async fn create_student<S>(
    State(service): State<Arc<StudentService<S>>>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError>
where
    S: StudentStore,
{
    let Json(payload) = payload?;
    let id = service.create(payload).await?;
    tracing::info!(id = %id, "Student created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.to_string() }),
    ))
}

/// Query string accepted by the list route. `age` is the inclusive minimum.
#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    age: Option<i64>,
}

/// Response body for the list route.
#[derive(Serialize)]
struct ListResponse {
    data: Vec<StudentSummary>,
}

/// List students, projecting each record to `{name, age}`.
async fn list_students<S>(
    State(service): State<Arc<StudentService<S>>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError>
where
    S: StudentStore,
{
    let Query(ListQuery { country, age }) = query?;
    let filter = ListFilter {
        country,
        min_age: age,
    };
    tracing::debug!(country = ?filter.country, min_age = ?filter.min_age, "Listing students");
    let data = service.list(filter).await?;
    tracing::info!(count = data.len(), "Student list served");
    Ok(Json(ListResponse { data }))
}

/// Fetch one student.
async fn get_student<S>(
    State(service): State<Arc<StudentService<S>>>,
    Path(id): Path<String>,
) -> Result<Json<StudentRecord>, AppError>
where
    S: StudentStore,
{
    let record = service.get(&id).await?;
    Ok(Json(record))
}

/// Apply a partial update.
async fn update_student<S>(
    State(service): State<Arc<StudentService<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> Result<StatusCode, AppError>
where
    S: StudentStore,
{
    let Json(payload) = payload?;
    service.update(&id, payload).await?;
    tracing::info!(id = %id, "Student updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Remove one student.
async fn delete_student<S>(
    State(service): State<Arc<StudentService<S>>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: StudentStore,
{
    service.delete(&id).await?;
    tracing::info!(id = %id, "Student deleted");
    Ok(Json(json!({ "detail": "Student deleted successfully" })))
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store_reachable: bool,
}

/// Report liveness plus store reachability. Always answers 200.
async fn health<S>(State(service): State<Arc<StudentService<S>>>) -> Json<HealthResponse>
where
    S: StudentStore,
{
    Json(HealthResponse {
        status: "ok",
        store_reachable: service.store_reachable().await,
    })
}

struct AppError(StudentError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0 {
            StudentError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": err.violations })),
            )
                .into_response(),
            StudentError::InvalidIdentifier(err) => {
                tracing::debug!(error = %err, "Rejected malformed identifier");
                detail(StatusCode::BAD_REQUEST, "Invalid ID format")
            }
            StudentError::NotFound => detail(StatusCode::NOT_FOUND, "Student not found"),
            StudentError::Store(err) => {
                tracing::error!(error = %err, "Store request failed");
                detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn detail(status: StatusCode, message: &'static str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

impl From<StudentError> for AppError {
    fn from(inner: StudentError) -> Self {
        Self(inner)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ValidationError::single("body", rejection.body_text()).into())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ValidationError::single("query", rejection.body_text()).into())
    }
}
