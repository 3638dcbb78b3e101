//! Doctor registry endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::doctor::{self, NewDoctor};
use crate::models::{Doctor, DoctorPatch};

/// `GET /api/doctors`: sorted by name.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Doctor>>, ApiError> {
    Ok(Json(doctor::list(&ctx.core)?))
}

/// `POST /api/doctors`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewDoctor>, JsonRejection>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    let Json(request) = payload?;
    let stored = doctor::register(&ctx.core, request)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /api/doctors/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    Ok(Json(doctor::get(&ctx.core, &id)?))
}

/// `PATCH /api/doctors/:id`: partial update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<DoctorPatch>, JsonRejection>,
) -> Result<Json<Doctor>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(doctor::update(&ctx.core, &id, patch)?))
}

/// `DELETE /api/doctors/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    Ok(Json(doctor::remove(&ctx.core, &id)?))
}
