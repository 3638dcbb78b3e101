//! Appointment endpoints.
//!
//! - `GET /api/appointments`: list, optionally filtered by `date` / `doctor`
//! - `POST /api/appointments`: book
//! - `GET /api/appointments/:id`: one record
//! - `PATCH /api/appointments/:id`: change status
//! - `DELETE /api/appointments/:id`: remove
//! - `POST /api/appointments/confirm`: bulk daily confirmation

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::appointment::{
    self, AppointmentFilter, ConfirmDayRequest, ConfirmDayResult, NewAppointment, StatusUpdate,
};
use crate::models::Appointment;

/// `GET /api/appointments`: full snapshot, earliest slot first.
pub async fn list(
    State(ctx): State<ApiContext>,
    filter: Result<Query<AppointmentFilter>, QueryRejection>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let Query(filter) = filter?;
    let appointments = appointment::list(&ctx.core, &filter)?;
    Ok(Json(appointments))
}

/// `POST /api/appointments`: create a pending appointment.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let Json(request) = payload?;
    let stored = appointment::book(&ctx.core, request)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /api/appointments/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(appointment::get(&ctx.core, &id)?))
}

/// `PATCH /api/appointments/:id`: `{ "status": ... }`.
pub async fn update_status(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let Json(update) = payload?;
    let updated = appointment::set_status(&ctx.core, &id, update)?;
    Ok(Json(updated))
}

/// `DELETE /api/appointments/:id`: returns the removed record.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let removed = appointment::remove(&ctx.core, &id)?;
    Ok(Json(removed))
}

/// `POST /api/appointments/confirm`: `{ "date": "YYYY-MM-DD" }`.
pub async fn confirm_day(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ConfirmDayRequest>, JsonRejection>,
) -> Result<Json<ConfirmDayResult>, ApiError> {
    let Json(request) = payload?;
    let result = appointment::confirm_day(&ctx.core, request)?;
    Ok(Json(result))
}
