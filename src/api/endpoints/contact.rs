//! Contact form endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::contact::{self, ContactAck, ContactMessage};

/// `POST /api/contact`: `{ name, email, message }`.
pub async fn submit(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ContactMessage>, JsonRejection>,
) -> Result<Json<ContactAck>, ApiError> {
    let Json(message) = payload?;
    Ok(Json(contact::submit(&ctx.core, message)?))
}
