//! HTTP API for the booking service.
//!
//! Routes are nested under `/api/`. Handlers are thin: they extract the
//! request, call the domain modules (`appointment`, `doctor`, `contact`)
//! and map `CoreError` into a structured `ApiError` body.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server_on, ApiServer, ApiSession, ServerError};
pub use types::ApiContext;
