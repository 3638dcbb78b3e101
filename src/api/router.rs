//! Booking API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Access logger

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the booking API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route(
            "/appointments/confirm",
            post(endpoints::appointments::confirm_day),
        )
        .route(
            "/appointments/:id",
            get(endpoints::appointments::detail)
                .patch(endpoints::appointments::update_status)
                .delete(endpoints::appointments::remove),
        )
        .route(
            "/doctors",
            get(endpoints::doctors::list).post(endpoints::doctors::create),
        )
        .route(
            "/doctors/:id",
            get(endpoints::doctors::detail)
                .patch(endpoints::doctors::update)
                .delete(endpoints::doctors::remove),
        )
        .route("/contact", post(endpoints::contact::submit))
        .with_state(ctx);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes)
        // Innermost first, outermost last
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(cors)
}
