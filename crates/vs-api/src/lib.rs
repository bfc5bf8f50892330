//! # vs-api
//!
//! The web routing and orchestration layer for Vent Space.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

pub use error::{ApiError, ApiResult};
pub use handlers::AppState;

/// Configures the routes.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            // The page, rendered server side
            .route("/", web::get().to(handlers::index))
            // HTML form posting endpoint
            .route("/vents", web::post().to(handlers::create_vent_form))
            .route("/api/vents", web::get().to(handlers::list_vents))
            .route("/api/vents", web::post().to(handlers::create_vent))
            // Live feed
            .route("/api/vents/stream", web::get().to(handlers::stream_vents))
            .route("/health", web::get().to(handlers::health)),
    );
}
