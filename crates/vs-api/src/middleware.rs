//! vent-space/crates/vs-api/src/middleware.rs Middleware
//!
//! Access logging and CORS for the Vent Space API.

use actix_cors::Cors;
use actix_web::middleware::Logger;

// Logs remote-ip "request-line" status-code response-size and latency.
pub fn standard_middleware() -> Logger {
    Logger::new(r#"%a "%r" %s %b %Dms"#)
}

// The SSE feed and JSON API may be consumed from another origin.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600)
}
