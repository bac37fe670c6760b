// Route exports
pub mod availability;
pub mod interviews;
pub mod matchmaking;

use actix_web::{http::StatusCode, web, HttpResponse};

use crate::models::ErrorResponse;
use crate::services::StoreError;

pub use matchmaking::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matchmaking::configure)
            .configure(availability::configure)
            .configure(interviews::configure),
    );
}

/// Map a store error onto the wire error shape
pub(crate) fn store_error_response(err: &StoreError) -> HttpResponse {
    let (status, label) = match err {
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        StoreError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        StoreError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
        StoreError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        StoreError::SqlxError(_) | StoreError::MigrateError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: label.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}
