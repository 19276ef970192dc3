use crate::error::AppError;

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Liveness probe",
    responses((status = 200, description = "Service is up", body = String, example = "ok")),
)]
pub async fn health() -> &'static str {
    "ok"
}

/// Any path without a route.
pub async fn not_found() -> AppError {
    AppError::NotFound("Page not found".into())
}
