use axum::http::StatusCode;

/// Liveness probe
///
/// Always 200 while the process is serving requests; does not touch the database.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is up"),
    ),
    tag = "health"
)]
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
