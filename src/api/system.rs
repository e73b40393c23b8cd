use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// `GET /` — liveness payload, kept byte-compatible with the original
/// service.
pub async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        message: "API de Notícias está funcionando!",
    })
}
