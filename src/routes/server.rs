use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::messages;
use crate::response::ApiResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub version: &'static str,
    pub message: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Server",
    responses((status = 200, description = "Service information", body = ServiceInfo))
)]
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        version: env!("CARGO_PKG_VERSION"),
        message: messages::WELCOME,
    })
}

pub async fn not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::NOT_FOUND, Json(ApiResponse::message(messages::NOTHING_TO_DO)))
}
