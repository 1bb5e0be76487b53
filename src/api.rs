//! JSON envelope shared by every API endpoint.
//!
//! Callers branch on `success`; errors carry a kind from the fixed taxonomy
//! (`validation`, `authentication`, `authorization`, `not_found`, `unknown`)
//! and, for validation failures, optional field-level detail.

use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize, Debug, Clone)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

#[derive(Serialize, Debug)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: ApiErrorDetail,
}

/// 200 response with `{"success": true, "data": ...}`.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiSuccess { success: true, data })
}
