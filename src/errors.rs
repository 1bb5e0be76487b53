use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use crate::api::{ApiErrorBody, ApiErrorDetail, FieldError};

/// Application error, one variant per kind in the public error taxonomy.
/// Raw store errors never cross the handler boundary; they surface as the
/// `unknown` kind with a generic message.
#[derive(Debug)]
pub enum AppError {
    Validation {
        message: String,
        field_errors: Vec<FieldError>,
    },
    Authentication,
    Authorization(String),
    NotFound(String),
    Db(sqlx::Error),
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field_errors: vec![],
        }
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        AppError::Validation {
            message: message.clone(),
            field_errors: vec![FieldError {
                field: field.to_string(),
                message,
            }],
        }
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }

    /// Taxonomy tag as serialized in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation",
            AppError::Authentication => "authentication",
            AppError::Authorization(_) => "authorization",
            AppError::NotFound(_) => "not_found",
            AppError::Db(_) | AppError::Internal(_) => "unknown",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation { message, .. } => write!(f, "Validation error: {message}"),
            AppError::Authentication => write!(f, "Not authenticated"),
            AppError::Authorization(msg) => write!(f, "Not authorized: {msg}"),
            AppError::NotFound(msg) => write!(f, "{msg}"),
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (message, field_errors) = match self {
            AppError::Validation {
                message,
                field_errors,
            } => (message.clone(), field_errors.clone()),
            AppError::Authentication => ("Authentication required".to_string(), vec![]),
            AppError::Authorization(msg) => (msg.clone(), vec![]),
            AppError::NotFound(msg) => (msg.clone(), vec![]),
            AppError::Db(_) | AppError::Internal(_) => {
                log::error!("{self}");
                ("Unexpected internal error".to_string(), vec![])
            }
        };

        HttpResponse::build(self.status_code()).json(ApiErrorBody {
            success: false,
            error: ApiErrorDetail {
                kind: self.kind(),
                message,
                field_errors,
            },
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {e}"))
    }
}
