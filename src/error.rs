use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned with every 500 response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A dashboard view could not be computed. `operation` names the view
    /// ("current statistics", "people flow", ...); `details` carries the fault text.
    #[error("Failed to fetch {operation}: {details}")]
    Aggregation {
        operation: &'static str,
        details: String,
    },
}

impl AppError {
    /// Attach the failing operation name to any fault.
    pub fn aggregation(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Aggregation {
            operation,
            details: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Self::Aggregation { operation, details } = self;
        tracing::error!(operation, details = %details, "aggregation failed");

        let body = Json(ErrorBody {
            error: format!("Failed to fetch {operation}"),
            details,
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
