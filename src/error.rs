//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use validator::ValidationErrors;

use crate::logic::features::Feature;
use crate::logic::risk::PipelineError;

pub type AppResult<T> = Result<T, AppError>;

/// Field-level validation detail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub enum AppError {
    // Request errors
    ValidationError(Vec<FieldError>),
    InvalidPayload(StatusCode, String),

    // Artifacts missing
    ServiceUnavailable,

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::ValidationError(fields) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Validation failed".to_string(), Some(fields))
            }
            AppError::InvalidPayload(status, msg) => (status, msg, None),
            AppError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Model not available. Check server artifacts.".to_string(),
                None,
            ),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string(), None)
            }
        };

        let body = match details {
            Some(details) => Json(json!({
                "error": error_message,
                "status": status.as_u16(),
                "details": details,
            })),
            None => Json(json!({
                "error": error_message,
                "status": status.as_u16(),
            })),
        };

        (status, body).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    message: describe(e),
                })
            })
            .collect();

        // Report in column order
        fields.sort_by_key(|f| Feature::from_name(&f.field).map(|x| x.index()).unwrap_or(usize::MAX));
        AppError::ValidationError(fields)
    }
}

fn describe(error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match (error.params.get("min"), error.params.get("max"), error.params.get("value")) {
        (Some(min), Some(max), Some(value)) => {
            format!("value {} out of range [{}, {}]", value, min, max)
        }
        _ => error.code.to_string(),
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        AppError::InvalidPayload(status, rejection.body_text())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::ServiceUnavailable => AppError::ServiceUnavailable,
            PipelineError::Validation(errors) => errors.into(),
            PipelineError::Inference(e) => AppError::InternalError(e.to_string()),
        }
    }
}
