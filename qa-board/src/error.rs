use crate::validation::FieldErrors;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use shared_types::ErrorResponse;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Bare field map so clients can key on field names
            AppError::Validation(errors) => HttpResponse::BadRequest().json(errors),
            AppError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
                error: self.error_type(),
                message: message.clone(),
            }),
            // Driver details stay in the log
            AppError::Database(_) => {
                error!(error = %self, "Request failed");
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: self.error_type(),
                    message: "The request could not be completed".to_string(),
                })
            }
        }
    }
}

impl AppError {
    pub fn question_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Question {id} not found"))
    }

    pub fn answer_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Answer {id} not found"))
    }

    fn error_type(&self) -> String {
        match self {
            AppError::Validation(_) => "validation_error".to_string(),
            AppError::NotFound(_) => "not_found".to_string(),
            AppError::Database(_) => "database_error".to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
