use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::ValidationErrors;

use crate::dto::api_response::{ApiResponse, FieldViolation};

pub type Result<T> = std::result::Result<T, Error>;

pub const EMAIL_EXISTS: &str = "Email already exists";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    Conflict { field: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid request body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("Invalid path: {0}")]
    Path(#[from] PathRejection),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{message}: {source}")]
    Operation {
        message: &'static str,
        source: Box<Error>,
    },
}

impl Error {
    pub fn email_conflict() -> Self {
        Error::Conflict {
            field: "email",
            message: EMAIL_EXISTS.to_string(),
        }
    }

    pub fn candidate_not_found(id: i32) -> Self {
        Error::NotFound(format!("Candidate with ID {} not found", id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Json(rejection) => rejection.status(),
            Error::Query(rejection) => rejection.status(),
            Error::Path(rejection) => rejection.status(),
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::Config(_)
            | Error::Database(_)
            | Error::Migration(_)
            | Error::Internal(_)
            | Error::Operation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Underlying cause as reported to clients in the `error` field.
    fn detail(&self) -> String {
        match self {
            Error::Database(err) => err.to_string(),
            Error::Internal(msg) | Error::Config(msg) => msg.clone(),
            Error::Operation { source, .. } => source.detail(),
            other => other.to_string(),
        }
    }

    fn is_server_side(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body: ApiResponse<()> = match self {
            Error::Validation(errors) => {
                let violations = FieldViolation::from_errors(&errors);
                ApiResponse::failure("Validation failed").with_violations(violations)
            }
            Error::Json(rejection) => ApiResponse::failure(rejection.body_text()),
            Error::Query(rejection) => ApiResponse::failure(rejection.body_text()),
            Error::Path(rejection) => ApiResponse::failure(rejection.body_text()),
            Error::NotFound(message) => ApiResponse::failure(message),
            Error::Conflict { field, message } => ApiResponse::failure(message).with_field(field),
            Error::Operation { message, source } => {
                ApiResponse::failure(message).with_error(source.detail())
            }
            other => {
                let detail = other.detail();
                ApiResponse::failure("An unexpected error occurred").with_error(detail)
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Error::email_conflict(),
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

/// Attaches an operation-level message to server-side failures.
///
/// Client errors (validation, not found, conflict) pass through untouched so
/// their status and field tagging survive.
pub trait ResultExt<T> {
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, message: &'static str) -> Result<T> {
        self.map_err(|err| {
            if err.is_server_side() {
                Error::Operation {
                    message,
                    source: Box::new(err),
                }
            } else {
                err
            }
        })
    }
}
