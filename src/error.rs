use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures to load or validate the input tables.
///
/// These signal broken infrastructure (missing or corrupt sources), never an
/// empty-but-valid recommendation result.
#[derive(thiserror::Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to read {location}: {error}")]
    Io {
        location: String,
        #[source]
        error: std::io::Error,
    },

    #[error("Malformed row in {location} at line {line}: {message}")]
    Parse {
        location: String,
        line: usize,
        message: String,
    },

    #[error("Missing column '{column}' in {location} at line {line}")]
    MissingColumn {
        location: String,
        line: usize,
        column: &'static str,
    },

    #[error("Unsupported table format for {location}")]
    UnsupportedFormat { location: String },

    #[error("Duplicate news_id '{news_id}' in {location}")]
    DuplicateNewsId { location: String, news_id: String },

    #[error("Invalid table {location}: {message}")]
    Invalid { location: String, message: String },
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Data load error: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DataLoad(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
