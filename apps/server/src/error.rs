use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use catalog_core::errors::{CategoryError, DatabaseError, Error as CoreError, ImageError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Category(e) => match e {
            CategoryError::NotFound(_) => StatusCode::NOT_FOUND,
            CategoryError::InvalidHierarchy(_)
            | CategoryError::CyclicHierarchy { .. }
            | CategoryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CategoryError::HasChildren(_) | CategoryError::DuplicateSlug(_) => {
                StatusCode::CONFLICT
            }
            CategoryError::InternalConsistency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Image(e) => match e {
            ImageError::Empty => StatusCode::BAD_REQUEST,
            ImageError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ImageError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ImageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        CoreError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
        CoreError::Database(DatabaseError::UniqueViolation(_)) => StatusCode::CONFLICT,
        CoreError::Database(_) | CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => (core_status(e), e.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };
        if status.is_server_error() {
            error!("Request failed: {}", msg);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
