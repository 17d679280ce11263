//! Error types for the HTTP gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::TransferError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, ApiError>;

/// Application error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// The file was retrieved but could not be sent back
    #[error("Failed to send file")]
    Stream(#[source] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Transfer(TransferError::Io(err))
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Transfer(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Transfer(e) => match e {
                TransferError::InvalidRootHash(_) => "INVALID_ROOT_HASH",
                TransferError::Indexing(_) => "INDEXING_ERROR",
                TransferError::Upload(_) => "UPLOAD_ERROR",
                TransferError::Download(_) => "DOWNLOAD_ERROR",
                TransferError::Unavailable(_) => "STORAGE_UNAVAILABLE",
                TransferError::Io(_) => "IO_ERROR",
            },
            ApiError::Stream(_) => "STREAM_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            match &self {
                ApiError::Stream(e) => tracing::error!("Stream error: {}", e),
                other => tracing::error!("Request failed: {}", other),
            }
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("No file uploaded".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(TransferError::InvalidRootHash("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(TransferError::Upload("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Stream(std::io::Error::other("gone")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_transfer_message_is_preserved() {
        let err = ApiError::from(TransferError::Indexing("bad tree".into()));
        assert_eq!(err.to_string(), "Error generating Merkle tree: bad tree");
        assert_eq!(err.code(), "INDEXING_ERROR");
    }
}
