//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use registry_telemetry::record_error;
use serde_json::json;
use shared_bus::BrokerError;
use shared_types::CodecError;
use thiserror::Error;
use tracing::{error, warn};

use crate::service::ServiceError;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed path, query or body.
    #[error("{0}")]
    BadRequest(String),

    /// Nothing matches the request.
    #[error("{0}")]
    NotFound(String),

    /// The underlying operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        ApiError::Service(ServiceError::Codec(err))
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Broker(BrokerError::Unavailable(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "[runtime] Request failed");
            record_error!("runtime", "api");
        } else {
            warn!(error = %self, status = status.as_u16(), "[runtime] Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rg_02_transaction_store::StoreError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("bad hash".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("no block".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        let unavailable: ApiError =
            ServiceError::from(BrokerError::Unavailable("down".into())).into();
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        let store: ApiError = ServiceError::from(StoreError::EmptyBlock).into();
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
