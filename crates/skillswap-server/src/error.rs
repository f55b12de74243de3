use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use skillswap_core::{AuthError, MarketError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Market(#[from] MarketError),

    /// Body or query string that failed to deserialize.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Market(err) => match err {
                MarketError::Validation(_) => StatusCode::BAD_REQUEST,
                MarketError::Auth(AuthError::MissingCredential) => StatusCode::UNAUTHORIZED,
                MarketError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
                MarketError::Auth(AuthError::InvalidToken(_)) => StatusCode::FORBIDDEN,
                MarketError::NotFound(_) => StatusCode::NOT_FOUND,
                MarketError::Conflict(_) => StatusCode::CONFLICT,
                MarketError::Store(_) | MarketError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
