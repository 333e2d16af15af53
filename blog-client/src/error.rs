use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl BlogClientError {
    pub async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Self::from_status(status, message)
    }

    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::NOT_FOUND => BlogClientError::NotFound(message),
            StatusCode::UNAUTHORIZED => BlogClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => BlogClientError::Forbidden(message),
            StatusCode::CONFLICT => BlogClientError::Conflict(message),
            StatusCode::BAD_REQUEST => BlogClientError::InvalidRequest(message),
            other => BlogClientError::Server {
                status: other.as_u16(),
                message,
            },
        }
    }
}
