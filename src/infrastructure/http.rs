use reqwest::{RequestBuilder, Response, StatusCode};

use crate::domain::DomainError;

pub fn map_transport_error(e: reqwest::Error) -> DomainError {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        DomainError::network(e.to_string())
    } else if e.is_decode() {
        DomainError::external(format!("unexpected response body: {e}"))
    } else {
        DomainError::external(e.to_string())
    }
}

pub fn map_status(status: StatusCode, body: &str) -> DomainError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{status}: {}", body.trim())
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DomainError::unauthorized(detail),
        StatusCode::NOT_FOUND => DomainError::not_found(detail),
        _ => DomainError::external(detail),
    }
}

/// Sends the request and turns transport failures and non-2xx statuses into
/// [`DomainError`]s.
pub async fn send(request: RequestBuilder) -> Result<Response, DomainError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(map_status(status, &body))
}

/// Reads an API token from the environment at call time.
pub fn token_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|t| !t.trim().is_empty())
}
