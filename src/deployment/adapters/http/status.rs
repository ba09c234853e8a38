//! Maps unsuccessful backend responses onto [`GatewayError`].

use super::dto::ApiErrorBody;
use crate::deployment::ports::GatewayError;
use reqwest::StatusCode;

/// Classifies an unsuccessful response.
///
/// The message is the JSON `error` field when present, otherwise the raw
/// body, otherwise the canonical status reason.
pub(super) fn classify(status: StatusCode, body: &str) -> GatewayError {
    let message = error_message(status, body);
    match status {
        StatusCode::NOT_FOUND => GatewayError::NotFound(message),
        StatusCode::CONFLICT => GatewayError::Conflict(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        _ => GatewayError::Unknown {
            status: status.as_u16(),
            message,
        },
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .filter(|error| !error.trim().is_empty());
    if let Some(error) = from_json {
        return error;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_owned();
    }
    format!(
        "HTTP error! status: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_owned()
}
