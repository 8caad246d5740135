//! Helpers shared by the HTTP adapters

use draftloop_application::ProviderFailure;
use draftloop_domain::FailureKind;
use serde_json::Value;

/// Join a base URL and a path without doubling the slash.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Error code and message pulled out of an API error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    pub code: Option<String>,
    pub message: String,
}

/// Understands `{"error": {"code", "type", "message"}}`, flat
/// `{"code", "message"}` and `{"detail"}` bodies. Anything else is kept as
/// raw text.
pub(crate) fn parse_api_error(body: &str) -> ApiError {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return ApiError {
            code: None,
            message: body.trim().to_string(),
        };
    };

    let object = match value.get("error") {
        Some(error @ Value::Object(_)) => error,
        Some(Value::String(message)) => {
            return ApiError {
                code: None,
                message: message.clone(),
            };
        }
        _ => &value,
    };

    let code = ["code", "type"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
    let message = ["message", "detail", "msg"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string());

    ApiError { code, message }
}

/// Failure for a non-success HTTP response.
pub(crate) fn status_failure(status: u16, body: &str) -> ProviderFailure {
    let error = parse_api_error(body);
    let failure = ProviderFailure::http(status, error.message);
    match error.code {
        Some(code) => failure.with_code(code),
        None => failure,
    }
}

/// Failure for a request that never produced a response.
pub(crate) fn transport_failure(error: &reqwest::Error) -> ProviderFailure {
    let failure = ProviderFailure::new(error.to_string());
    if error.is_timeout() {
        failure.with_kind(FailureKind::Timeout)
    } else if error.is_connect() || error.is_request() {
        failure.with_kind(FailureKind::Network)
    } else {
        failure
    }
}
