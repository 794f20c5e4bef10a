//! Structured transport errors.

use std::fmt;

use serde_json::Value;

/// Message shown for network/transport failures.
pub const CONNECTION_MESSAGE: &str = "Erro de conexão com o servidor. Tente novamente.";

/// Message shown after a 401 tore the session down.
pub const SESSION_EXPIRED_MESSAGE: &str = "Sessão expirada. Faça login novamente com `t4b login`.";

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Request never produced a response (DNS, refused connection, timeout)
    Transport,
    /// HTTP 401; the session has already been cleared
    Unauthorized,
    /// Any other non-success HTTP status
    Status,
    /// Response body could not be decoded
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::Status => write!(f, "http_status"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Error returned by every API façade call.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// One-line summary suitable for display
    pub message: String,
    /// Raw response body, if any
    pub body: Option<String>,
}

impl ApiError {
    pub fn transport(err: &reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            message: CONNECTION_MESSAGE.to_string(),
            body: Some(err.to_string()),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            status: Some(401),
            message: SESSION_EXPIRED_MESSAGE.to_string(),
            body: None,
        }
    }

    /// Creates an HTTP status error, preferring the backend's `detail` text.
    pub fn http_status(status: u16, body: &str) -> Self {
        let body = (!body.is_empty()).then(|| body.to_string());
        let message = match body.as_deref().and_then(extract_detail) {
            Some(detail) => format!("HTTP {status}: {detail}"),
            None => format!("HTTP {status}"),
        };
        Self {
            kind: ApiErrorKind::Status,
            status: Some(status),
            message,
            body,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: message.into(),
            body: None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    /// Returns true for the given HTTP status.
    pub fn has_status(&self, status: u16) -> bool {
        self.status == Some(status)
    }

    /// Returns the backend-provided `detail` message, if the body carried one.
    pub fn detail(&self) -> Option<String> {
        self.body.as_deref().and_then(extract_detail)
    }

    /// Returns the message to show the user: the server's `detail` for
    /// business failures, a generic text for transport failures, and
    /// `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind {
            ApiErrorKind::Transport => CONNECTION_MESSAGE.to_string(),
            ApiErrorKind::Unauthorized => SESSION_EXPIRED_MESSAGE.to_string(),
            ApiErrorKind::Status | ApiErrorKind::Parse => {
                self.detail().unwrap_or_else(|| fallback.to_string())
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Extracts the `detail` field of an error body.
///
/// Accepts both `{"detail": "text"}` and validation lists of the form
/// `{"detail": [{"msg": "..."}, ...]}`.
fn extract_detail(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    match json.get("detail")? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let err = ApiError::http_status(400, r#"{"detail": "Email inválido"}"#);
        assert_eq!(err.detail().as_deref(), Some("Email inválido"));
        assert_eq!(err.message, "HTTP 400: Email inválido");
        assert_eq!(err.user_message("fallback"), "Email inválido");
    }

    #[test]
    fn test_detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "email"], "msg": "field required"},
                                 {"loc": ["body", "code"], "msg": "too short"}]}"#;
        let err = ApiError::http_status(422, body);
        assert_eq!(err.detail().as_deref(), Some("field required; too short"));
    }

    #[test]
    fn test_non_json_body_uses_fallback() {
        let err = ApiError::http_status(500, "Internal Server Error");
        assert_eq!(err.detail(), None);
        assert_eq!(err.message, "HTTP 500");
        assert_eq!(err.user_message("Erro ao salvar"), "Erro ao salvar");
    }

    #[test]
    fn test_unauthorized_message() {
        let err = ApiError::unauthorized();
        assert!(err.is_unauthorized());
        assert!(err.has_status(401));
        assert!(err.user_message("x").contains("t4b login"));
    }
}
