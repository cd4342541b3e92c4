use bakery_core::ImageError;
use thiserror::Error;

use crate::session::SessionError;

/// How a failure should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Client-side input problem; blocks submission, never sent.
    Validation,
    /// Network or TLS failure; shown as a dismissible banner.
    Transport,
    /// 401/403 or no stored token; the session has been cleared.
    Authorization,
    /// 404; rendered as an empty state rather than an error.
    NotFound,
    /// Any other backend failure, including server-side validation.
    Server,
}

/// Errors returned by the bakery API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response other than 401, 403 and 404.
    #[error("backend returned HTTP {status}{}", detail_suffix(.message.as_deref()))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// 401 or 403. The stored token has already been cleared.
    #[error("not authorized (HTTP {status}){}", detail_suffix(.message.as_deref()))]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },

    #[error("not found: {path}{}", detail_suffix(.message.as_deref()))]
    NotFound {
        path: String,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// An admin call was attempted with no stored token. No request was sent.
    #[error("authentication required")]
    NotAuthenticated,

    /// An operation that targets an existing entity was given an empty id.
    #[error("{entity} identifier is required")]
    MissingIdentifier { entity: &'static str },

    #[error("invalid image: {0}")]
    Image(#[from] ImageError),

    #[error("session storage error: {0}")]
    Session(#[from] SessionError),
}

fn detail_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ClientError {
    /// HTTP status for errors that came from a backend response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::Unauthorized { status, .. } => {
                Some(*status)
            }
            ClientError::NotFound { .. } => Some(404),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The message the backend put in its error payload, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. }
            | ClientError::Unauthorized { message, .. }
            | ClientError::NotFound { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Image(_) | ClientError::MissingIdentifier { .. } => {
                ErrorCategory::Validation
            }
            ClientError::Http(_) | ClientError::InvalidBaseUrl { .. } | ClientError::Session(_) => {
                ErrorCategory::Transport
            }
            ClientError::Unauthorized { .. } | ClientError::NotAuthenticated => {
                ErrorCategory::Authorization
            }
            ClientError::NotFound { .. } => ErrorCategory::NotFound,
            ClientError::Api { .. } | ClientError::Deserialize { .. } => ErrorCategory::Server,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.category() == ErrorCategory::Authorization
    }

    /// Text suitable for a banner or form error.
    ///
    /// Prefers the backend's own message verbatim and falls back to a
    /// generic sentence per category.
    #[must_use]
    pub fn user_message(&self) -> String {
        if let Some(message) = self.backend_message() {
            return message.to_string();
        }
        match self.category() {
            ErrorCategory::Validation => self.to_string(),
            ErrorCategory::Transport => {
                "Could not reach the bakery server. Please try again.".to_string()
            }
            ErrorCategory::Authorization => "Please sign in to continue.".to_string(),
            ErrorCategory::NotFound => "Nothing found.".to_string(),
            ErrorCategory::Server => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

/// Pulls a human-readable message out of a backend error body.
///
/// Understands FastAPI's `{"detail": "..."}` and
/// `{"detail": [{"msg": "..."}, ...]}` shapes, plus `{"message": "..."}`.
/// Non-JSON bodies yield `None`.
pub(crate) fn extract_backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => return Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
