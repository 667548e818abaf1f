//! Error types
//!
//! Every lookup fails with one of three kinds of error: a configuration
//! problem (conflicting or missing selectors, missing credentials), a
//! not-found result, or a transport/decoding failure. None are retried.

use reqwest::StatusCode;

/// Longest local error message shown to the user, in characters
const MAX_MESSAGE_CHARS: usize = 160;

/// Errors produced by the Okta client and the data source reads
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    NotFound(String),

    #[error("the API returned an error: {summary} (HTTP {status})")]
    Api {
        status: StatusCode,
        code: Option<String>,
        summary: String,
    },

    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wrap this error with the operation that was running when it happened
    pub fn during(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any operation context
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// HTTP status of the failed API call, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self.root() {
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Error::NotFound(_)) || self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_config(&self) -> bool {
        matches!(self.root(), Error::Config(_))
    }
}

/// Format an Okta error for display
/// Security: maps API failures to generic messages so response details stay in the log
pub fn format_okta_error(error: &Error) -> String {
    if let Error::Context { context, source } = error {
        return format!("{}: {}", context, format_okta_error(source));
    }

    if let Some(status) = error.status() {
        return match status.as_u16() {
            400 => "Invalid request. Check your filter and search parameters.".to_string(),
            401 => "Authentication failed. Check OKTA_API_TOKEN or OKTA_ACCESS_TOKEN.".to_string(),
            403 => "Permission denied. The token is missing the required admin scopes.".to_string(),
            404 => "Resource not found.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            500..=599 => "Okta service temporarily unavailable. Please try again.".to_string(),
            _ => "Request failed. Check your network connection and try again.".to_string(),
        };
    }

    match error.root() {
        Error::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        Error::Decode(_) => "Unexpected response from Okta.".to_string(),
        _ => {
            let visible: Vec<char> = error
                .to_string()
                .chars()
                .filter(|c| !c.is_control())
                .collect();
            if visible.len() > MAX_MESSAGE_CHARS {
                let truncated: String = visible[..MAX_MESSAGE_CHARS].iter().collect();
                format!("{}...", truncated)
            } else {
                visible.into_iter().collect()
            }
        }
    }
}
