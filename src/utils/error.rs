use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Longest response-body excerpt shown to the user.
pub const BODY_SNIPPET_LIMIT: usize = 300;

/// Failure of a single HTTP attempt, or the last one of a retried fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<String>,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Connection refused, DNS failure, body read failure: no status available.
    Transport,
    Timeout,
    /// A response arrived with a non-2xx status.
    Status,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            message: message.into(),
            status: None,
            body: None,
            attempts: 1,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Timeout,
            ..Self::transport(message)
        }
    }

    pub fn status(status: u16, body: String) -> Self {
        Self {
            kind: FetchErrorKind::Status,
            message: format!("request failed with status code {}", status),
            status: Some(status),
            body: (!body.is_empty()).then_some(body),
            attempts: 1,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Network-level failures, timeouts and 5xx responses are worth another try.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            FetchErrorKind::Transport | FetchErrorKind::Timeout => true,
            FetchErrorKind::Status => matches!(self.status, None | Some(500..=599)),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if self.attempts > 1 {
            write!(f, " (after {} attempts)", self.attempts)?;
        }
        Ok(())
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::timeout(err.to_string())
        } else {
            FetchError::transport(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Network error: {0}")]
    NetworkError(FetchError),

    #[error("Client error: {0}")]
    ClientError(FetchError),

    #[error("CSV format error: {message}")]
    FormatError { message: String },

    #[error("Filesystem error at {}: {source}", .path.display())]
    FilesystemError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Network,
    Client,
    Format,
    Filesystem,
}

impl From<FetchError> for ExportError {
    fn from(err: FetchError) -> Self {
        if err.is_retryable() {
            ExportError::NetworkError(err)
        } else {
            ExportError::ClientError(err)
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::FormatError {
            message: err.to_string(),
        }
    }
}

impl ExportError {
    pub fn missing(field: &str) -> Self {
        ExportError::MissingConfigError {
            field: field.to_string(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::FilesystemError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ExportError::MissingConfigError { .. } | ExportError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            ExportError::NetworkError(_) => ErrorCategory::Network,
            ExportError::ClientError(_) => ErrorCategory::Client,
            ExportError::FormatError { .. } | ExportError::SerializationError(_) => {
                ErrorCategory::Format
            }
            ExportError::FilesystemError { .. } => ErrorCategory::Filesystem,
        }
    }

    fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            ExportError::NetworkError(e) | ExportError::ClientError(e) => Some(e),
            _ => None,
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        self.fetch_error().and_then(|e| e.status)
    }

    /// The response body as JSON text, cut at [`BODY_SNIPPET_LIMIT`] characters.
    /// A trailing ellipsis marks a cut.
    pub fn body_snippet(&self) -> Option<String> {
        let body = self.fetch_error()?.body.as_deref()?;
        let details = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value.to_string(),
            Err(_) => serde_json::Value::String(body.to_string()).to_string(),
        };
        let snippet: String = details.chars().take(BODY_SNIPPET_LIMIT).collect();
        if snippet.chars().count() >= BODY_SNIPPET_LIMIT {
            Some(format!("{}…", snippet))
        } else {
            Some(snippet)
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Config => {
                "Check the command-line flags and the API_URL / API_KEY / TIMEOUT_MS variables"
            }
            ErrorCategory::Network => {
                "Check connectivity to the API, or raise --retries / --timeout"
            }
            ErrorCategory::Client => "Check the URL and the API key (--key or API_KEY)",
            ErrorCategory::Format => "Export as json, the payload cannot be laid out as a table",
            ErrorCategory::Filesystem => "Check that the output directory is writable (--out)",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
