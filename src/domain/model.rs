use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::utils::error::{ExportError, Result};
use crate::utils::validation::parse_http_url;

/// The fetched value, exactly as the API returned it.
pub type Payload = serde_json::Value;

/// One row destined for the CSV table.
pub type ExportRecord = serde_json::Value;

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 600;

/// Everything the fetcher needs for one invocation. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: Url,
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl FetchRequest {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: parse_http_url("url", url)?,
            headers: HashMap::new(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds `Authorization: Bearer <token>`; an empty token leaves the request unauthenticated.
    pub fn with_bearer_token(self, token: &str) -> Self {
        if token.is_empty() {
            self
        } else {
            self.with_header("Authorization", format!("Bearer {}", token))
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Both,
}

impl ExportFormat {
    pub fn wants_json(self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::Both)
    }

    pub fn wants_csv(self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "both" => Ok(ExportFormat::Both),
            _ => Err(ExportError::InvalidConfigValueError {
                field: "format".to_string(),
                value: s.to_string(),
                reason: "invalid format, use one of: json | csv | both".to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Both => "both",
        };
        f.write_str(name)
    }
}

/// Where and how the payload is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub directory: PathBuf,
    pub base_name: String,
    pub format: ExportFormat,
}

impl ExportTarget {
    pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>, format: ExportFormat) -> Self {
        Self {
            directory: directory.into(),
            base_name: base_name.into(),
            format,
        }
    }

    pub fn file_path(&self, extension: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", self.base_name, extension))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Outcome of a completed run, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub json_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn written(&self) -> Vec<&Path> {
        self.json_path
            .iter()
            .chain(self.csv_path.iter())
            .map(PathBuf::as_path)
            .collect()
    }
}
