pub mod cli;
pub mod env;

use crate::domain::model::{ExportFormat, ExportTarget, FetchRequest, DEFAULT_TIMEOUT_MS};
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{
    parse_number, validate_file_name, validate_out_dir, validate_timeout_ms, Validate,
};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use cli::CliArgs;
pub use env::EnvConfig;

/// Filename suffix format, e.g. `2024-03-09_14-05-59`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        self.format.parse::<ExportFormat>()?;
        validate_out_dir("out", &self.out)?;
        validate_file_name("name", &self.name)?;
        if let Some(timeout) = self.timeout {
            validate_timeout_ms("timeout", timeout)?;
        }
        Ok(())
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub request: FetchRequest,
    pub target: ExportTarget,
}

impl RunConfig {
    /// Merges flags over environment values. Flags win; an empty `--url` falls
    /// back to `API_URL`, while an explicit `--key` (even empty) replaces `API_KEY`.
    ///
    /// Everything that can be rejected without the network is rejected here.
    pub fn resolve(cli: &CliArgs, env: &EnvConfig, now: DateTime<Local>) -> Result<Self> {
        let url = cli
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(env.api_url.as_deref())
            .ok_or_else(|| ExportError::missing("API URL (use --url <...> or set API_URL)"))?;

        cli.validate()?;
        let format: ExportFormat = cli.format.parse()?;

        let timeout_ms = match (cli.timeout, env.timeout_ms.as_deref()) {
            (Some(timeout), _) => timeout,
            (None, Some(raw)) => {
                let timeout = parse_number("TIMEOUT_MS", raw)?;
                validate_timeout_ms("TIMEOUT_MS", timeout)?;
                timeout
            }
            (None, None) => DEFAULT_TIMEOUT_MS,
        };

        let token = cli.key.as_deref().or(env.api_key.as_deref()).unwrap_or("");

        let request = FetchRequest::new(url)?
            .with_bearer_token(token)
            .with_timeout(Duration::from_millis(timeout_ms))
            .with_max_retries(cli.retries)
            .with_retry_delay(Duration::from_millis(cli.retry_delay));

        let base_name = if cli.no_timestamp {
            cli.name.clone()
        } else {
            format!("{}_{}", cli.name, now.format(TIMESTAMP_FORMAT))
        };

        let target = ExportTarget::new(resolve_output_dir(&cli.out)?, base_name, format);

        Ok(Self { request, target })
    }

    /// Reads the environment (and `.env`) and resolves against the current time.
    pub fn from_args(cli: &CliArgs) -> Result<Self> {
        Self::resolve(cli, &EnvConfig::load(), Local::now())
    }

    pub fn log_summary(&self) {
        tracing::info!("🚀 API export");
        tracing::info!("• URL: {}", self.request.url);
        tracing::info!("• Format: {}", self.target.format);
        tracing::info!("• Output: {}", self.target.directory.display());
        tracing::info!("• Retries: {}", self.request.max_retries);
    }
}

fn resolve_output_dir(out: &str) -> Result<PathBuf> {
    let path = Path::new(out);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| ExportError::filesystem(".", e))?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;
    use chrono::TimeZone;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["api-export"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap()
    }

    fn env_with_url() -> EnvConfig {
        EnvConfig {
            api_url: Some("https://env.example.com/data".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_url() {
        let err = RunConfig::resolve(&args(&[]), &EnvConfig::default(), fixed_now()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(err.to_string().contains("API URL"));
    }

    #[test]
    fn test_empty_url_flag_falls_back_to_env() {
        let config = RunConfig::resolve(&args(&["--url", ""]), &env_with_url(), fixed_now()).unwrap();
        assert_eq!(config.request.url.as_str(), "https://env.example.com/data");
    }

    #[test]
    fn test_url_flag_overrides_env() {
        let config = RunConfig::resolve(
            &args(&["-u", "https://flag.example.com/items"]),
            &env_with_url(),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(config.request.url.as_str(), "https://flag.example.com/items");
    }

    #[test]
    fn test_invalid_format_is_config_error() {
        let err = RunConfig::resolve(&args(&["-f", "xml"]), &env_with_url(), fixed_now()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(err.to_string().contains("invalid format"));
    }

    #[test]
    fn test_missing_url_reported_before_invalid_format() {
        let err = RunConfig::resolve(&args(&["-f", "xml"]), &EnvConfig::default(), fixed_now())
            .unwrap_err();
        assert!(matches!(err, ExportError::MissingConfigError { .. }));
    }

    #[test]
    fn test_timestamp_suffix() {
        let config = RunConfig::resolve(&args(&["-n", "users"]), &env_with_url(), fixed_now()).unwrap();
        assert_eq!(config.target.base_name, "users_2024-03-09_14-05-59");

        let plain = RunConfig::resolve(
            &args(&["-n", "users", "--no-timestamp"]),
            &env_with_url(),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(plain.target.base_name, "users");
    }

    #[test]
    fn test_timeout_precedence() {
        let env = EnvConfig {
            timeout_ms: Some("2000".to_string()),
            ..env_with_url()
        };

        let from_env = RunConfig::resolve(&args(&[]), &env, fixed_now()).unwrap();
        assert_eq!(from_env.request.timeout, Duration::from_millis(2000));

        let from_flag = RunConfig::resolve(&args(&["-t", "750"]), &env, fixed_now()).unwrap();
        assert_eq!(from_flag.request.timeout, Duration::from_millis(750));

        let default = RunConfig::resolve(&args(&[]), &env_with_url(), fixed_now()).unwrap();
        assert_eq!(default.request.timeout, Duration::from_millis(15_000));
    }

    #[test]
    fn test_invalid_env_timeout() {
        let env = EnvConfig {
            timeout_ms: Some("soon".to_string()),
            ..env_with_url()
        };
        let err = RunConfig::resolve(&args(&[]), &env, fixed_now()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = RunConfig::resolve(&args(&["-t", "0"]), &env_with_url(), fixed_now()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_key_precedence() {
        let env = EnvConfig {
            api_key: Some("env-key".to_string()),
            ..env_with_url()
        };

        let from_env = RunConfig::resolve(&args(&[]), &env, fixed_now()).unwrap();
        assert_eq!(
            from_env.request.headers.get("Authorization").map(String::as_str),
            Some("Bearer env-key")
        );

        let from_flag = RunConfig::resolve(&args(&["-k", "flag-key"]), &env, fixed_now()).unwrap();
        assert_eq!(
            from_flag.request.headers.get("Authorization").map(String::as_str),
            Some("Bearer flag-key")
        );

        let cleared = RunConfig::resolve(&args(&["--key", ""]), &env, fixed_now()).unwrap();
        assert!(cleared.request.headers.is_empty());
    }

    #[test]
    fn test_retry_settings() {
        let config = RunConfig::resolve(
            &args(&["-r", "0", "--retry-delay", "50"]),
            &env_with_url(),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(config.request.max_retries, 0);
        assert_eq!(config.request.retry_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_relative_output_dir_is_resolved() {
        let config = RunConfig::resolve(&args(&["-o", "dumps"]), &env_with_url(), fixed_now()).unwrap();
        assert!(config.target.directory.is_absolute());
        assert!(config.target.directory.ends_with("dumps"));
    }
}
