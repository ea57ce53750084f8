use crate::utils::error::{ExportError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ExportError {
    ExportError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Only absolute http(s) URLs can be fetched.
pub fn parse_http_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| invalid(field, raw, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(field, raw, format!("unsupported scheme {}", scheme))),
    }
}

pub fn validate_out_dir(field: &str, raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(invalid(field, raw, "directory cannot be empty"));
    }
    Ok(())
}

/// Base filenames end up joined onto the output directory, so they must not
/// carry separators of their own.
pub fn validate_file_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "name cannot be blank"));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(invalid(field, value, "name cannot contain path separators"));
    }
    Ok(())
}

pub fn validate_timeout_ms(field: &str, timeout_ms: u64) -> Result<()> {
    if timeout_ms == 0 {
        return Err(invalid(field, timeout_ms, "timeout must be at least 1 ms"));
    }
    Ok(())
}

pub fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(field, raw, "expected a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_url() {
        assert!(parse_http_url("url", "https://example.com").is_ok());
        assert!(parse_http_url("url", "http://example.com/api?x=1").is_ok());
        assert!(parse_http_url("url", "").is_err());
        assert!(parse_http_url("url", "invalid-url").is_err());

        let err = parse_http_url("url", "ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme ftp"));
    }

    #[test]
    fn test_validate_out_dir() {
        assert!(validate_out_dir("out", "exports").is_ok());
        assert!(validate_out_dir("out", "").is_err());
    }

    #[test]
    fn test_validate_timeout_ms() {
        assert!(validate_timeout_ms("timeout", 15000).is_ok());
        assert!(validate_timeout_ms("timeout", 1).is_ok());
        assert!(validate_timeout_ms("timeout", 0).is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("name", "export").is_ok());
        assert!(validate_file_name("name", "  ").is_err());
        assert!(validate_file_name("name", "../escape").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<u64>("timeout", " 2500 ").unwrap(), 2500);
        assert!(parse_number::<u64>("timeout", "fast").is_err());
        assert!(parse_number::<u32>("retries", "-1").is_err());
    }
}
