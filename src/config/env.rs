/// Snapshot of the environment variables the tool reads, taken once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    /// Kept raw so a malformed value surfaces as a configuration error.
    pub timeout_ms: Option<String>,
}

impl EnvConfig {
    /// Loads `.env` (if present) into the process environment, then reads it.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_url: non_empty("API_URL"),
            api_key: non_empty("API_KEY"),
            timeout_ms: non_empty("TIMEOUT_MS"),
        }
    }
}
