use crate::domain::model::{FetchRequest, Payload};
use crate::utils::error::FetchError;
use reqwest::Client;

/// Single-URL HTTP GET with a fixed-delay retry loop.
///
/// The fetcher does no logging of its own; callers report on the outcome.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Tries up to `1 + max_retries` times, sleeping `retry_delay` between
    /// retryable failures. Returns the last error once attempts run out or a
    /// non-retryable failure comes back.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Payload, FetchError> {
        let max_attempts = request.max_attempts();
        let mut attempt = 1;

        loop {
            match self.fetch_once(request).await {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    tokio::time::sleep(request.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.with_attempts(attempt)),
            }
        }
    }

    async fn fetch_once(&self, request: &FetchRequest) -> Result<Payload, FetchError> {
        let mut builder = self
            .client
            .get(request.url.clone())
            .timeout(request.timeout);

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            // A body that fails to read must not hide the status.
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), body));
        }

        Ok(parse_body(response.text().await?))
    }
}

/// JSON bodies become structured payloads; anything else is kept as a string.
pub fn parse_body(body: String) -> Payload {
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => Payload::String(body),
    }
}
