use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "api-export")]
#[command(version)]
#[command(about = "Fetch data from an API and export it to JSON and/or CSV")]
pub struct CliArgs {
    /// API URL (overrides API_URL)
    #[arg(short, long)]
    pub url: Option<String>,

    /// API key sent as a Bearer token (overrides API_KEY)
    #[arg(short, long)]
    pub key: Option<String>,

    /// Export format: json | csv | both
    #[arg(short, long, default_value = "both")]
    pub format: String,

    /// Output directory
    #[arg(short, long, default_value = "outputs")]
    pub out: String,

    /// Base filename (without extension)
    #[arg(short, long, default_value = "export")]
    pub name: String,

    /// Request timeout in ms (overrides TIMEOUT_MS, default 15000)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Retry count on network errors and 5xx responses
    #[arg(short, long, default_value_t = 2)]
    pub retries: u32,

    /// Delay between retries in ms
    #[arg(long, default_value_t = 600)]
    pub retry_delay: u64,

    /// Disable the timestamp suffix in filenames
    #[arg(long)]
    pub no_timestamp: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
