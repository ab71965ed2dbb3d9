use crate::error::{Error, Result};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.prd.realitydefender.xyz";

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Label that replaces the upstream `FAKE` verdict
pub const DEFAULT_MANIPULATED_LABEL: &str = "MANIPULATED";

/// Default number of fetch attempts for `Client::get_result`
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Default wait between polling attempts, in milliseconds
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 2000;

/// Default overall budget for `Client::poll_for_results`, in milliseconds
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 60000;

/// Configuration for the Reality Defender client
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API
    pub base_url: Option<String>,

    /// Timeout in seconds for HTTP requests
    pub timeout_seconds: Option<u64>,

    /// Verdict label that `FAKE` statuses are rewritten to.
    /// Older API versions used `ARTIFICIAL`.
    pub manipulated_label: Option<String>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::InvalidConfig("API key is required".to_string()));
        }

        if let Some(url) = &self.base_url {
            if url.trim().is_empty() {
                return Err(Error::InvalidConfig("Base URL cannot be empty".to_string()));
            }
        }

        if let Some(label) = &self.manipulated_label {
            if label.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "Manipulated label cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Get the base URL, falling back to the default if not set
    pub fn get_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get the timeout in seconds, falling back to the default if not set
    pub fn get_timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    /// Get the label used for manipulated verdicts
    pub fn get_manipulated_label(&self) -> &str {
        self.manipulated_label
            .as_deref()
            .unwrap_or(DEFAULT_MANIPULATED_LABEL)
    }
}
