//! Agent configuration with sensible defaults.
//!
//! [`AgentConfig`] holds everything the extraction client and heartbeat
//! need. Binaries build it from CLI flags; tests use the defaults and tweak
//! single fields with the `with_*` builders.
//!
//! ```
//! use remind_rs::config::AgentConfig;
//! use std::time::Duration;
//!
//! let config = AgentConfig::default()
//!     .with_model("openai/gpt-4o-mini")
//!     .with_request_timeout(Duration::from_secs(10))
//!     .with_retries(2);
//! assert_eq!(config.retry.max_retries, 2);
//! ```

use std::time::Duration;

use crate::DEFAULT_MODEL;
use crate::api::retry::RetryConfig;

/// Configuration for the reminder agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,
    /// Maximum tokens in an extraction response. Default: `256`.
    pub max_tokens: u32,
    /// Sampling temperature. Default: `0.0`.
    pub temperature: f32,
    /// Upper bound on a single backend attempt. Default: 30 s.
    pub request_timeout: Duration,
    /// Retry policy for transient backend failures. Default: no retries.
    pub retry: RetryConfig,
    /// Also send a strict `json_schema` response format with each request.
    /// Default: `false` (prompt-only contract).
    pub structured_output: bool,
    /// Heartbeat tick period; zero disables the heartbeat. Default: 60 s.
    pub heartbeat_interval: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 256,
            temperature: 0.0,
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            structured_output: false,
            heartbeat_interval: Duration::from_secs(60),
        }
    }
}

impl AgentConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Retry transient failures up to `retries` times with default backoff.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retry = RetryConfig::with_retries(retries);
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_single_attempt_extraction() {
        let config = AgentConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(60));
        assert!(!config.structured_output);
        assert!(config.temperature.abs() < f32::EPSILON);
    }

    #[test]
    fn builders_override_fields() {
        let config = AgentConfig::default()
            .with_model("m")
            .with_max_tokens(64)
            .with_temperature(0.5)
            .with_structured_output(true)
            .with_heartbeat_interval(Duration::ZERO);
        assert_eq!(config.model, "m");
        assert_eq!(config.max_tokens, 64);
        assert!((config.temperature - 0.5).abs() < f32::EPSILON);
        assert!(config.structured_output);
        assert!(config.heartbeat_interval.is_zero());
    }
}
