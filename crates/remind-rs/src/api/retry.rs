//! Bounded retry with exponential backoff for extraction backend calls.
//!
//! Extraction makes a single attempt by default. When retries are enabled,
//! only failures classified [`Failure::Transient`] are retried. The
//! classifier reads the error strings produced by
//! [`OpenRouterClient::chat`](crate::OpenRouterClient::chat) and by the
//! extraction attempt timeout.

use std::time::Duration;

use reqwest::StatusCode;

/// Prefix of the error reported when one attempt exceeds its deadline.
pub const ATTEMPT_TIMED_OUT: &str = "backend timed out";

/// Per-attempt scaling applied when jitter is on, cycled by attempt number.
const JITTER_FACTORS: [f64; 4] = [0.75, 0.90, 0.60, 0.85];

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt (0 = single attempt).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
    /// Scale delays down by a per-attempt factor to spread out retries from
    /// concurrent conversations.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a config with the given number of retries and default timing.
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_retries: retries,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self
            .initial_delay
            .mul_f64(self.multiplier.powi(exponent).min(f64::from(u32::MAX)))
            .min(self.max_delay);
        if self.jitter {
            delay.mul_f64(JITTER_FACTORS[attempt as usize % JITTER_FACTORS.len()])
        } else {
            delay
        }
    }

    /// Whether a failure on attempt `attempt` (0-indexed) should be retried.
    pub fn should_retry(&self, attempt: u32, error: &str) -> bool {
        attempt < self.max_retries && Failure::classify(error) == Failure::Transient
    }
}

/// How a backend failure should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Worth another attempt: rate limits, provider 5xx, transport errors,
    /// attempt timeouts.
    Transient,
    /// Retrying cannot help: bad credentials, rejected request, unparseable
    /// envelope, or anything unrecognized.
    Permanent,
}

impl Failure {
    /// Classify an error string from the completion backend.
    pub fn classify(error: &str) -> Self {
        if let Some(rest) = error.strip_prefix("OpenRouter API HTTP ") {
            return match http_status(rest) {
                Some(s) if s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error() => {
                    Failure::Transient
                }
                _ => Failure::Permanent,
            };
        }

        // Transport failures before or while reading the response body.
        let transient_prefixes = ["request failed:", "failed to read response:", ATTEMPT_TIMED_OUT];
        if transient_prefixes.iter().any(|p| error.starts_with(p)) {
            Failure::Transient
        } else {
            Failure::Permanent
        }
    }
}

/// Leading status code of `"503 Service Unavailable: …"`.
fn http_status(rest: &str) -> Option<StatusCode> {
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest.get(..end)?
        .parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
}
