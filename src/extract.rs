//! Extraction stage: fetch one assessment with bounded retry.
//!
//! The retry loop is an explicit state machine. Each backoff state leads
//! back to `Requesting`, so a rate-limited or failed response is never
//! handed to validation.

use crate::api::{is_rate_limited, ScanApi};
use crate::error::{ApiError, ExtractError};
use crate::scan::ScanResult;
use crate::types::Hostname;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Default number of requests before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default fixed delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Bounded fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total requests allowed, the first one included.
    pub max_attempts: u32,
    /// Sleep between two attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// States of one extraction.
#[derive(Debug)]
enum ExtractState {
    Requesting,
    RateLimitedBackoff,
    ConnFailedBackoff(ApiError),
    Validating(Value),
    Success(ScanResult),
    ExhaustedFailure,
}

/// Fetches and validates the assessment for a host.
pub struct Extractor<'a> {
    api: &'a dyn ScanApi,
    policy: RetryPolicy,
}

impl<'a> Extractor<'a> {
    /// Create an extractor over `api` with the given retry policy.
    pub fn new(api: &'a dyn ScanApi, policy: RetryPolicy) -> Self {
        Self { api, policy }
    }

    /// Run the extraction for `host`.
    ///
    /// Connectivity failures and rate-limit replies are retried up to the
    /// policy's attempt budget, sleeping the fixed delay between attempts.
    /// Structural problems with the body fail at once.
    #[instrument(name = "extract", skip(self, host), fields(host = %host))]
    pub async fn extract(&self, host: &Hostname) -> Result<ScanResult, ExtractError> {
        let mut attempt: u32 = 0;
        let mut state = ExtractState::Requesting;

        loop {
            state = match state {
                ExtractState::Requesting => {
                    attempt += 1;
                    debug!(attempt, max = self.policy.max_attempts, "requesting");

                    match self.api.analyze(host).await {
                        Err(e) => ExtractState::ConnFailedBackoff(e),
                        Ok(body) if is_rate_limited(&body) => ExtractState::RateLimitedBackoff,
                        Ok(body) => ExtractState::Validating(body),
                    }
                }
                ExtractState::ConnFailedBackoff(cause) => {
                    warn!(attempt, error = %cause, "connectivity error");
                    self.backoff(attempt).await
                }
                ExtractState::RateLimitedBackoff => {
                    warn!(attempt, "rate limit reached");
                    self.backoff(attempt).await
                }
                ExtractState::Validating(body) => match ScanResult::validate(body) {
                    Ok(scan) => ExtractState::Success(scan),
                    Err(e) => {
                        warn!(attempt, error = %e, "rejecting API response");
                        return Err(e);
                    }
                },
                ExtractState::Success(scan) => {
                    info!(
                        attempt,
                        status = %scan.status(),
                        endpoints = scan.endpoints().len(),
                        "assessment retrieved"
                    );
                    return Ok(scan);
                }
                ExtractState::ExhaustedFailure => {
                    error!(attempts = attempt, "failed to retrieve valid data after retries");
                    return Err(ExtractError::Exhausted { attempts: attempt });
                }
            };
        }
    }

    /// Sleep and retry, or give up once the budget is spent.
    async fn backoff(&self, attempt: u32) -> ExtractState {
        if attempt >= self.policy.max_attempts {
            return ExtractState::ExhaustedFailure;
        }
        debug!(delay_secs = self.policy.delay.as_secs_f64(), "backing off");
        tokio::time::sleep(self.policy.delay).await;
        ExtractState::Requesting
    }
}
