use crate::analyzer::llm_client::LlmProvider;
use crate::error::RonbunError;
use crate::models::AnalysisRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Exponential backoff parameters for retried provider calls.
///
/// Delay before retry `n` (zero-based) is `base_delay * 2^n`, capped at
/// `max_delay`. The sequence is deterministic - no jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        let delay = self
            .base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay);
        delay.min(self.max_delay)
    }
}

/// Successful call result plus the number of attempts it took.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    pub output: String,
    pub attempts: u32,
}

/// Wraps the provider with the process-wide concurrency bound, per-call
/// timeout, and retry/backoff behavior. The semaphore is the only shared
/// mutable resource of a run; everything else is local to one call.
pub struct RateLimitedClient {
    provider: Arc<dyn LlmProvider + Send + Sync>,
    semaphore: Arc<Semaphore>,
    policy: RetryPolicy,
    call_timeout: Duration,
}

impl RateLimitedClient {
    pub fn new(
        provider: Arc<dyn LlmProvider + Send + Sync>,
        max_in_flight: usize,
        policy: RetryPolicy,
        call_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            semaphore: Arc::new(Semaphore::new(max_in_flight.max(1))),
            policy,
            call_timeout,
        }
    }

    /// Executes one logical call. Rate-limit errors, other transient errors,
    /// and per-call timeouts all retry with the same backoff; exhausting the
    /// attempt cap yields `ExhaustedRetries` carrying the last error.
    ///
    /// The concurrency slot is acquired per attempt, so backoff sleeps never
    /// hold a slot.
    pub async fn execute(&self, request: &AnalysisRequest) -> Result<CallOutcome, RonbunError> {
        let mut last_error = String::from("no attempts made");

        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                let delay = self.policy.delay_for(attempt - 1);
                debug!(
                    section = %request.section_name,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "backing off before retry"
                );
                tokio::time::sleep(delay).await;
            }

            let permit = self
                .semaphore
                .acquire()
                .await
                .map_err(|_| RonbunError::LlmClientError("concurrency pool closed".to_string()))?;

            let result = timeout(
                self.call_timeout,
                self.provider.generate(&request.role, &request.content),
            )
            .await;
            drop(permit);

            match result {
                Ok(Ok(output)) => {
                    return Ok(CallOutcome {
                        output,
                        attempts: attempt + 1,
                    });
                }
                Ok(Err(e)) => {
                    if e.is_rate_limit() {
                        warn!(
                            section = %request.section_name,
                            role = request.role.as_str(),
                            attempt = attempt + 1,
                            "provider rate limited the call"
                        );
                    } else {
                        warn!(
                            section = %request.section_name,
                            role = request.role.as_str(),
                            attempt = attempt + 1,
                            error = %e,
                            "provider call failed"
                        );
                    }
                    last_error = e.to_string();
                }
                Err(_) => {
                    let timeout_error = RonbunError::AnalysisTimeout {
                        timeout: self.call_timeout.as_secs(),
                    };
                    warn!(
                        section = %request.section_name,
                        role = request.role.as_str(),
                        attempt = attempt + 1,
                        "provider call timed out"
                    );
                    last_error = timeout_error.to_string();
                }
            }
        }

        Err(RonbunError::ExhaustedRetries {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }
}
