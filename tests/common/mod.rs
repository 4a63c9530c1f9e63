use ronbun::analyzer::{AnalysisOrchestrator, LlmProvider, RetryPolicy};
use ronbun::models::{Document, ExpertRole, Section, SectionKind};
use ronbun::RonbunError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Deterministic scripted provider for integration tests.
///
/// Responses echo the role plus the last non-empty line of the prompt, so a
/// given (role, text) pair always produces the same output. Failures and
/// artificial delays are keyed by prompt substring.
pub struct MockProvider {
    // substring -> (remaining failures, fail as rate limit)
    failures: Mutex<HashMap<String, (u32, bool)>>,
    delays: Mutex<Vec<(String, Duration)>>,
    total_calls: AtomicU32,
    synthesis_calls: AtomicU32,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(HashMap::new()),
            delays: Mutex::new(Vec::new()),
            total_calls: AtomicU32::new(0),
            synthesis_calls: AtomicU32::new(0),
        }
    }

    pub fn fail_times(self, prompt_substring: &str, times: u32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(prompt_substring.to_string(), (times, false));
        self
    }

    pub fn fail_times_rate_limited(self, prompt_substring: &str, times: u32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(prompt_substring.to_string(), (times, true));
        self
    }

    pub fn always_fail(self, prompt_substring: &str) -> Self {
        self.fail_times(prompt_substring, u32::MAX)
    }

    pub fn with_delay(self, prompt_substring: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .push((prompt_substring.to_string(), delay));
        self
    }

    pub fn total_calls(&self) -> u32 {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn synthesis_calls(&self) -> u32 {
        self.synthesis_calls.load(Ordering::SeqCst)
    }

    fn scripted_failure(&self, text: &str) -> Option<bool> {
        let mut failures = self.failures.lock().unwrap();
        for (substring, (remaining, rate_limited)) in failures.iter_mut() {
            if text.contains(substring.as_str()) && *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Some(*rate_limited);
            }
        }
        None
    }

    fn scripted_delay(&self, text: &str) -> Option<Duration> {
        let delays = self.delays.lock().unwrap();
        delays
            .iter()
            .find(|(substring, _)| text.contains(substring.as_str()))
            .map(|(_, delay)| *delay)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for MockProvider {
    fn generate<'a>(
        &'a self,
        role: &'a ExpertRole,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RonbunError>> + Send + 'a>> {
        Box::pin(async move {
            self.total_calls.fetch_add(1, Ordering::SeqCst);
            if text.starts_with("Synthesize the following analyses") {
                self.synthesis_calls.fetch_add(1, Ordering::SeqCst);
            }

            if let Some(delay) = self.scripted_delay(text) {
                tokio::time::sleep(delay).await;
            }

            match self.scripted_failure(text) {
                Some(true) => Err(RonbunError::RateLimited { retry_after: None }),
                Some(false) => Err(RonbunError::TransientOther("scripted failure".to_string())),
                None => {
                    let tail = text
                        .lines()
                        .filter(|l| !l.trim().is_empty())
                        .last()
                        .unwrap_or("");
                    Ok(format!("{}: {}", role.as_str(), tail))
                }
            }
        })
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Retry policy with millisecond delays so retry-heavy tests stay fast.
pub fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(8),
    }
}

pub fn orchestrator(provider: Arc<MockProvider>) -> AnalysisOrchestrator {
    AnalysisOrchestrator::with_provider(provider, 4, fast_policy(3), Duration::from_secs(5), 1)
}

/// Document with one section per (name, text) pair and the given pages.
pub fn document(sections: &[(&str, &str)], pages: &[&str]) -> Document {
    let sections = sections
        .iter()
        .map(|(name, text)| {
            Section::new(SectionKind::from_heading(name), text.to_string(), (0, 0))
        })
        .collect();

    Document::new(
        "Test Paper".to_string(),
        pages.iter().map(|p| p.to_string()).collect(),
        sections,
    )
}
