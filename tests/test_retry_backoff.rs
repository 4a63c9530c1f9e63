mod common;

use common::{fast_policy, MockProvider};
use ronbun::analyzer::{RateLimitedClient, RetryPolicy};
use ronbun::models::{AnalysisRequest, ExpertRole};
use ronbun::RonbunError;
use std::sync::Arc;
use std::time::Duration;

fn request(content: &str) -> AnalysisRequest {
    AnalysisRequest::new(
        ExpertRole::GenericAnalyst,
        "document",
        content.to_string(),
    )
}

#[test]
fn backoff_delays_double_then_cap() {
    let policy = RetryPolicy {
        max_attempts: 5,
        base_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(60),
    };

    let delays: Vec<Duration> = (0..4).map(|retry| policy.delay_for(retry)).collect();

    // Strictly increasing while under the cap.
    for window in delays.windows(2) {
        assert!(window[1] > window[0]);
        assert_eq!(window[1], window[0] * 2);
    }
    assert_eq!(delays[0], Duration::from_secs(1));

    // Past the cap the delay is pinned.
    assert_eq!(policy.delay_for(6), Duration::from_secs(60));
    assert_eq!(policy.delay_for(31), Duration::from_secs(60));
    assert_eq!(policy.delay_for(32), Duration::from_secs(60));
}

#[tokio::test]
async fn rate_limited_calls_retry_until_success() {
    let provider = Arc::new(MockProvider::new().fail_times_rate_limited("document text", 2));
    let client = RateLimitedClient::new(provider.clone(), 4, fast_policy(5), Duration::from_secs(5));

    let outcome = client.execute(&request("document text")).await.unwrap();

    assert_eq!(outcome.attempts, 3);
    assert_eq!(provider.total_calls(), 3);
    assert!(!outcome.output.is_empty());
}

#[tokio::test]
async fn transient_errors_share_the_same_retry_budget() {
    let provider = Arc::new(MockProvider::new().fail_times("document text", 1));
    let client = RateLimitedClient::new(provider, 4, fast_policy(5), Duration::from_secs(5));

    let outcome = client.execute(&request("document text")).await.unwrap();
    assert_eq!(outcome.attempts, 2);
}

#[tokio::test]
async fn exhausting_retries_reports_attempts_and_last_error() {
    let provider = Arc::new(MockProvider::new().always_fail("document text"));
    let client = RateLimitedClient::new(provider.clone(), 4, fast_policy(4), Duration::from_secs(5));

    let err = client.execute(&request("document text")).await.unwrap_err();

    match err {
        RonbunError::ExhaustedRetries {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 4);
            assert!(last_error.contains("scripted failure"));
        }
        other => panic!("unexpected error type: {:?}", other),
    }
    assert_eq!(provider.total_calls(), 4);
}

#[tokio::test]
async fn timeouts_are_retried_like_transient_errors() {
    let provider =
        Arc::new(MockProvider::new().with_delay("slow content", Duration::from_millis(80)));
    let client = RateLimitedClient::new(provider.clone(), 4, fast_policy(2), Duration::from_millis(10));

    let err = client.execute(&request("slow content")).await.unwrap_err();

    match err {
        RonbunError::ExhaustedRetries {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 2);
            assert!(last_error.contains("timeout"));
        }
        other => panic!("unexpected error type: {:?}", other),
    }
    // Both attempts reached the provider before timing out.
    assert_eq!(provider.total_calls(), 2);
}
