use crate::config::RetryConfig;
use crate::error::NarrativeError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Run a narrator call with jittered exponential backoff.
///
/// A missing binary is not retried.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryConfig,
    narrator: &str,
    mut call: F,
) -> Result<T, NarrativeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, NarrativeError>>,
{
    let mut attempt = 0;
    let mut backoff_ms = policy.backoff_base_ms;

    loop {
        attempt += 1;

        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.max_attempts || !is_retryable(&e) => return Err(e),
            Err(e) => {
                // base * 2^attempt + random(0..=base)
                let jitter = rand::thread_rng().gen_range(0..=policy.backoff_base_ms);
                let delay = Duration::from_millis(backoff_ms + jitter);
                warn!(
                    "{} attempt {} failed: {}. Retrying in {:?}",
                    narrator, attempt, e, delay
                );
                sleep(delay).await;
                backoff_ms = backoff_ms.saturating_mul(2);
            }
        }
    }
}

fn is_retryable(error: &NarrativeError) -> bool {
    !matches!(error, NarrativeError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
}
