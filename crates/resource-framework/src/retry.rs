//! Read retry policy.

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Exponential backoff for transient read failures.
///
/// Only errors for which [`ResourceError::is_transient`] holds are retried;
/// auth, validation and other 4xx failures return immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    #[serde(with = "millis")]
    pub base_delay: Duration,
    #[serde(with = "millis")]
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Same retry count, zero backoff. Handy in tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Runs `op` until it succeeds, fails terminally, or retries run out.
    pub async fn run<T, F, Fut>(&self, context: &str, mut op: F) -> Result<T, ResourceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ResourceError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    debug!(context, attempt, ?delay, error = %err, "Retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use http::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn network() -> ResourceError {
        ResourceError::from_transport("list", TransportError::Network("timeout".into()))
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(10), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let attempts = &AtomicU32::new(0);
        let result = RetryPolicy::immediate(2)
            .run("list", move || async move {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(network())
                } else {
                    Ok("ok")
                }
            })
            .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let attempts = &AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::immediate(2)
            .run("list", move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(network())
            })
            .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_never_retries_auth() {
        let attempts = &AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::immediate(2)
            .run("get", move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(ResourceError::from_transport(
                    "get",
                    TransportError::Status {
                        status: StatusCode::UNAUTHORIZED,
                        body: None,
                    },
                ))
            })
            .await;
        assert!(result.unwrap_err().is_auth());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deserializes_millis() {
        let policy: RetryPolicy =
            serde_json::from_str(r#"{ "max_retries": 1, "base_delay": 250 }"#).unwrap();
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
    }
}
