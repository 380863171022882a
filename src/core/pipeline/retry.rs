//! Retry with exponential backoff
//!
//! [`retry_with_backoff`] runs an operation until it succeeds or the attempt
//! budget is spent, sleeping between attempts. It never runs any recovery
//! itself; the last error is handed back to the caller.

use super::context::FileContext;
use crate::config::RetryConfig;
use crate::domain::Result;
use crate::log_retry_attempt;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff policy
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Total attempts, the first one included
    pub max_attempts: usize,

    /// Delay after the first failed attempt
    pub initial_delay: Duration,

    /// Factor applied to the delay after every further failure
    pub multiplier: f64,

    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl BackoffPolicy {
    /// Build a policy from the `[retry]` configuration section
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            multiplier: config.backoff_multiplier,
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    ///
    /// `initial_delay * multiplier^(attempt - 1)`, capped at `max_delay`.
    pub fn delay_after(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as usize) as i32;
        let delay_ms = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let max_ms = self.max_delay.as_millis() as f64;

        if !delay_ms.is_finite() || delay_ms >= max_ms {
            return self.max_delay;
        }
        Duration::from_millis(delay_ms as u64)
    }

    /// Every delay the policy can produce, in order
    pub fn delays(&self) -> Vec<Duration> {
        (1..self.max_attempts).map(|n| self.delay_after(n)).collect()
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Run `operation` under `policy`
///
/// `ctx.attempt` is advanced before every attempt and recorded on the current
/// span, and each call receives a copy of the updated context. Returns the
/// first success, or the error from the final attempt.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &BackoffPolicy,
    ctx: &mut FileContext,
    mut operation: F,
) -> Result<T>
where
    F: FnMut(FileContext) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    ctx.attempt = 0;

    loop {
        ctx.attempt += 1;
        tracing::Span::current().record("attempt", ctx.attempt);

        match operation(ctx.clone()).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if ctx.attempt >= max_attempts {
                    return Err(e);
                }

                let delay = policy.delay_after(ctx.attempt);
                log_retry_attempt!(ctx.attempt, max_attempts, delay.as_millis() as u64, e);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BridgeError;
    use std::path::Path;

    fn fast_policy(max_attempts: usize) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            multiplier: 2.0,
            max_delay: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_default_delays() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(
            policy.delays(),
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[test]
    fn test_delays_strictly_increase_until_cap() {
        let policy = BackoffPolicy {
            max_attempts: 10,
            initial_delay: Duration::from_millis(100),
            multiplier: 2.0,
            max_delay: Duration::from_millis(1000),
        };
        let delays = policy.delays();

        assert_eq!(delays[0], Duration::from_millis(100));
        assert_eq!(delays[3], Duration::from_millis(800));
        assert!(delays.windows(2).take(4).all(|w| w[0] < w[1]));
        assert!(delays[4..].iter().all(|d| *d == Duration::from_millis(1000)));
    }

    #[test]
    fn test_delay_saturates_on_huge_attempt() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay_after(usize::MAX), policy.max_delay);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let mut ctx = FileContext::new(Path::new("in/a.json"));
        let mut calls = 0;

        let result = retry_with_backoff(&fast_policy(3), &mut ctx, |attempt_ctx| {
            calls += 1;
            async move {
                if attempt_ctx.attempt < 3 {
                    Err(BridgeError::Transient("not yet".to_string()))
                } else {
                    Ok(attempt_ctx.attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
        assert_eq!(ctx.attempt, 3);
    }

    #[tokio::test]
    async fn test_retry_returns_last_error_after_exhaustion() {
        let mut ctx = FileContext::new(Path::new("in/a.json"));
        let mut calls = 0;

        let result: Result<()> = retry_with_backoff(&fast_policy(3), &mut ctx, |attempt_ctx| {
            calls += 1;
            async move { Err(BridgeError::decode(attempt_ctx.attempt, "bad record")) }
        })
        .await;

        assert!(matches!(result, Err(BridgeError::Decode { index: 3, .. })));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_does_not_retry() {
        let mut ctx = FileContext::new(Path::new("in/a.json"));
        let mut calls = 0;

        let result: Result<()> = retry_with_backoff(&fast_policy(1), &mut ctx, |_| {
            calls += 1;
            async { Err(BridgeError::Io("disk gone".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
