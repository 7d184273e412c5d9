//! Bounded polling for wallet handshakes
//!
//! Xaman connect/login flows hand out an identifier that must be polled
//! until the operator approves on their phone. Every poll loop stops on a
//! terminal answer or after the attempt ceiling, whichever comes first -
//! no loop may run unbounded.

use crate::error::GatewayError;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Wallet-connect handshake: 5 s interval, 60 attempts (~5 minutes).
    pub fn connect() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }

    /// Sign-in handshake: 3 s interval, 60 attempts (~3 minutes).
    pub fn login() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    Terminal(T),
    TimedOut,
}

/// Poll `probe` until it reports a terminal value or the ceiling is hit.
///
/// A transient transport failure counts as a missed attempt rather than
/// aborting the whole wait; any other error propagates.
pub async fn poll_until_terminal<T, F, Fut>(
    policy: &PollPolicy,
    mut probe: F,
) -> Result<PollOutcome<T>, GatewayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, GatewayError>>,
{
    for attempt in 1..=policy.max_attempts {
        match probe().await {
            Ok(Some(terminal)) => return Ok(PollOutcome::Terminal(terminal)),
            Ok(None) => {}
            Err(GatewayError::RemoteUnavailable(detail)) => {
                log::warn!("poll attempt {} failed ({}), continuing", attempt, detail);
            }
            Err(other) => return Err(other),
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Ok(PollOutcome::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::ZERO,
            max_attempts,
        }
    }

    #[tokio::test]
    async fn test_times_out_at_the_attempt_ceiling() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until_terminal(&instant_policy(60), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<Option<&str>, GatewayError>(None) }
        })
        .await
        .unwrap();

        assert_eq!(outcome, PollOutcome::TimedOut);
        // Exactly 60 attempts - a 61st poll is never issued
        assert_eq!(calls.load(Ordering::SeqCst), 60);
    }

    #[tokio::test]
    async fn test_stops_on_terminal_state() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until_terminal(&instant_policy(60), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 3 {
                    Ok(Some("connected"))
                } else {
                    Ok(None)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(outcome, PollOutcome::Terminal("connected"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transport_failures_count_as_missed_attempts() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until_terminal(&instant_policy(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<Option<&str>, _>(GatewayError::RemoteUnavailable(
                    "connection refused".to_string(),
                ))
            }
        })
        .await
        .unwrap();

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let result: Result<PollOutcome<&str>, _> =
            poll_until_terminal(&instant_policy(5), || async {
                Err(GatewayError::RemoteRejected("login id unknown".to_string()))
            })
            .await;

        assert!(matches!(result, Err(GatewayError::RemoteRejected(_))));
    }
}
