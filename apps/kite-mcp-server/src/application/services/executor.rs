//! Broker call executor.
//!
//! Broker calls are network round-trips. Each one runs on its own tokio task
//! so the protocol loop keeps serving other messages, with a semaphore
//! bounding how many are in flight and a timeout bounding how long each may
//! take.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::application::error::DispatchError;
use crate::application::ports::BrokerError;

/// Default number of concurrent broker calls.
pub const DEFAULT_MAX_CONCURRENT_CALLS: usize = 8;

/// Default per-call timeout.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs broker calls off the protocol loop.
#[derive(Debug, Clone)]
pub struct BrokerCallExecutor {
    permits: Arc<Semaphore>,
    call_timeout: Duration,
}

impl Default for BrokerCallExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_CALLS, DEFAULT_CALL_TIMEOUT)
    }
}

impl BrokerCallExecutor {
    /// Create an executor. A concurrency bound of zero is raised to one.
    #[must_use]
    pub fn new(max_concurrent_calls: usize, call_timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent_calls.max(1))),
            call_timeout,
        }
    }

    /// Per-call timeout.
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Permits currently free.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `call` on a worker task and wait for its outcome.
    ///
    /// The timeout covers the call itself, not the wait for a permit. Once
    /// spawned, a call runs to completion or timeout; callers cannot abort it.
    pub async fn run<T, F>(&self, operation: &'static str, call: F) -> Result<T, DispatchError>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, BrokerError>> + Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| DispatchError::Worker {
                operation,
                message: e.to_string(),
            })?;

        let call_timeout = self.call_timeout;
        let handle = tokio::spawn(async move {
            let _permit = permit;
            tokio::time::timeout(call_timeout, call).await
        });

        match handle.await {
            Ok(Ok(result)) => result.map_err(DispatchError::Broker),
            Ok(Err(_elapsed)) => {
                tracing::warn!(
                    operation,
                    timeout_secs = call_timeout.as_secs(),
                    "Broker call timed out"
                );
                Err(DispatchError::Timeout {
                    operation,
                    after: call_timeout,
                })
            }
            Err(e) => Err(DispatchError::Worker {
                operation,
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_call_result() {
        let executor = BrokerCallExecutor::default();
        let value = executor.run("holdings", async { Ok(7_u32) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn maps_broker_errors() {
        let executor = BrokerCallExecutor::default();
        let err = executor
            .run::<(), _>("orders", async {
                Err(BrokerError::RateLimited {
                    message: "Too many requests".to_string(),
                })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Broker(BrokerError::RateLimited { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_stalled_calls() {
        let executor = BrokerCallExecutor::new(1, Duration::from_secs(2));
        let err = executor
            .run("gtts", async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Timeout {
                operation: "gtts",
                after: Duration::from_secs(2)
            }
        );
        assert_eq!(executor.available_permits(), 1);
    }

    #[tokio::test]
    async fn panicking_call_is_a_worker_error() {
        let executor = BrokerCallExecutor::default();
        let err = executor
            .run::<(), _>("positions", async { panic!("boom") })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "worker");
    }

    #[tokio::test]
    async fn zero_bound_is_raised_to_one() {
        let executor = BrokerCallExecutor::new(0, DEFAULT_CALL_TIMEOUT);
        assert_eq!(executor.available_permits(), 1);
    }
}
