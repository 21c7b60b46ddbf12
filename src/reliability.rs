//! Reliability primitives shared by every service client: a circuit breaker,
//! per-call timeout and retry, and request metrics.

use crate::api::RetryConfig;
use crate::error::{Result, ServiceError};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Internal circuit breaker state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open,
    HalfOpen,
}

/// Tunable parameters for the circuit breaker.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive transient failures before the breaker opens.
    pub failure_threshold: u32,
    /// Seconds to wait in the open state before allowing a probe call.
    pub open_wait_seconds: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_wait_seconds: 10,
        }
    }
}

struct Inner {
    state: State,
    failures: u32,
    last_failure: Option<Instant>,
    config: CircuitBreakerConfig,
    half_open_probe_in_flight: bool,
}

/// Thread-safe circuit breaker guarding one service client.
///
/// State transitions: **Closed** -> (transient failures >= threshold) ->
/// **Open** -> (wait period elapsed) -> **HalfOpen** -> (probe succeeds) ->
/// **Closed** (or probe fails -> back to **Open**).
///
/// Only errors for which [`ServiceError::is_retryable`] holds count as
/// failures; a 404 or a bad argument says nothing about service health.
#[derive(Clone)]
pub struct CircuitBreaker {
    inner: Arc<Mutex<Inner>>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: State::Closed,
                failures: 0,
                last_failure: None,
                config,
                half_open_probe_in_flight: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State stays consistent even if a holder panicked mid-update.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `true` while calls are being short-circuited.
    pub fn is_open(&self) -> bool {
        self.lock().state == State::Open
    }

    /// Execute `f` through the circuit breaker.
    ///
    /// Returns [`ServiceError::Unavailable`] immediately when the breaker is
    /// open. In the half-open state only a single probe call is allowed;
    /// concurrent callers receive `Unavailable` until the probe completes.
    pub async fn call<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let is_probe_call;

        {
            let mut inner = self.lock();
            match inner.state {
                State::Open => {
                    if let Some(last) = inner.last_failure {
                        if last.elapsed() >= Duration::from_secs(inner.config.open_wait_seconds) {
                            inner.state = State::HalfOpen;
                        } else {
                            return Err(ServiceError::Unavailable);
                        }
                    }
                }
                State::HalfOpen => {
                    if inner.half_open_probe_in_flight {
                        return Err(ServiceError::Unavailable);
                    }
                }
                State::Closed => {}
            }
            is_probe_call = inner.state == State::HalfOpen;
            if is_probe_call {
                inner.half_open_probe_in_flight = true;
            }
        }

        let result = f().await;

        let mut inner = self.lock();
        if is_probe_call {
            inner.half_open_probe_in_flight = false;
        }
        match &result {
            Err(e) if e.is_retryable() => {
                inner.failures += 1;
                inner.last_failure = Some(Instant::now());
                if is_probe_call
                    || (inner.state == State::Closed
                        && inner.failures >= inner.config.failure_threshold)
                {
                    if inner.state != State::Open {
                        tracing::warn!(failures = inner.failures, "Circuit breaker opened");
                    }
                    inner.state = State::Open;
                }
            }
            _ => {
                if is_probe_call {
                    tracing::info!("Circuit breaker closed after successful probe");
                    inner.state = State::Closed;
                }
                if inner.state == State::Closed {
                    inner.failures = 0;
                }
            }
        }
        result
    }
}

/// Call policy applied to every request a client sends.
#[derive(Clone, Default)]
pub struct CallPolicy {
    /// Upper bound for one attempt.
    pub timeout: Option<Duration>,
    /// Retry policy for transient failures; `None` means a single attempt.
    pub retry: Option<RetryConfig>,
    /// Breaker shared by all calls of one client.
    pub breaker: CircuitBreaker,
}

impl CallPolicy {
    /// Run `attempt` under the breaker, per-attempt timeout, and retry policy,
    /// emitting `service_request.duration_seconds` and `service_request.total`.
    ///
    /// `attempt` is invoked once per try, so it must rebuild its request.
    pub async fn run<F, Fut, T>(&self, service: &'static str, operation: &str, attempt: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let start = Instant::now();
        let mut attempts = 0;
        let max_attempts = self.retry.as_ref().map(|r| r.max_attempts).unwrap_or(1);

        let res = loop {
            attempts += 1;

            let res = self
                .breaker
                .call(|| async {
                    match self.timeout {
                        Some(timeout) => match tokio::time::timeout(timeout, attempt()).await {
                            Ok(r) => r,
                            Err(_) => Err(ServiceError::Timeout),
                        },
                        None => attempt().await,
                    }
                })
                .await;

            match res {
                Ok(val) => break Ok(val),
                Err(e) if e.is_retryable() && attempts < max_attempts => {
                    let backoff = self
                        .retry
                        .as_ref()
                        .map(|r| r.get_backoff(attempts))
                        .unwrap_or_default();
                    tracing::warn!(
                        service,
                        operation,
                        attempt = attempts,
                        backoff_ms = backoff.as_millis(),
                        error = %e,
                        "Retrying service call"
                    );
                    tokio::time::sleep(backoff).await;
                    continue;
                }
                Err(e) => break Err(e),
            }
        };

        let status = if res.is_ok() { "success" } else { "failure" };

        metrics::histogram!(
            "service_request.duration_seconds",
            "service" => service,
            "operation" => operation.to_string()
        )
        .record(start.elapsed().as_secs_f64());

        metrics::counter!(
            "service_request.total",
            "service" => service,
            "operation" => operation.to_string(),
            "status" => status
        )
        .increment(1);

        res
    }
}
