//! Connection monitor for the remote cache tier
//!
//! The monitor is the only writer of [`CacheHealth`]. It probes the remote
//! store, marks it available on success and keeps re-checking it on an
//! interval. After an error it retries with a linearly growing, capped delay
//! and gives up for good once the retry ceiling is reached.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::domain::cache::CacheHealth;
use crate::domain::DomainError;

/// A remote store that can be connected to and pinged
#[async_trait]
pub trait ConnectionProbe: Send + Sync + Debug {
    /// Human readable address, used in logs
    fn target(&self) -> String;

    /// Connects if needed, then verifies the connection is usable
    async fn probe(&self) -> Result<(), DomainError>;
}

/// Bounded retry schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub step: Duration,
    pub cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            step: Duration::from_millis(50),
            cap: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, step: Duration, cap: Duration) -> Self {
        Self {
            max_retries,
            step,
            cap,
        }
    }

    /// Delay before retry number `attempt` (1-based), or `None` once the
    /// ceiling is exceeded.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_retries {
            return None;
        }
        Some(self.step.saturating_mul(attempt).min(self.cap))
    }
}

/// Drives the availability state of a remote cache tier
#[derive(Debug)]
pub struct ConnectionMonitor {
    probe: Arc<dyn ConnectionProbe>,
    health: Arc<CacheHealth>,
    policy: RetryPolicy,
    check_interval: Duration,
}

impl ConnectionMonitor {
    pub fn new(probe: Arc<dyn ConnectionProbe>, health: Arc<CacheHealth>) -> Self {
        Self {
            probe,
            health,
            policy: RetryPolicy::default(),
            check_interval: Duration::from_secs(30),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Runs the monitor on a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Probes until the retry ceiling is exhausted
    ///
    /// Returns only after giving up; a healthy store keeps the loop alive.
    pub async fn run(self) {
        let target = self.probe.target();
        let mut attempt: u32 = 0;

        loop {
            match self.probe.probe().await {
                Ok(()) => {
                    if !self.health.is_available() {
                        info!(remote = %target, "Remote cache connected");
                    }
                    self.health.mark_available();
                    attempt = 0;
                    tokio::time::sleep(self.check_interval).await;
                }
                Err(e) => {
                    attempt += 1;
                    match self.policy.delay_for(attempt) {
                        Some(delay) => {
                            self.health.mark_probing();
                            warn!(
                                remote = %target,
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                "Remote cache unreachable, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            self.health.mark_unavailable();
                            warn!(
                                remote = %target,
                                retries = self.policy.max_retries,
                                error = %e,
                                "Remote cache retries exhausted, using in-process cache only"
                            );
                            return;
                        }
                    }
                }
            }
        }
    }
}
