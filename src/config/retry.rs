//! Retry, polling, and delete-confirmation policies.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outer conflict-retry policy for apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total apply cycles before the last conflict surfaces.
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.initial_backoff_ms, self.max_backoff_ms, self.multiplier)
    }
}

/// Inner poll policy for long-running operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    pub multiplier: f64,
    /// Overall rollout-wait deadline per operation.
    pub timeout_seconds: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 1_000,
            max_interval_ms: 10_000,
            multiplier: 1.5,
            timeout_seconds: 600,
        }
    }
}

impl PollConfig {
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.initial_interval_ms, self.max_interval_ms, self.multiplier)
    }
}

/// Bounded GET polling after delete, until the server stops reporting the
/// resource. Deletes propagate lazily; the bound is a policy choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteConfig {
    pub confirm_attempts: u32,
    pub confirm_interval_ms: u64,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            confirm_attempts: 8,
            confirm_interval_ms: 500,
        }
    }
}

/// Exponential backoff delay sequence. Deterministic: no jitter, so tests
/// can reason about timing exactly.
#[derive(Debug)]
pub struct Backoff {
    next_ms: u64,
    max_ms: u64,
    multiplier: f64,
}

impl Backoff {
    fn new(initial_ms: u64, max_ms: u64, multiplier: f64) -> Self {
        Self {
            next_ms: initial_ms.min(max_ms),
            max_ms,
            multiplier: if multiplier < 1.0 { 1.0 } else { multiplier },
        }
    }

    /// The next delay, growing by the multiplier up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let current = self.next_ms;
        let grown = (self.next_ms as f64 * self.multiplier) as u64;
        self.next_ms = grown.min(self.max_ms).max(1);
        Duration::from_millis(current)
    }
}
