//! Sampler configuration.

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};

/// Construction-time configuration for a sampling session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Time between two ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Number of values retained per metric
    pub history_capacity: usize,
    /// Granularity of the cancellation check while sleeping between ticks
    pub cancellation_check_ms: u64,
    /// Bound of the channel used by channel and stream consumers
    pub channel_capacity: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: crate::DEFAULT_TICK_INTERVAL_MS,
            history_capacity: crate::DEFAULT_HISTORY_CAPACITY,
            cancellation_check_ms: crate::DEFAULT_CANCELLATION_CHECK_MS,
            channel_capacity: crate::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl SamplerConfig {
    /// Create a configuration with a custom tick interval and history capacity.
    pub fn new(tick_interval_ms: u64, history_capacity: usize) -> Self {
        Self {
            tick_interval_ms,
            history_capacity,
            ..Default::default()
        }
    }

    /// Set the tick interval.
    pub fn with_tick_interval_ms(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms;
        self
    }

    /// Set the history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the cancellation check granularity.
    pub fn with_cancellation_check_ms(mut self, check_ms: u64) -> Self {
        self.cancellation_check_ms = check_ms;
        self
    }

    /// Set the channel bound used by [`Sampler::start_channel`](crate::Sampler::start_channel).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Reject values that would make a session meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(MonitorError::config_error("tick interval must be greater than 0"));
        }
        if self.history_capacity == 0 {
            return Err(MonitorError::config_error("history capacity must be greater than 0"));
        }
        if self.cancellation_check_ms == 0 {
            return Err(MonitorError::config_error(
                "cancellation check granularity must be greater than 0",
            ));
        }
        if self.channel_capacity == 0 {
            return Err(MonitorError::config_error("channel capacity must be greater than 0"));
        }
        Ok(())
    }
}
