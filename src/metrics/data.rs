//! Data structures for sampled metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// A single timestamped reading of CPU and memory utilization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// 1-based tick number within the sampling session
    pub tick: u64,
    /// When the reading was taken
    pub captured_at: DateTime<Utc>,
    /// CPU usage percentage (0.0 to 100.0)
    pub cpu_percent: f32,
    /// Memory usage percentage (0.0 to 100.0)
    pub ram_percent: f32,
    /// Used memory in MB
    pub ram_used_mb: u64,
    /// Available memory in MB
    pub ram_free_mb: u64,
    /// Total memory in MB
    pub ram_total_mb: u64,
}

/// Memory statistics as reported by the OS, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMemoryStats {
    /// Total system memory in bytes
    pub total_bytes: u64,
    /// Used memory in bytes
    pub used_bytes: u64,
    /// Memory available to new allocations in bytes
    pub available_bytes: u64,
}

/// One raw reading from a [`StatsProvider`](super::StatsProvider).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStats {
    /// Instantaneous CPU usage percentage
    pub cpu_percent: f32,
    /// Memory statistics
    pub memory: RawMemoryStats,
}

impl RawMemoryStats {
    /// Percentage of memory not available, `(total - available) / total`.
    pub fn usage_percent(&self) -> f32 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        let unavailable = self.total_bytes.saturating_sub(self.available_bytes);
        ((unavailable as f64 / self.total_bytes as f64) * 100.0) as f32
    }
}

/// Truncating byte to MB conversion.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}

impl Sample {
    /// Build a sample for `tick` from a raw provider reading, stamped now.
    pub fn from_raw(tick: u64, raw: RawStats) -> Self {
        Self::from_raw_at(tick, raw, Utc::now())
    }

    /// Build a sample with an explicit timestamp.
    pub fn from_raw_at(tick: u64, raw: RawStats, captured_at: DateTime<Utc>) -> Self {
        let cpu_percent = if raw.cpu_percent.is_finite() {
            raw.cpu_percent.clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            tick,
            captured_at,
            cpu_percent,
            ram_percent: raw.memory.usage_percent().clamp(0.0, 100.0),
            ram_used_mb: bytes_to_mb(raw.memory.used_bytes),
            ram_free_mb: bytes_to_mb(raw.memory.available_bytes),
            ram_total_mb: bytes_to_mb(raw.memory.total_bytes),
        }
    }
}
