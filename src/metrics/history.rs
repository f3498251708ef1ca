//! Fixed-capacity rolling history of metric values.

use crate::error::{MonitorError, Result};
use crate::metrics::data::Sample;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Circular buffer keeping the most recent `capacity` values.
///
/// Storage grows up to `capacity` once, after which `push` overwrites the
/// oldest slot in place. Capacity cannot change after construction.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    slots: Vec<T>,
    head: usize,
    capacity: usize,
}

impl<T: Copy> HistoryBuffer<T> {
    /// Create an empty buffer. A capacity of 0 is rejected.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MonitorError::config_error("history capacity must be greater than 0"));
        }

        Ok(Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        })
    }

    /// Append a value, evicting the oldest one when full.
    pub fn push(&mut self, value: T) {
        if self.slots.len() < self.capacity {
            self.slots.push(value);
        } else {
            // head is the oldest slot once the buffer is full
            self.slots[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Retained values, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.slots.len());
        values.extend_from_slice(&self.slots[self.head..]);
        values.extend_from_slice(&self.slots[..self.head]);
        values
    }

    /// Most recently pushed value.
    pub fn latest(&self) -> Option<T> {
        if self.slots.is_empty() {
            return None;
        }
        let newest = (self.head + self.slots.len() - 1) % self.slots.len();
        Some(self.slots[newest])
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl HistoryBuffer<f32> {
    /// Average of all retained values, 0 when empty.
    pub fn average(&self) -> f32 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.slots.iter().sum::<f32>() / self.slots.len() as f32
    }

    pub fn min(&self) -> Option<f32> {
        self.slots.iter().copied().reduce(f32::min)
    }

    pub fn max(&self) -> Option<f32> {
        self.slots.iter().copied().reduce(f32::max)
    }
}

/// Point-in-time copy of both rolling histories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// CPU usage percentages, oldest first
    pub cpu: Vec<f32>,
    /// Memory usage percentages, oldest first
    pub ram: Vec<f32>,
}

#[derive(Debug)]
struct Histories {
    cpu: HistoryBuffer<f32>,
    ram: HistoryBuffer<f32>,
}

/// Shared CPU and RAM histories fed by a sampler and read by a display.
///
/// Cloning yields another handle to the same buffers. Both metrics sit behind
/// one lock so a snapshot never observes a half-recorded sample.
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    inner: Arc<Mutex<Histories>>,
    capacity: usize,
}

impl MetricsHistory {
    pub fn new(capacity: usize) -> Result<Self> {
        let histories = Histories {
            cpu: HistoryBuffer::new(capacity)?,
            ram: HistoryBuffer::new(capacity)?,
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(histories)),
            capacity,
        })
    }

    // A panicking consumer must not take the display down with it.
    fn lock(&self) -> MutexGuard<'_, Histories> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push the CPU and RAM percentages of `sample`.
    pub fn record(&self, sample: &Sample) {
        let mut guard = self.lock();
        guard.cpu.push(sample.cpu_percent);
        guard.ram.push(sample.ram_percent);
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        let guard = self.lock();
        HistorySnapshot {
            cpu: guard.cpu.snapshot(),
            ram: guard.ram.snapshot(),
        }
    }

    /// Average CPU and RAM usage over the retained window.
    pub fn averages(&self) -> (f32, f32) {
        let guard = self.lock();
        (guard.cpu.average(), guard.ram.average())
    }

    pub fn len(&self) -> usize {
        self.lock().cpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::data::{RawMemoryStats, RawStats};

    fn sample(tick: u64, cpu: f32, ram_available: u64) -> Sample {
        Sample::from_raw(
            tick,
            RawStats {
                cpu_percent: cpu,
                memory: RawMemoryStats {
                    total_bytes: 100,
                    used_bytes: 100 - ram_available,
                    available_bytes: ram_available,
                },
            },
        )
    }

    #[test]
    fn test_fifo_eviction() {
        let mut buffer = HistoryBuffer::new(3).unwrap();
        for value in 1..=5 {
            buffer.push(value);
        }
        assert_eq!(buffer.snapshot(), vec![3, 4, 5]);
        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_partial_fill() {
        let mut buffer = HistoryBuffer::new(4).unwrap();
        buffer.push(10);
        buffer.push(20);
        assert_eq!(buffer.snapshot(), vec![10, 20]);
        assert!(!buffer.is_full());
        assert_eq!(buffer.latest(), Some(20));
    }

    #[test]
    fn test_many_wraparounds() {
        let mut buffer = HistoryBuffer::new(7).unwrap();
        for value in 0..1000u32 {
            buffer.push(value);
            let expected: Vec<u32> = (value.saturating_sub(6)..=value).collect();
            assert_eq!(buffer.snapshot(), expected);
            assert_eq!(buffer.latest(), Some(value));
        }
        assert_eq!(buffer.capacity(), 7);
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let mut buffer = HistoryBuffer::new(2).unwrap();
        buffer.push(1);
        buffer.push(2);
        buffer.push(3);
        assert_eq!(buffer.snapshot(), buffer.snapshot());
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = HistoryBuffer::<f32>::new(0);
        assert!(matches!(result, Err(MonitorError::Config(_))));
        assert!(MetricsHistory::new(0).is_err());
    }

    #[test]
    fn test_statistics() {
        let mut buffer = HistoryBuffer::new(3).unwrap();
        assert_eq!(buffer.average(), 0.0);
        assert_eq!(buffer.min(), None);

        for value in [10.0, 50.0, 30.0, 20.0] {
            buffer.push(value);
        }
        assert!((buffer.average() - 100.0 / 3.0).abs() < 0.001);
        assert_eq!(buffer.min(), Some(20.0));
        assert_eq!(buffer.max(), Some(50.0));
    }

    #[test]
    fn test_metrics_history_records_both_metrics() {
        let history = MetricsHistory::new(2).unwrap();
        history.record(&sample(1, 10.0, 90));
        history.record(&sample(2, 20.0, 80));
        history.record(&sample(3, 30.0, 70));

        let snapshot = history.snapshot();
        assert_eq!(snapshot.cpu, vec![20.0, 30.0]);
        assert_eq!(snapshot.ram.len(), 2);
        assert!((snapshot.ram[1] - 30.0).abs() < 0.001);
        assert_eq!(history.len(), 2);
        assert_eq!(history.capacity(), 2);
    }

    #[test]
    fn test_concurrent_record_and_snapshot() {
        let history = MetricsHistory::new(50).unwrap();
        let writer = history.clone();

        let handle = std::thread::spawn(move || {
            for tick in 1..=500u64 {
                writer.record(&sample(tick, (tick % 100) as f32, 50));
            }
        });

        for _ in 0..200 {
            let snapshot = history.snapshot();
            assert_eq!(snapshot.cpu.len(), snapshot.ram.len());
        }

        handle.join().unwrap();
        assert_eq!(history.len(), 50);
    }
}
