//! System statistics provider backed by sysinfo.

use crate::error::{MonitorError, Result};
use crate::metrics::{
    data::{RawMemoryStats, RawStats, Sample},
    traits::StatsProvider,
};
use sysinfo::System;

/// Reads CPU usage and memory statistics from the running system.
pub struct SystemCollector {
    system: System,
}

impl SystemCollector {
    /// Create a new collector and prime the CPU usage counters.
    ///
    /// CPU usage is computed from the difference between two refreshes, so the
    /// first reading after construction is only meaningful once
    /// [`sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`] has elapsed.
    pub fn new() -> Result<Self> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            tracing::warn!("sysinfo does not support this platform, readings will be empty");
        }

        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();

        Ok(Self { system })
    }

    /// Refresh the parts of the system we read.
    fn refresh(&mut self) {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
    }

    /// Average usage across all logical CPUs.
    fn collect_cpu_percent(&self) -> Result<f32> {
        let cpus = self.system.cpus();

        if cpus.is_empty() {
            return Err(MonitorError::sample_error("No CPU information available"));
        }

        let total = cpus.iter().map(|cpu| cpu.cpu_usage()).sum::<f32>();
        Ok(total / cpus.len() as f32)
    }

    /// Collect memory statistics.
    fn collect_memory_stats(&self) -> Result<RawMemoryStats> {
        let total_bytes = self.system.total_memory();

        if total_bytes == 0 {
            return Err(MonitorError::sample_error("No memory information available"));
        }

        Ok(RawMemoryStats {
            total_bytes,
            used_bytes: self.system.used_memory(),
            available_bytes: self.system.available_memory(),
        })
    }

    /// Take a single sample outside of a sampling session.
    ///
    /// Waits for the minimum CPU update interval first so the CPU figure is
    /// not the zero reading of a freshly primed collector.
    pub fn single_sample(&mut self) -> Result<Sample> {
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        let raw = self.read_stats()?;
        Ok(Sample::from_raw(1, raw))
    }
}

impl StatsProvider for SystemCollector {
    fn read_stats(&mut self) -> Result<RawStats> {
        self.refresh();

        Ok(RawStats {
            cpu_percent: self.collect_cpu_percent()?,
            memory: self.collect_memory_stats()?,
        })
    }
}
