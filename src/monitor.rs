//! A sampler wired to a shared rolling history.

use crate::config::SamplerConfig;
use crate::error::Result;
use crate::metrics::{
    data::Sample,
    history::{HistorySnapshot, MetricsHistory},
    traits::StatsProvider,
    SystemCollector,
};
use crate::sampler::{Sampler, SamplerCounters, SamplerState};

/// Runs a [`Sampler`] and records every delivered sample into a
/// [`MetricsHistory`] before forwarding it to the caller.
pub struct Monitor<P: StatsProvider + 'static = SystemCollector> {
    sampler: Sampler<P>,
    history: MetricsHistory,
}

impl Monitor<SystemCollector> {
    /// Create a monitor reading from the running system.
    pub fn new(config: SamplerConfig) -> Result<Self> {
        Self::with_provider(config, SystemCollector::new()?)
    }
}

impl<P: StatsProvider + 'static> Monitor<P> {
    pub fn with_provider(config: SamplerConfig, provider: P) -> Result<Self> {
        let history = MetricsHistory::new(config.history_capacity)?;
        let sampler = Sampler::with_provider(config, provider)?;
        Ok(Self { sampler, history })
    }

    /// Start sampling; `on_sample` runs on the sampler thread after the
    /// sample has been recorded.
    pub fn start<F>(&mut self, mut on_sample: F) -> Result<()>
    where
        F: FnMut(Sample) + Send + 'static,
    {
        let history = self.history.clone();
        self.sampler.start(move |sample| {
            history.record(&sample);
            on_sample(sample);
        })
    }

    /// Start sampling into the history only.
    pub fn start_recording(&mut self) -> Result<()> {
        self.start(|_| {})
    }

    pub fn stop(&mut self) {
        self.sampler.stop();
    }

    pub fn state(&self) -> SamplerState {
        self.sampler.state()
    }

    pub fn is_running(&self) -> bool {
        self.sampler.is_running()
    }

    /// Handle to the shared history, usable from any thread.
    pub fn history(&self) -> MetricsHistory {
        self.history.clone()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        self.history.snapshot()
    }

    pub fn counters(&self) -> SamplerCounters {
        self.sampler.counters()
    }

    pub fn config(&self) -> &SamplerConfig {
        self.sampler.config()
    }
}
