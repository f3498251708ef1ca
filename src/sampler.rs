//! Background sampling loop.
//!
//! A [`Sampler`] owns one dedicated thread per session. Every tick it queries
//! its [`StatsProvider`], turns the reading into a [`Sample`] and hands it to
//! the consumer, either a callback, a bounded channel or a stream. Sleeping
//! between ticks happens in short slices so [`Sampler::stop`] returns quickly
//! even with long tick intervals.

use crate::config::SamplerConfig;
use crate::error::{MonitorError, Result};
use crate::metrics::{data::Sample, traits::StatsProvider, SystemCollector};
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

/// Sleep until `deadline`, waking every `granularity` to check `cancel`.
///
/// Returns `false` if cancellation was observed before the deadline.
pub fn sleep_until(cancel: &CancellationToken, deadline: Instant, granularity: Duration) -> bool {
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(granularity));
    }
}

/// Lifecycle of a sampling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplerState {
    Idle,
    Running,
}

/// Cumulative tick accounting for a [`Sampler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerCounters {
    /// Ticks attempted
    pub ticks: u64,
    /// Samples handed to the consumer callback. With
    /// [`Sampler::start_channel`] or [`Sampler::start_stream`] the callback is
    /// the channel adapter, so this also counts samples later `dropped`.
    pub delivered: u64,
    /// Ticks skipped because the provider failed
    pub skipped: u64,
    /// Delivered samples discarded by a full or closed channel
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    ticks: AtomicU64,
    delivered: AtomicU64,
    skipped: AtomicU64,
    dropped: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> SamplerCounters {
        SamplerCounters {
            ticks: self.ticks.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Produces one [`Sample`] per tick on a background thread until stopped.
pub struct Sampler<P: StatsProvider + 'static = SystemCollector> {
    config: SamplerConfig,
    provider: Arc<Mutex<P>>,
    counters: Arc<Counters>,
    session: Option<Session>,
}

impl Sampler<SystemCollector> {
    /// Create a sampler reading from the running system.
    ///
    /// The first tick runs right after the collector primes its CPU counters,
    /// so tick 1 usually reports a CPU usage close to 0. Later ticks measure
    /// usage over the previous interval.
    pub fn new(config: SamplerConfig) -> Result<Self> {
        Self::with_provider(config, SystemCollector::new()?)
    }
}

impl<P: StatsProvider + 'static> Sampler<P> {
    /// Create a sampler reading from a custom provider.
    pub fn with_provider(config: SamplerConfig, provider: P) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            provider: Arc::new(Mutex::new(provider)),
            counters: Arc::new(Counters::default()),
            session: None,
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn state(&self) -> SamplerState {
        if self.session.is_some() {
            SamplerState::Running
        } else {
            SamplerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SamplerState::Running
    }

    pub fn counters(&self) -> SamplerCounters {
        self.counters.snapshot()
    }

    /// Start sampling at the configured interval, calling `on_sample` from the
    /// sampler thread for every successful tick.
    pub fn start<F>(&mut self, on_sample: F) -> Result<()>
    where
        F: FnMut(Sample) + Send + 'static,
    {
        self.start_with_interval(self.config.tick_interval_ms, on_sample)
    }

    /// Start sampling with an explicit tick interval.
    pub fn start_with_interval<F>(&mut self, interval_ms: u64, on_sample: F) -> Result<()>
    where
        F: FnMut(Sample) + Send + 'static,
    {
        if interval_ms == 0 {
            return Err(MonitorError::config_error("tick interval must be greater than 0"));
        }
        if self.session.is_some() {
            return Err(MonitorError::invalid_state(
                "sampler is already running, stop it before starting again",
            ));
        }

        let cancel = CancellationToken::new();
        let worker = Worker {
            provider: Arc::clone(&self.provider),
            counters: Arc::clone(&self.counters),
            cancel: cancel.clone(),
            interval: Duration::from_millis(interval_ms),
            check: Duration::from_millis(self.config.cancellation_check_ms),
        };

        let handle = thread::Builder::new()
            .name("metrics-sampler".to_string())
            .spawn(move || worker.run(on_sample))?;

        debug!(
            interval_ms,
            check_ms = self.config.cancellation_check_ms,
            "sampler started"
        );

        self.session = Some(Session { cancel, handle });
        Ok(())
    }

    /// Start sampling into a bounded channel of `channel_capacity` samples.
    ///
    /// Delivery never blocks the sampler: when the channel is full, or the
    /// receiver has been dropped, the sample is discarded and counted in
    /// [`SamplerCounters::dropped`].
    pub fn start_channel(&mut self) -> Result<mpsc::Receiver<Sample>> {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        let counters = Arc::clone(&self.counters);

        self.start(move |sample| {
            if let Err(err) = tx.try_send(sample) {
                counters.dropped.fetch_add(1, Ordering::Relaxed);
                match err {
                    TrySendError::Full(sample) => {
                        trace!(tick = sample.tick, "consumer lagging, dropping sample")
                    }
                    TrySendError::Closed(sample) => {
                        trace!(tick = sample.tick, "consumer gone, dropping sample")
                    }
                }
            }
        })?;

        Ok(rx)
    }

    /// Start sampling and expose the samples as a stream.
    pub fn start_stream(&mut self) -> Result<BoxStream<'static, Sample>> {
        let rx = self.start_channel()?;
        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    /// Cancel the running session and wait for the sampler thread to exit.
    ///
    /// No sample is delivered after this returns. Does nothing when idle.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        session.cancel.cancel();
        if session.handle.join().is_err() {
            error!("sampler thread panicked, session ended early");
        }

        let counters = self.counters.snapshot();
        debug!(
            ticks = counters.ticks,
            delivered = counters.delivered,
            skipped = counters.skipped,
            dropped = counters.dropped,
            "sampler stopped"
        );
    }
}

impl<P: StatsProvider + 'static> Drop for Sampler<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State moved onto the sampler thread.
struct Worker<P> {
    provider: Arc<Mutex<P>>,
    counters: Arc<Counters>,
    cancel: CancellationToken,
    interval: Duration,
    check: Duration,
}

impl<P: StatsProvider> Worker<P> {
    fn run<F: FnMut(Sample)>(self, mut on_sample: F) {
        let mut tick: u64 = 0;
        let mut next_tick = Instant::now();

        while !self.cancel.is_cancelled() {
            tick += 1;
            self.counters.ticks.fetch_add(1, Ordering::Relaxed);

            let reading = self
                .provider
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .read_stats();

            match reading {
                Ok(raw) => {
                    on_sample(Sample::from_raw(tick, raw));
                    self.counters.delivered.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                    warn!(tick, error = %err, "skipping tick, failed to read system stats");
                }
            }

            next_tick += self.interval;
            // Fell behind: run the next tick now instead of bursting to catch up.
            let now = Instant::now();
            if next_tick < now {
                next_tick = now;
            }

            if !sleep_until(&self.cancel, next_tick, self.check) {
                break;
            }
        }
    }
}
