//! # Game Booster - CPU and memory sampler
//!
//! Polls system CPU and memory utilization at a fixed cadence and keeps the
//! most recent readings in fixed-capacity rolling buffers, ready to be drawn
//! as live charts.
//!
//! ## Features
//!
//! - **Background sampling**: one `Sample` per tick on a dedicated thread
//! - **Responsive stop**: cancellation is checked in short slices between ticks
//! - **Flexible delivery**: callback, bounded channel or stream
//! - **Rolling history**: circular buffers per metric, safe to read while sampling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use game_booster::{Monitor, SamplerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut monitor = Monitor::new(SamplerConfig::default())?;
//!     monitor.start(|sample| println!("cpu {:.1}%", sample.cpu_percent))?;
//!
//!     std::thread::sleep(std::time::Duration::from_secs(5));
//!     monitor.stop();
//!
//!     let history = monitor.snapshot();
//!     println!("{} cpu readings retained", history.cpu.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod render;
pub mod sampler;

// Re-export public API
pub use config::SamplerConfig;
pub use error::{MonitorError, Result};
pub use metrics::{
    collector::SystemCollector,
    data::{RawMemoryStats, RawStats, Sample},
    history::{HistoryBuffer, HistorySnapshot, MetricsHistory},
    traits::StatsProvider,
};
pub use monitor::Monitor;
pub use sampler::{Sampler, SamplerCounters, SamplerState};
pub use tokio_util::sync::CancellationToken;

/// The default tick interval in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// The default number of values kept per metric
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// The default cancellation check granularity in milliseconds
pub const DEFAULT_CANCELLATION_CHECK_MS: u64 = 100;

/// The default bound of the sample channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;
