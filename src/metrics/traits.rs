//! Traits for OS statistics providers.

use crate::error::Result;
use crate::metrics::data::RawStats;

/// Source of instantaneous CPU and memory readings.
///
/// A provider is queried synchronously once per tick from the sampler thread.
/// Returning an error skips that tick; the session keeps running.
pub trait StatsProvider: Send {
    /// Read the current CPU usage and memory statistics.
    fn read_stats(&mut self) -> Result<RawStats>;
}

impl<F> StatsProvider for F
where
    F: FnMut() -> Result<RawStats> + Send,
{
    fn read_stats(&mut self) -> Result<RawStats> {
        self()
    }
}
