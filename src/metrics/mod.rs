//! System metrics readings and rolling history.
//!
//! This module provides the OS statistics provider, the sample data model
//! built from its readings, and the fixed-capacity buffers that keep the most
//! recent CPU and memory percentages for display.

pub mod collector;
pub mod data;
pub mod history;
pub mod traits;

// Re-export commonly used items
pub use collector::SystemCollector;
pub use data::{RawMemoryStats, RawStats, Sample};
pub use history::{HistoryBuffer, HistorySnapshot, MetricsHistory};
pub use traits::StatsProvider;
