//! Parallel bitonic sort of a flat integer sequence.
//!
//! One distributor thread hands out disjoint sub-ranges ("units") of the
//! sequence to a fixed pool of worker threads through a monitor-style
//! coordinator. Units of the current phase all share one width; once every
//! unit of a phase is assigned and completed, the width doubles and the next
//! phase begins. Workers sort their unit with one stage of the bitonic
//! comparison network, holding no lock while they do so.
//!
//! The sequence length must be a power of two, as must the configured width
//! of the initial units.

pub mod config;
pub mod coordinator;
pub mod merge;
pub mod pool;
pub mod sequence;

pub use config::{ConfigError, SortConfig};
pub use coordinator::MonitorError;
pub use pool::{parallel_sort, parallel_sort_verified, SortError};
pub use sequence::{SequenceError, Verification};
