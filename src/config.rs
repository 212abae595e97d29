//! Run configuration and the up-front validation that guards every entry
//! point. All checks happen before a single thread is spawned.

use thiserror::Error;

/// Worker-pool size used when nothing else is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// Width of the initial sort units used when nothing else is configured.
pub const DEFAULT_MIN_WIDTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sequence length {0} is not a power of two")]
    LenNotPowerOfTwo(usize),
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("minimum unit width {0} is not a power of two")]
    MinWidthNotPowerOfTwo(usize),
    #[error("minimum unit width {min_width} exceeds sequence length {len}")]
    MinWidthTooLarge { min_width: usize, len: usize },
}

/// Tuning knobs of one sort run.
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Number of worker threads, not counting the distributor.
    pub workers: usize,
    /// Width of the units in the first phase. Units of this width are sorted
    /// with the full comparison network; wider units only get the final
    /// merge pass, because their halves were sorted in an earlier phase.
    pub min_width: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            min_width: DEFAULT_MIN_WIDTH,
        }
    }
}

impl SortConfig {
    pub fn new(workers: usize, min_width: usize) -> Self {
        Self { workers, min_width }
    }

    /// Checks this configuration against the length of the sequence it is
    /// about to sort. `usize::is_power_of_two` is false for zero, so empty
    /// sequences are rejected here as well.
    pub fn validate(&self, len: usize) -> Result<(), ConfigError> {
        if !len.is_power_of_two() {
            return Err(ConfigError::LenNotPowerOfTwo(len));
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if !self.min_width.is_power_of_two() {
            return Err(ConfigError::MinWidthNotPowerOfTwo(self.min_width));
        }
        if self.min_width > len {
            return Err(ConfigError::MinWidthTooLarge {
                min_width: self.min_width,
                len,
            });
        }
        Ok(())
    }
}
