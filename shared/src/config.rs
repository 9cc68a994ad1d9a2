use std::default::Default;

/// Lag tolerance values below this are raised to it.
pub const MIN_LAG_TOLERANCE: u16 = 5;

/// Contains Config properties shared by both ends of the synchronization
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Maximum number of pending commands a client-side object may hold
    /// before its queue is drained in accelerated mode.
    pub lag_tolerance: u16,
}

impl SyncConfig {
    /// The lag tolerance actually used by the reconciliation queue.
    pub fn effective_lag_tolerance(&self) -> u16 {
        self.lag_tolerance.max(MIN_LAG_TOLERANCE)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            lag_tolerance: MIN_LAG_TOLERANCE,
        }
    }
}
