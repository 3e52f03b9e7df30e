//! Pool usage statistics

/// Statistics for monitoring pool behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Elements fetched since creation
    pub total_fetched: u64,
    /// Elements released since creation
    pub total_released: u64,
    /// Number of times the backing storage was resized
    pub resize_count: u64,
    /// Highest number of simultaneously active elements
    pub peak_active: usize,
}

impl PoolStats {
    pub(crate) fn record_fetch(&mut self, active: usize) {
        self.total_fetched += 1;
        self.peak_active = self.peak_active.max(active);
    }

    pub(crate) fn record_release(&mut self, released: usize) {
        self.total_released += released as u64;
    }

    pub(crate) fn record_resize(&mut self) {
        self.resize_count += 1;
    }
}
