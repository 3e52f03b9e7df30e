//! Capacity growth policies

use serde::{Deserialize, Serialize};

use super::{PoolError, PoolResult};

/// Slots added per growth step under the default policy
pub const DEFAULT_GROWTH_INCREMENT: usize = 25;

/// How a pool grows when a fetch finds every slot active
///
/// Growth copies the whole pool, so a pool that regularly grows at runtime
/// should be given a larger initial capacity instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthPolicy {
    /// Add a fixed number of slots
    Fixed {
        /// Slots added per step; must be non-zero
        increment: usize,
    },
    /// Double the capacity
    Doubling,
}

impl GrowthPolicy {
    /// Capacity to grow to from `current`; always strictly larger
    #[must_use]
    pub const fn next_capacity(self, current: usize) -> usize {
        let next = match self {
            Self::Fixed { increment } => current.saturating_add(increment),
            Self::Doubling => current.saturating_mul(2),
        };
        if next > current {
            next
        } else {
            current.saturating_add(1)
        }
    }

    /// Reject policies that could never grow
    pub fn validate(self) -> PoolResult<()> {
        match self {
            Self::Fixed { increment: 0 } => {
                Err(PoolError::invalid("fixed growth increment must be greater than zero"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::Fixed {
            increment: DEFAULT_GROWTH_INCREMENT,
        }
    }
}
