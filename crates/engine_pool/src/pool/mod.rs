//! Object Pool System
//!
//! Pre-allocated storage for data that is created and destroyed every frame
//! (particles, lights, per-entity render state). All slots are constructed up
//! front and active elements are kept packed at the front of the backing
//! array so per-frame processing is a linear walk over a slice.
//!
//! # Architecture
//!
//! ```text
//! Pool<T>                              PoolWithoutAccessor<T>
//!   ├── SlotStorage<T>  ◄── shared ──►   └── SlotStorage<T>
//!   │     elements: [A B C | free free]          elements: [A B C | free free]
//!   ├── owners:  [a b c | f  f ]
//!   └── indices: a→0 b→1 c→2 f→3 f→4
//! ```
//!
//! Releasing `b` swaps the last active element into slot 1 and updates
//! `c`'s index, so every other accessor still resolves to its own value:
//!
//! ```text
//!   elements: [A C | default free free]    indices: a→0 c→1
//! ```
//!
//! Order of active elements is not preserved across releases.
//!
//! # Performance Characteristics
//!
//! | Operation                       | Time Complexity |
//! |---------------------------------|-----------------|
//! | `Pool::fetch`                   | O(1) amortized  |
//! | `Pool::release`                 | O(1)            |
//! | `PoolWithoutAccessor::release`  | O(n)            |
//! | `resize`                        | O(n)            |
//!
//! Neither pool is internally synchronized. Every mutation takes `&mut self`,
//! so sharing a pool across threads needs a lock or one pool per worker.

mod accessor_pool;
mod growth;
mod stats;
mod storage;
mod without_accessor;

pub use accessor_pool::{Accessor, Pool};
pub use growth::{GrowthPolicy, DEFAULT_GROWTH_INCREMENT};
pub use stats::PoolStats;
pub use without_accessor::PoolWithoutAccessor;

use thiserror::Error;

/// Errors returned by pool operations
///
/// Every variant is a caller logic error; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// An argument violated an operation's precondition
    ///
    /// Raised for a zero initial capacity, a zero growth increment, a null,
    /// stale or inactive accessor, shrinking below the active count, or an
    /// out-of-range slot index.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument
        reason: String,
    },

    /// The element is not among the active slots
    #[error("Element not found among active slots")]
    NotFound,
}

impl PoolError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
