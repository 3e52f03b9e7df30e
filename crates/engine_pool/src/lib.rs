//! # Engine Pool
//!
//! Pre-allocated object pools for hot per-frame engine data such as particles,
//! lights and component arrays.
//!
//! ## Features
//!
//! - **Stable Handles**: [`Accessor`] keys follow their element as the pool compacts
//! - **Packed Storage**: active elements always occupy `[0, len)` for bulk iteration
//! - **O(1) Release**: swap-with-last compaction, no per-release allocation
//! - **Configurable Growth**: fixed-increment or doubling, loadable from TOML/RON
//!
//! ## Quick Start
//!
//! ```rust
//! use engine_pool::prelude::*;
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Light {
//!     intensity: f32,
//! }
//!
//! fn main() -> Result<(), PoolError> {
//!     let mut lights: Pool<Light> = Pool::new(8)?;
//!
//!     let key = lights.fetch();
//!     lights[key].intensity = 2.5;
//!
//!     for light in lights.iter_mut() {
//!         light.intensity *= 0.5;
//!     }
//!
//!     let released = lights.release(key)?;
//!     assert_eq!(released.intensity, 1.25);
//!     assert!(lights.is_empty());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod pool;

pub use config::{Config, ConfigError, PoolConfig};
pub use pool::{Accessor, GrowthPolicy, Pool, PoolError, PoolResult, PoolStats, PoolWithoutAccessor};

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PoolConfig},
        pool::{Accessor, GrowthPolicy, Pool, PoolError, PoolResult, PoolStats, PoolWithoutAccessor},
    };
    pub use slotmap::Key;
}
