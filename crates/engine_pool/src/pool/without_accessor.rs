//! Accessor-free pool
//!
//! For data nobody needs a long-lived handle to, such as fire-and-forget
//! particles swept by a predicate each frame. Release finds the element by
//! value, which costs a linear scan.

use super::storage::SlotStorage;
use super::{PoolError, PoolResult, PoolStats};
use crate::config::PoolConfig;

/// Pool that hands out references instead of handles
///
/// Shares the packed layout of [`Pool`](super::Pool): active elements live in
/// `[0, len)` and release uses swap-to-last compaction, so order is not
/// preserved.
///
/// # Usage
///
/// ```rust
/// use engine_pool::{PoolError, PoolWithoutAccessor};
///
/// # fn main() -> Result<(), PoolError> {
/// let mut sparks: PoolWithoutAccessor<u32> = PoolWithoutAccessor::new(8)?;
/// *sparks.fetch() = 3;
/// *sparks.fetch() = 7;
///
/// sparks.release(&3)?;
/// assert_eq!(sparks.as_slice(), &[7]);
/// # Ok(())
/// # }
/// ```
pub struct PoolWithoutAccessor<T> {
    storage: SlotStorage<T>,
}

impl<T: Default> PoolWithoutAccessor<T> {
    /// Create a pool with `capacity` pre-constructed slots and the default growth policy
    ///
    /// Fails with [`PoolError::InvalidArgument`] when `capacity` is zero.
    pub fn new(capacity: usize) -> PoolResult<Self> {
        Self::with_config(&PoolConfig::with_capacity(capacity))
    }

    /// Create a pool from configuration
    pub fn with_config(config: &PoolConfig) -> PoolResult<Self> {
        Ok(Self {
            storage: SlotStorage::new(config)?,
        })
    }

    /// Activate the next free slot and return its default-valued storage
    pub fn fetch(&mut self) -> &mut T {
        if let Some(target) = self.storage.grow_target() {
            self.storage.resize_elements(target);
        }

        let slot = self.storage.activate();
        &mut self.storage.active_mut()[slot]
    }

    /// Release the first active element equal to `element` and return it
    ///
    /// Fails with [`PoolError::NotFound`] when no active element matches.
    pub fn release(&mut self, element: &T) -> PoolResult<T>
    where
        T: PartialEq,
    {
        let slot = self
            .storage
            .active()
            .iter()
            .position(|candidate| candidate == element)
            .ok_or(PoolError::NotFound)?;
        Ok(self.storage.deactivate(slot))
    }

    /// Release the element in an active slot
    pub fn release_at(&mut self, slot: usize) -> PoolResult<T> {
        self.storage.check_slot(slot, self.storage.len())?;
        Ok(self.storage.deactivate(slot))
    }

    /// Release every active element matching `predicate`; returns how many were released
    pub fn release_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut released = 0;
        let mut slot = 0;
        while slot < self.storage.len() {
            if predicate(&self.storage.active()[slot]) {
                // The last active element now sits in `slot`; test it next.
                self.storage.deactivate(slot);
                released += 1;
            } else {
                slot += 1;
            }
        }
        if released > 0 {
            log::trace!("Released {} elements by predicate", released);
        }
        released
    }

    /// Resize the backing storage
    ///
    /// Fails with [`PoolError::InvalidArgument`] when `new_capacity` is below
    /// [`len`](Self::len), leaving the pool untouched. O(n).
    pub fn resize(&mut self, new_capacity: usize) -> PoolResult<()> {
        self.storage.check_resize(new_capacity)?;
        self.storage.resize_elements(new_capacity);
        Ok(())
    }

    /// Release every active element, resetting each slot to its default
    pub fn clear(&mut self) {
        self.storage.clear();
    }
}

impl<T> PoolWithoutAccessor<T> {
    /// Exchange the elements in slots `i` and `j`
    ///
    /// Fails with [`PoolError::InvalidArgument`] if either index is past the capacity.
    pub fn swap(&mut self, i: usize, j: usize) -> PoolResult<()> {
        self.storage.swap(i, j)
    }

    /// Number of active elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Total slots, active and free
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Whether no element is active
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the next fetch will grow the pool
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Active elements, packed
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.storage.active()
    }

    /// Active elements, packed and mutable
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.active_mut()
    }

    /// Iterate over active elements
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterate mutably over active elements
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Usage statistics
    #[must_use]
    pub const fn stats(&self) -> &PoolStats {
        self.storage.stats()
    }
}

impl<'a, T> IntoIterator for &'a PoolWithoutAccessor<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut PoolWithoutAccessor<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PoolWithoutAccessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolWithoutAccessor")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("active", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::GrowthPolicy;
    use std::collections::HashSet;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Spark {
        id: u32,
        age: f32,
    }

    fn ids(pool: &PoolWithoutAccessor<Spark>) -> HashSet<u32> {
        pool.iter().map(|spark| spark.id).collect()
    }

    fn filled(count: u32) -> PoolWithoutAccessor<Spark> {
        let mut pool: PoolWithoutAccessor<Spark> = PoolWithoutAccessor::new(4).unwrap();
        for id in 1..=count {
            pool.fetch().id = id;
        }
        pool
    }

    #[test]
    fn test_construct_zero_capacity() {
        let result: PoolResult<PoolWithoutAccessor<Spark>> = PoolWithoutAccessor::new(0);
        assert!(matches!(result, Err(PoolError::InvalidArgument { .. })));
    }

    #[test]
    fn test_fetch_returns_default_storage() {
        let mut pool: PoolWithoutAccessor<Spark> = PoolWithoutAccessor::new(2).unwrap();
        assert_eq!(*pool.fetch(), Spark::default());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_release_by_value() {
        let mut pool = filled(3);
        let released = pool
            .release(&Spark { id: 2, age: 0.0 })
            .unwrap();
        assert_eq!(released.id, 2);
        assert_eq!(pool.len(), 2);
        assert_eq!(ids(&pool), HashSet::from([1, 3]));
    }

    #[test]
    fn test_release_missing_value() {
        let mut pool = filled(2);
        let result = pool.release(&Spark { id: 42, age: 0.0 });
        assert!(matches!(result, Err(PoolError::NotFound)));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_release_ignores_free_slots() {
        let mut pool = filled(1);
        // Free slots hold defaults; they must not match a release.
        let result = pool.release(&Spark::default());
        assert!(matches!(result, Err(PoolError::NotFound)));
    }

    #[test]
    fn test_refetch_after_release_is_default() {
        let mut pool = filled(4);
        pool.release(&Spark { id: 1, age: 0.0 }).unwrap();
        assert_eq!(*pool.fetch(), Spark::default());
        assert_eq!(pool.capacity(), 4);
    }

    #[test]
    fn test_release_at() {
        let mut pool = filled(3);
        let released = pool.release_at(0).unwrap();
        assert_eq!(released.id, 1);
        assert_eq!(ids(&pool), HashSet::from([2, 3]));
        assert!(matches!(pool.release_at(2), Err(PoolError::InvalidArgument { .. })));
    }

    #[test]
    fn test_release_where_sweeps_matches() {
        let mut pool = filled(4);
        for spark in &mut pool {
            spark.age = spark.id as f32;
        }

        let released = pool.release_where(|spark| spark.age > 1.5);
        assert_eq!(released, 3);
        assert_eq!(ids(&pool), HashSet::from([1]));
        assert_eq!(pool.stats().total_released, 3);
    }

    #[test]
    fn test_release_where_moved_element_is_checked() {
        let mut pool = filled(3);
        // Slot 0 is released and slot 2 moves in; it must be tested too.
        let released = pool.release_where(|spark| spark.id != 2);
        assert_eq!(released, 2);
        assert_eq!(pool.as_slice(), &[Spark { id: 2, age: 0.0 }]);
    }

    #[test]
    fn test_growth() {
        let config = PoolConfig::with_capacity(2).growth(GrowthPolicy::Fixed { increment: 3 });
        let mut pool: PoolWithoutAccessor<Spark> = PoolWithoutAccessor::with_config(&config).unwrap();
        for id in 0..3 {
            pool.fetch().id = id;
        }
        assert_eq!(pool.capacity(), 5);
        assert_eq!(ids(&pool), HashSet::from([0, 1, 2]));
    }

    #[test]
    fn test_resize_below_count_fails() {
        let mut pool = filled(3);
        assert!(matches!(pool.resize(2), Err(PoolError::InvalidArgument { .. })));
        assert_eq!(pool.capacity(), 4);
        pool.resize(3).unwrap();
        assert!(pool.is_full());
        assert_eq!(ids(&pool), HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_resize_to_same_capacity_is_noop() {
        let mut pool = filled(2);
        pool.resize(4).unwrap();
        assert_eq!(pool.stats().resize_count, 0);
        pool.resize(6).unwrap();
        assert_eq!(pool.stats().resize_count, 1);
    }

    #[test]
    fn test_swap_and_clear() {
        let mut pool = filled(2);
        pool.swap(0, 1).unwrap();
        assert_eq!(pool.as_slice()[0].id, 2);
        assert!(pool.swap(0, 4).is_err());

        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(*pool.fetch(), Spark::default());
    }
}
