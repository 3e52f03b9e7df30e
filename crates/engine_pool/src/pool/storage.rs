//! Packed element storage shared by both pool variants
//!
//! Owns the element array and the active count. Slots `[0, count)` are
//! active, `[count, capacity)` hold `T::default()` ready for the next fetch.

use std::any::type_name;
use std::mem;

use super::{GrowthPolicy, PoolError, PoolResult, PoolStats};
use crate::config::PoolConfig;

pub(crate) struct SlotStorage<T> {
    elements: Vec<T>,
    count: usize,
    growth: GrowthPolicy,
    stats: PoolStats,
}

impl<T: Default> SlotStorage<T> {
    pub fn new(config: &PoolConfig) -> PoolResult<Self> {
        config.validate()?;

        let elements = std::iter::repeat_with(T::default)
            .take(config.initial_capacity)
            .collect();

        log::debug!(
            "Created pool of {} with {} slots ({:?} growth)",
            type_name::<T>(),
            config.initial_capacity,
            config.growth
        );

        Ok(Self {
            elements,
            count: 0,
            growth: config.growth,
            stats: PoolStats::default(),
        })
    }

    /// Capacity to grow to before the next activation, if the pool is full
    pub fn grow_target(&self) -> Option<usize> {
        if self.count == self.capacity() {
            let target = self.growth.next_capacity(self.capacity());
            log::warn!(
                "Pool of {} exhausted at {} slots, growing to {}",
                type_name::<T>(),
                self.capacity(),
                target
            );
            Some(target)
        } else {
            None
        }
    }

    pub fn check_resize(&self, new_capacity: usize) -> PoolResult<()> {
        if new_capacity < self.count {
            return Err(PoolError::invalid(format!(
                "cannot resize to {new_capacity} slots with {} active",
                self.count
            )));
        }
        Ok(())
    }

    /// Caller has already run `check_resize`.
    pub fn resize_elements(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.count);

        let old_capacity = self.capacity();
        if new_capacity == old_capacity {
            return;
        }
        if new_capacity > old_capacity {
            self.elements.reserve_exact(new_capacity - old_capacity);
        }
        self.elements.resize_with(new_capacity, T::default);
        self.stats.record_resize();

        log::debug!(
            "Resized pool of {} from {} to {} slots",
            type_name::<T>(),
            old_capacity,
            new_capacity
        );
    }

    /// Activate the next free slot and return its index; the pool must not be full
    pub fn activate(&mut self) -> usize {
        debug_assert!(self.count < self.capacity());

        let slot = self.count;
        self.count += 1;
        self.stats.record_fetch(self.count);
        slot
    }

    /// Swap-to-last compaction: move the last active element into `slot`
    /// and hand back the value that was there.
    pub fn deactivate(&mut self, slot: usize) -> T {
        debug_assert!(slot < self.count);

        let last = self.count - 1;
        self.elements.swap(slot, last);
        let value = mem::take(&mut self.elements[last]);
        self.count = last;
        self.stats.record_release(1);
        value
    }

    pub fn clear(&mut self) {
        for element in &mut self.elements[..self.count] {
            *element = T::default();
        }
        self.stats.record_release(self.count);
        self.count = 0;
    }
}

impl<T> SlotStorage<T> {
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.elements.len()
    }

    pub fn active(&self) -> &[T] {
        &self.elements[..self.count]
    }

    pub fn active_mut(&mut self) -> &mut [T] {
        &mut self.elements[..self.count]
    }

    pub fn check_slot(&self, slot: usize, bound: usize) -> PoolResult<()> {
        if slot >= bound {
            return Err(PoolError::invalid(format!(
                "slot {slot} out of range (bound {bound})"
            )));
        }
        Ok(())
    }

    /// Exchange two elements anywhere in the backing array
    pub fn swap(&mut self, i: usize, j: usize) -> PoolResult<()> {
        self.check_slot(i, self.capacity())?;
        self.check_slot(j, self.capacity())?;
        self.elements.swap(i, j);
        Ok(())
    }

    pub const fn stats(&self) -> &PoolStats {
        &self.stats
    }
}
