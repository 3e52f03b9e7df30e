//! Accessor-based pool
//!
//! `Pool<T>` hands out [`Accessor`] keys that keep resolving to the same
//! element while other elements are released and the pool compacts.

use std::ops::{Index, IndexMut};

use slotmap::{new_key_type, Key, SlotMap};

use super::storage::SlotStorage;
use super::{PoolError, PoolResult, PoolStats};
use crate::config::PoolConfig;

new_key_type! {
    /// Opaque handle to an element in a [`Pool`]
    ///
    /// The pool tracks which slot each accessor currently points at and
    /// updates it whenever compaction moves the element. Accessors are
    /// retired on release; a retired accessor no longer resolves, even after
    /// its old slot is fetched again. `Accessor::null()` never resolves.
    pub struct Accessor;
}

/// Pool with O(1) handle-based release
///
/// Active elements occupy `[0, len)` of the backing array. Releasing moves
/// the last active element into the freed slot, so iteration order is not
/// stable across releases.
///
/// # Usage
///
/// ```rust
/// use engine_pool::{Pool, PoolError};
///
/// # fn main() -> Result<(), PoolError> {
/// let mut particles: Pool<[f32; 3]> = Pool::new(4)?;
/// let a = particles.fetch();
/// let b = particles.fetch();
/// particles[a] = [1.0, 0.0, 0.0];
/// particles[b] = [0.0, 1.0, 0.0];
///
/// particles.release(a)?;
/// assert_eq!(particles[b], [0.0, 1.0, 0.0]);
/// assert_eq!(particles.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Pool<T> {
    storage: SlotStorage<T>,
    /// Accessor associated with each slot, free slots included
    owners: Vec<Accessor>,
    /// Current slot of each live accessor
    indices: SlotMap<Accessor, usize>,
}

impl<T: Default> Pool<T> {
    /// Create a pool with `capacity` pre-constructed slots and the default growth policy
    ///
    /// Fails with [`PoolError::InvalidArgument`] when `capacity` is zero.
    pub fn new(capacity: usize) -> PoolResult<Self> {
        Self::with_config(&PoolConfig::with_capacity(capacity))
    }

    /// Create a pool from configuration
    pub fn with_config(config: &PoolConfig) -> PoolResult<Self> {
        let storage = SlotStorage::new(config)?;
        let capacity = storage.capacity();

        let mut indices = SlotMap::with_capacity_and_key(capacity);
        let owners = (0..capacity).map(|slot| indices.insert(slot)).collect();

        Ok(Self {
            storage,
            owners,
            indices,
        })
    }

    /// Activate the next free slot and return its accessor
    ///
    /// The slot holds `T::default()`. A full pool grows by its growth policy
    /// first, which copies the whole pool.
    pub fn fetch(&mut self) -> Accessor {
        if let Some(target) = self.storage.grow_target() {
            self.resize_unchecked(target);
        }

        let slot = self.storage.activate();
        let accessor = self.owners[slot];
        log::trace!("Fetched slot {} ({:?})", slot, accessor);
        accessor
    }

    /// Fetch a slot and store `value` in it
    pub fn fetch_with(&mut self, value: T) -> Accessor {
        let accessor = self.fetch();
        self[accessor] = value;
        accessor
    }

    /// Release an active element and return its value
    ///
    /// The last active element moves into the freed slot and its accessor is
    /// updated to follow it. The released accessor is retired. Fails with
    /// [`PoolError::InvalidArgument`] for a null, retired or inactive accessor.
    pub fn release(&mut self, accessor: Accessor) -> PoolResult<T> {
        let slot = self.active_index(accessor)?;
        let last = self.storage.len() - 1;

        let moved = self.owners[last];
        self.indices[moved] = slot;
        self.owners.swap(slot, last);
        let value = self.storage.deactivate(slot);

        // The freed slot gets a fresh accessor so the released one stays dead.
        self.indices.remove(accessor);
        self.owners[last] = self.indices.insert(last);

        log::trace!("Released {:?} from slot {} (moved slot {} in)", accessor, slot, last);
        Ok(value)
    }

    /// Resize the backing storage
    ///
    /// Growing default-constructs the new slots; shrinking drops free slots
    /// only. Fails with [`PoolError::InvalidArgument`] when `new_capacity` is
    /// below [`len`](Self::len), leaving the pool untouched. O(n).
    pub fn resize(&mut self, new_capacity: usize) -> PoolResult<()> {
        self.storage.check_resize(new_capacity)?;
        self.resize_unchecked(new_capacity);
        Ok(())
    }

    fn resize_unchecked(&mut self, new_capacity: usize) {
        let old_capacity = self.capacity();

        if new_capacity > old_capacity {
            let added = new_capacity - old_capacity;
            self.owners.reserve_exact(added);
            self.indices.reserve(added);
            self.storage.resize_elements(new_capacity);
            for slot in old_capacity..new_capacity {
                let accessor = self.indices.insert(slot);
                self.owners.push(accessor);
            }
        } else {
            for accessor in self.owners.drain(new_capacity..) {
                self.indices.remove(accessor);
            }
            self.storage.resize_elements(new_capacity);
        }
    }

    /// Release every active element, resetting each slot to its default
    ///
    /// All outstanding accessors are retired.
    pub fn clear(&mut self) {
        for slot in 0..self.storage.len() {
            self.indices.remove(self.owners[slot]);
            self.owners[slot] = self.indices.insert(slot);
        }
        self.storage.clear();
    }
}

impl<T> Pool<T> {
    fn active_index(&self, accessor: Accessor) -> PoolResult<usize> {
        if accessor.is_null() {
            return Err(PoolError::invalid("null accessor"));
        }
        match self.indices.get(accessor) {
            Some(&slot) if slot < self.storage.len() => Ok(slot),
            Some(&slot) => Err(PoolError::invalid(format!(
                "accessor points at free slot {slot}"
            ))),
            None => Err(PoolError::invalid("accessor was released or belongs to another pool")),
        }
    }

    /// Current slot of an active accessor
    #[must_use]
    pub fn index_of(&self, accessor: Accessor) -> Option<usize> {
        self.active_index(accessor).ok()
    }

    /// Whether `accessor` refers to an active element of this pool
    #[must_use]
    pub fn contains(&self, accessor: Accessor) -> bool {
        self.active_index(accessor).is_ok()
    }

    /// Element behind an active accessor
    #[must_use]
    pub fn get(&self, accessor: Accessor) -> Option<&T> {
        let slot = self.index_of(accessor)?;
        Some(&self.storage.active()[slot])
    }

    /// Mutable element behind an active accessor, for in-place updates
    pub fn get_mut(&mut self, accessor: Accessor) -> Option<&mut T> {
        let slot = self.index_of(accessor)?;
        Some(&mut self.storage.active_mut()[slot])
    }

    /// Exchange the elements in slots `i` and `j` without updating accessors
    ///
    /// Accessors keep pointing at the slots, not the values, so afterwards
    /// they resolve to whatever value was swapped in. Callers reordering with
    /// this must track the correspondence themselves and should not mix it
    /// with [`release`](Self::release). Fails with
    /// [`PoolError::InvalidArgument`] if either index is past the capacity.
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

    /// Accessors of active elements, in slot order
    pub fn accessors(&self) -> impl Iterator<Item = Accessor> + '_ {
        self.owners[..self.len()].iter().copied()
    }

    /// Iterate over active elements together with their accessors
    pub fn iter_with_accessors(&self) -> impl Iterator<Item = (Accessor, &T)> + '_ {
        self.accessors().zip(self.as_slice())
    }

    /// Usage statistics
    #[must_use]
    pub const fn stats(&self) -> &PoolStats {
        self.storage.stats()
    }
}

impl<T> Index<Accessor> for Pool<T> {
    type Output = T;

    fn index(&self, accessor: Accessor) -> &T {
        match self.active_index(accessor) {
            Ok(slot) => &self.storage.active()[slot],
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<Accessor> for Pool<T> {
    fn index_mut(&mut self, accessor: Accessor) -> &mut T {
        match self.active_index(accessor) {
            Ok(slot) => &mut self.storage.active_mut()[slot],
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Pool<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("active", &self.as_slice())
            .finish()
    }
}
