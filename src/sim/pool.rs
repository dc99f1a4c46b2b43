//! Index-based object pool for short-lived entities
//!
//! Slots are allocated once up front and recycled through a free-index
//! stack, so firing and exploding never churn the allocator. When every slot
//! is live the pool grows by one freshly constructed slot rather than
//! refusing the request.

use serde::{Deserialize, Serialize};

/// Handle to a live pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolHandle(pub usize);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    value: T,
    live: bool,
}

/// Fixed-capacity pool with a free-index stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    /// Indices of dead slots; popped on acquire, pushed on release
    free: Vec<usize>,
    capacity: usize,
}

impl<T: Default> Pool<T> {
    /// Create a pool with `capacity` pre-built slots
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                value: T::default(),
                live: false,
            })
            .collect();
        // Reverse so the lowest index is handed out first
        let free = (0..capacity).rev().collect();
        Self {
            slots,
            free,
            capacity,
        }
    }

    /// Take a slot and reset it in place with `init`
    pub fn acquire(&mut self, init: impl FnOnce(&mut T)) -> PoolHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                log::debug!(
                    "pool exhausted at {} slots, growing past capacity {}",
                    self.slots.len(),
                    self.capacity
                );
                self.slots.push(Slot {
                    value: T::default(),
                    live: false,
                });
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[index];
        init(&mut slot.value);
        slot.live = true;
        PoolHandle(index)
    }

    /// Return a slot to the free stack. Returns false for stale handles.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        match self.slots.get_mut(handle.0) {
            Some(slot) if slot.live => {
                slot.live = false;
                self.free.push(handle.0);
                true
            }
            _ => false,
        }
    }

    /// Release every live slot
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            self.release(PoolHandle(index));
        }
    }
}

impl<T> Pool<T> {
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots
            .get(handle.0)
            .filter(|slot| slot.live)
            .map(|slot| &slot.value)
    }

    /// Number of live entities
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Slots currently allocated (may exceed the configured capacity)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Live entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.live)
            .map(|(index, slot)| (PoolHandle(index), &slot.value))
    }

    /// Run `update` on every live entity and release the ones it rejects
    pub fn update_retain(&mut self, mut update: impl FnMut(&mut T) -> bool) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.live && !update(&mut slot.value) {
                slot.live = false;
                self.free.push(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Counter {
        value: u32,
    }

    #[test]
    fn test_acquire_reuses_released_slot() {
        let mut pool: Pool<Counter> = Pool::with_capacity(2);
        let a = pool.acquire(|c| c.value = 1);
        let _b = pool.acquire(|c| c.value = 2);
        assert_eq!(pool.live_count(), 2);

        assert!(pool.release(a));
        assert_eq!(pool.live_count(), 1);

        let c = pool.acquire(|c| c.value = 3);
        assert_eq!(c, a, "freed index should be handed out again");
        assert_eq!(pool.get(c), Some(&Counter { value: 3 }));
        assert_eq!(pool.slot_count(), 2);
    }

    #[test]
    fn test_grows_when_exhausted() {
        let mut pool: Pool<Counter> = Pool::with_capacity(1);
        pool.acquire(|c| c.value = 1);
        let extra = pool.acquire(|c| c.value = 2);
        assert_eq!(extra, PoolHandle(1));
        assert_eq!(pool.slot_count(), 2);
        assert_eq!(pool.capacity(), 1);
        assert_eq!(pool.live_count(), 2);
    }

    #[test]
    fn test_double_release_is_rejected() {
        let mut pool: Pool<Counter> = Pool::with_capacity(1);
        let a = pool.acquire(|_| {});
        assert!(pool.release(a));
        assert!(!pool.release(a));
        assert_eq!(pool.live_count(), 0);
        assert!(pool.get(a).is_none());
    }

    #[test]
    fn test_update_retain_releases_rejected() {
        let mut pool: Pool<Counter> = Pool::with_capacity(4);
        for i in 0..4 {
            pool.acquire(|c| c.value = i);
        }
        pool.update_retain(|c| {
            c.value += 10;
            c.value % 2 == 0
        });
        let values: Vec<u32> = pool.iter().map(|(_, c)| c.value).collect();
        assert_eq!(values, vec![10, 12]);
        assert_eq!(pool.live_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut pool: Pool<Counter> = Pool::with_capacity(3);
        pool.acquire(|_| {});
        pool.acquire(|_| {});
        pool.clear();
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.iter().count(), 0);
    }
}
