use crate::core::{ActorId, JointId};
use crate::error::PhysicsError;
use crate::Result;
use std::collections::HashMap;

/// Generic storage trait for world-owned objects
pub trait Storage<T, H> {
    /// Creates a new empty storage
    fn new() -> Self;

    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    /// Gets a reference to an item by its handle
    fn get(&self, handle: H) -> Option<&T>;

    /// Gets a mutable reference to an item by its handle
    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    /// Removes an item from the storage
    fn remove(&mut self, handle: H) -> Option<T>;

    /// Returns the number of items in the storage
    fn len(&self) -> usize;

    /// Returns whether the storage is empty
    fn is_empty(&self) -> bool;

    /// Returns all handles currently in the storage
    fn handles(&self) -> Vec<H>;
}

/// Storage for tracked bodies, keyed by stable actor ids
pub struct TrackedStorage<T> {
    items: HashMap<ActorId, T>,
    next_id: u32,
}

impl<T> Storage<T, ActorId> for TrackedStorage<T> {
    fn new() -> Self {
        Self {
            items: HashMap::new(),
            next_id: 1, // Start at 1, so 0 can represent invalid handle
        }
    }

    fn add(&mut self, item: T) -> ActorId {
        let handle = ActorId(self.next_id);
        self.next_id += 1;
        self.items.insert(handle, item);
        handle
    }

    fn get(&self, handle: ActorId) -> Option<&T> {
        self.items.get(&handle)
    }

    fn get_mut(&mut self, handle: ActorId) -> Option<&mut T> {
        self.items.get_mut(&handle)
    }

    fn remove(&mut self, handle: ActorId) -> Option<T> {
        self.items.remove(&handle)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn handles(&self) -> Vec<ActorId> {
        self.items.keys().copied().collect()
    }
}

impl<T> TrackedStorage<T> {
    /// Gets a tracked body by actor id, reporting an unattached actor
    pub fn get_tracked(&self, handle: ActorId) -> Result<&T> {
        self.get(handle).ok_or(PhysicsError::NotAttached(handle))
    }

    /// Gets a mutable tracked body by actor id, reporting an unattached actor
    pub fn get_tracked_mut(&mut self, handle: ActorId) -> Result<&mut T> {
        self.get_mut(handle).ok_or(PhysicsError::NotAttached(handle))
    }
}

/// Storage for joints, keyed by stable joint ids.
///
/// Lookups deliberately stay `Option`-based: a missing joint is the
/// idempotent-destroy case, not an error.
pub struct JointStorage<T> {
    items: HashMap<JointId, T>,
    next_id: u32,
}

impl<T> Storage<T, JointId> for JointStorage<T> {
    fn new() -> Self {
        Self {
            items: HashMap::new(),
            next_id: 1,
        }
    }

    fn add(&mut self, item: T) -> JointId {
        let handle = JointId(self.next_id);
        self.next_id += 1;
        self.items.insert(handle, item);
        handle
    }

    fn get(&self, handle: JointId) -> Option<&T> {
        self.items.get(&handle)
    }

    fn get_mut(&mut self, handle: JointId) -> Option<&mut T> {
        self.items.get_mut(&handle)
    }

    fn remove(&mut self, handle: JointId) -> Option<T> {
        self.items.remove(&handle)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn handles(&self) -> Vec<JointId> {
        self.items.keys().copied().collect()
    }
}
