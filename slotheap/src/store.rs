//! Caller-owned node storage.
//!
//! The queue resolves keys through a [`NodeStore`] on every call. The store
//! owns the nodes; the queue only reads and writes their queue fields.
//!
//! # Implementations
//!
//! - `Vec<N>` - keyed by position (`usize`)
//! - `HashMap<K, N>` - keyed by any [`Key`] that is also `Hash`
//! - `slab::Slab<N>` - keyed by slab index (feature `slab`)

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use crate::Key;

/// Lookup from a stable key to a caller-owned node.
///
/// # Requirements
///
/// - **Stable keys**: a key resolves to the same node for as long as that
///   node is queued.
/// - **O(1)** lookups; the queue resolves keys on every repair step.
///
/// A queued node must stay in the store until it is dequeued, removed or
/// the queue is cleared. Dropping it earlier is a contract violation and the
/// next repair step that reaches it panics.
pub trait NodeStore<N> {
    /// Key type for this store.
    type Key: Key;

    /// Returns a reference to the node at `key`, if present.
    fn node(&self, key: Self::Key) -> Option<&N>;

    /// Returns a mutable reference to the node at `key`, if present.
    fn node_mut(&mut self, key: Self::Key) -> Option<&mut N>;
}

impl<N> NodeStore<N> for Vec<N> {
    type Key = usize;

    #[inline]
    fn node(&self, key: usize) -> Option<&N> {
        self.get(key)
    }

    #[inline]
    fn node_mut(&mut self, key: usize) -> Option<&mut N> {
        self.get_mut(key)
    }
}

impl<K, N, H> NodeStore<N> for HashMap<K, N, H>
where
    K: Key + Hash,
    H: BuildHasher,
{
    type Key = K;

    #[inline]
    fn node(&self, key: K) -> Option<&N> {
        self.get(&key)
    }

    #[inline]
    fn node_mut(&mut self, key: K) -> Option<&mut N> {
        self.get_mut(&key)
    }
}

#[cfg(feature = "slab")]
impl<N> NodeStore<N> for slab::Slab<N> {
    type Key = usize;

    #[inline]
    fn node(&self, key: usize) -> Option<&N> {
        self.get(key)
    }

    #[inline]
    fn node_mut(&mut self, key: usize) -> Option<&mut N> {
        self.get_mut(key)
    }
}
