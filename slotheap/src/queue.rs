//! Indexed min-heap over caller-owned nodes.
//!
//! Nodes embed their own heap slot, giving O(1) membership tests and
//! O(log n) removal from the middle and re-prioritization in place.
//! Equal priorities dequeue in the order they were enqueued.

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::slice;

use crate::node::{DETACHED, next_sequence};
use crate::{Key, NodeStore, QueueError, QueueNode, Rank};

/// Capacity used by [`PriorityQueue::new`].
pub const DEFAULT_CAPACITY: usize = 16;

const DANGLING: &str = "queued node missing from store";

/// A binary min-heap of node keys.
///
/// Nodes live in a caller-owned [`NodeStore`]; the queue keeps their keys in
/// a 1-indexed array and writes each member's priority, insertion sequence
/// and slot index. Every method that touches nodes takes the store, and all
/// calls on one queue must use the same store.
///
/// # Example
///
/// ```
/// use slotheap::{PriorityNode, PriorityQueue, QueueError};
///
/// let mut store: Vec<PriorityNode<&str, u32>> = vec![
///     PriorityNode::new("a"),
///     PriorityNode::new("b"),
///     PriorityNode::new("c"),
/// ];
/// let mut queue: PriorityQueue<usize> = PriorityQueue::with_capacity(4);
///
/// queue.enqueue(&mut store, 0, 5).unwrap();
/// queue.enqueue(&mut store, 1, 3).unwrap();
/// queue.enqueue(&mut store, 2, 3).unwrap();
///
/// // Lowest priority first, ties in enqueue order
/// assert_eq!(queue.dequeue(&mut store), Ok(1));
/// assert_eq!(queue.dequeue(&mut store), Ok(2));
/// assert_eq!(queue.dequeue(&mut store), Ok(0));
/// assert_eq!(queue.dequeue(&mut store), Err(QueueError::EmptyQueue));
/// ```
#[derive(Debug, Clone)]
pub struct PriorityQueue<K: Key> {
    /// Heap-ordered keys. Slot 0 and every slot past `len` hold `K::NONE`.
    slots: Vec<K>,
    len: usize,
    /// Bumped by every mutation; checked by [`Cursor`].
    generation: u64,
}

impl<K: Key> Default for PriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> PriorityQueue<K> {
    /// Creates an empty queue with [`DEFAULT_CAPACITY`].
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty queue that holds `capacity` nodes before growing.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![K::NONE; capacity + 1],
            len: 0,
            generation: 0,
        }
    }

    /// Returns the number of queued nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no nodes are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns how many nodes fit before the next growth.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the key of the head node without removing it.
    ///
    /// # Errors
    ///
    /// [`QueueError::EmptyQueue`] if no nodes are queued.
    #[inline]
    pub fn peek(&self) -> Result<K, QueueError> {
        if self.len == 0 {
            return Err(QueueError::EmptyQueue);
        }
        Ok(self.slots[1])
    }

    /// Returns the head node without removing it.
    ///
    /// # Errors
    ///
    /// [`QueueError::EmptyQueue`] if no nodes are queued, or
    /// [`QueueError::MissingNode`] if the head was dropped from the store.
    pub fn first<'s, N, S>(&self, store: &'s S) -> Result<&'s N, QueueError>
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let key = self.peek()?;
        store.node(key).ok_or(QueueError::MissingNode)
    }

    /// Returns `true` if `key` is a member of this queue.
    ///
    /// O(1): checks that the node's slot index is in range and that the slot
    /// holds `key`. A node queued in a different queue is not a member.
    #[inline]
    pub fn contains<N, S>(&self, store: &S, key: K) -> bool
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        store
            .node(key)
            .is_some_and(|node| self.holds(node.queue_index(), key))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Queues the node at `key` with `priority`.
    ///
    /// Assigns the next insertion sequence, so among equal priorities this
    /// node dequeues after every node already queued. Grows the backing array
    /// to `capacity * 2 + 1` when full.
    ///
    /// # Errors
    ///
    /// - [`QueueError::MissingNode`] if `key` is not in the store.
    /// - [`QueueError::AlreadyMember`] if the node is already queued here.
    pub fn enqueue<N, S>(
        &mut self,
        store: &mut S,
        key: K,
        priority: N::Priority,
    ) -> Result<(), QueueError>
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let node = store.node_mut(key).ok_or(QueueError::MissingNode)?;
        if self.holds(node.queue_index(), key) {
            return Err(QueueError::AlreadyMember);
        }

        if self.len == self.capacity() {
            self.grow();
        }

        self.len += 1;
        let slot = self.len;
        self.slots[slot] = key;
        node.set_priority(priority);
        node.set_insertion_sequence(next_sequence());
        node.set_queue_index(slot);
        self.touch();

        self.cascade_up::<N, S>(store, slot);
        Ok(())
    }

    /// Removes the head node and returns its key.
    ///
    /// The node's slot index is reset to [`DETACHED`](crate::DETACHED).
    ///
    /// # Errors
    ///
    /// [`QueueError::EmptyQueue`] if no nodes are queued.
    pub fn dequeue<N, S>(&mut self, store: &mut S) -> Result<K, QueueError>
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let key = self.peek()?;
        self.remove_at::<N, S>(store, 1);
        Ok(key)
    }

    /// Removes the node at `key` from anywhere in the queue.
    ///
    /// # Errors
    ///
    /// [`QueueError::NotMember`] if the node is not queued here.
    pub fn remove<N, S>(&mut self, store: &mut S, key: K) -> Result<(), QueueError>
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let slot = self.slot_of::<N, S>(store, key)?;
        self.remove_at::<N, S>(store, slot);
        Ok(())
    }

    /// Changes the priority of a queued node and restores heap order.
    ///
    /// The insertion sequence is kept, so the node keeps its place among
    /// other nodes of the new priority that were enqueued after it.
    ///
    /// # Errors
    ///
    /// [`QueueError::NotMember`] if the node is not queued here.
    pub fn update_priority<N, S>(
        &mut self,
        store: &mut S,
        key: K,
        priority: N::Priority,
    ) -> Result<(), QueueError>
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let node = store.node_mut(key).ok_or(QueueError::NotMember)?;
        let slot = node.queue_index();
        if !self.holds(slot, key) {
            return Err(QueueError::NotMember);
        }

        node.set_priority(priority);
        self.touch();
        self.reclassify::<N, S>(store, slot);
        Ok(())
    }

    /// Reallocates the backing array to hold exactly `capacity` nodes.
    ///
    /// Members keep their slots. The queue never shrinks on its own; this is
    /// the only way to give memory back.
    ///
    /// # Errors
    ///
    /// [`QueueError::InvalidCapacity`] if `capacity` is 0 or below
    /// [`len`](Self::len).
    pub fn resize(&mut self, capacity: usize) -> Result<(), QueueError> {
        if capacity == 0 || capacity < self.len {
            return Err(QueueError::InvalidCapacity {
                requested: capacity,
                count: self.len,
            });
        }

        debug_event!(
            from = self.capacity(),
            to = capacity,
            len = self.len,
            "resizing priority queue"
        );
        self.reallocate(capacity);
        self.touch();
        Ok(())
    }

    /// Removes every node, resetting each one's slot index.
    ///
    /// Keys that no longer resolve in the store are skipped. Capacity is
    /// unchanged.
    pub fn clear<N, S>(&mut self, store: &mut S)
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        trace_event!(detached = self.len, "clearing priority queue");

        for slot in &mut self.slots[1..=self.len] {
            let key = mem::replace(slot, K::NONE);
            if let Some(node) = store.node_mut(key) {
                node.set_queue_index(DETACHED);
            }
        }
        self.len = 0;
        self.touch();
    }

    /// Dequeues nodes while `pred` accepts the current head.
    ///
    /// Yields keys in priority order. Stops at the first head the predicate
    /// rejects, leaving it queued.
    ///
    /// # Example
    ///
    /// ```
    /// use slotheap::{PriorityNode, PriorityQueue, QueueNode};
    ///
    /// let mut store: Vec<PriorityNode<(), u64>> =
    ///     (0..4).map(|_| PriorityNode::new(())).collect();
    /// let mut timers: PriorityQueue<usize> = PriorityQueue::new();
    /// for (key, deadline) in [(0, 30), (1, 10), (2, 50), (3, 20)] {
    ///     timers.enqueue(&mut store, key, deadline).unwrap();
    /// }
    ///
    /// // Fire everything due at t = 25
    /// let fired: Vec<_> = timers
    ///     .drain_while(&mut store, |t| t.priority() <= 25)
    ///     .collect();
    /// assert_eq!(fired, vec![1, 3]);
    /// assert_eq!(timers.len(), 2);
    /// ```
    pub fn drain_while<'a, N, S, F>(
        &'a mut self,
        store: &'a mut S,
        pred: F,
    ) -> DrainWhile<'a, K, N, S, F>
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
        F: FnMut(&N) -> bool,
    {
        DrainWhile {
            queue: self,
            store,
            pred,
            _node: PhantomData,
        }
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over member keys in heap-array order.
    ///
    /// This is not priority order. The borrow prevents mutation while the
    /// iterator is alive; use [`cursor`](Self::cursor) to walk without
    /// holding a borrow.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.slots[1..=self.len].iter(),
        }
    }

    /// Returns a detached cursor positioned at the first slot.
    ///
    /// The cursor records the queue's generation and fails on the first step
    /// after any mutation.
    #[inline]
    pub fn cursor(&self) -> Cursor {
        Cursor {
            generation: self.generation,
            next: 1,
        }
    }

    /// Checks heap order and back-pointers for every member.
    ///
    /// O(n). Intended for tests and debug assertions.
    pub fn is_valid<N, S>(&self, store: &S) -> bool
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        if self.slots[0].is_some() || self.slots[self.len + 1..].iter().any(Key::is_some) {
            return false;
        }

        for slot in 1..=self.len {
            let Some(node) = store.node(self.slots[slot]) else {
                return false;
            };
            if node.queue_index() != slot {
                return false;
            }
            if slot > 1 {
                let Some(parent) = store.node(self.slots[slot / 2]) else {
                    return false;
                };
                if node.rank() < parent.rank() {
                    return false;
                }
            }
        }
        true
    }

    // ========================================================================
    // Heap repair
    // ========================================================================

    #[inline]
    fn holds(&self, slot: usize, key: K) -> bool {
        slot != DETACHED && slot <= self.len && self.slots[slot] == key
    }

    fn slot_of<N, S>(&self, store: &S, key: K) -> Result<usize, QueueError>
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let slot = store
            .node(key)
            .ok_or(QueueError::NotMember)?
            .queue_index();
        if !self.holds(slot, key) {
            return Err(QueueError::NotMember);
        }
        Ok(slot)
    }

    #[inline]
    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn grow(&mut self) {
        let capacity = self.capacity() * 2 + 1;
        debug_event!(
            from = self.capacity(),
            to = capacity,
            "priority queue full, growing"
        );
        self.reallocate(capacity);
    }

    fn reallocate(&mut self, capacity: usize) {
        let mut slots = Vec::with_capacity(capacity + 1);
        slots.extend_from_slice(&self.slots[..=self.len]);
        slots.resize(capacity + 1, K::NONE);
        self.slots = slots;
    }

    /// Takes the node at `slot` out of the heap and detaches it.
    fn remove_at<N, S>(&mut self, store: &mut S, slot: usize)
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let key = self.slots[slot];
        let last = self.len;

        if slot != last {
            self.swap::<N, S>(store, slot, last);
        }
        self.slots[last] = K::NONE;
        self.len -= 1;
        node_mut::<N, S>(store, key).set_queue_index(DETACHED);
        self.touch();

        if slot != last {
            self.reclassify::<N, S>(store, slot);
        }
    }

    /// Moves the node at `slot` up or down after its rank or position changed.
    ///
    /// The root has no parent and always takes the downward path.
    fn reclassify<N, S>(&mut self, store: &mut S, slot: usize)
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let parent = slot / 2;
        if parent >= 1
            && rank::<N, S>(store, self.slots[slot]) < rank::<N, S>(store, self.slots[parent])
        {
            self.cascade_up::<N, S>(store, slot);
        } else {
            self.cascade_down::<N, S>(store, slot);
        }
    }

    fn swap<N, S>(&mut self, store: &mut S, a: usize, b: usize)
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        self.slots.swap(a, b);
        node_mut::<N, S>(store, self.slots[a]).set_queue_index(a);
        node_mut::<N, S>(store, self.slots[b]).set_queue_index(b);
    }

    /// Writes `key` into `slot` and points the node back at it.
    #[inline]
    fn place<N, S>(&mut self, store: &mut S, slot: usize, key: K)
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        self.slots[slot] = key;
        node_mut::<N, S>(store, key).set_queue_index(slot);
    }

    fn cascade_up<N, S>(&mut self, store: &mut S, slot: usize)
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let key = self.slots[slot];
        let moving = rank::<N, S>(store, key);
        let mut hole = slot;

        while hole > 1 {
            let parent = hole / 2;
            let parent_key = self.slots[parent];
            if moving > rank::<N, S>(store, parent_key) {
                break;
            }
            self.place::<N, S>(store, hole, parent_key);
            hole = parent;
        }

        if hole != slot {
            self.place::<N, S>(store, hole, key);
        }
    }

    fn cascade_down<N, S>(&mut self, store: &mut S, slot: usize)
    where
        N: QueueNode,
        S: NodeStore<N, Key = K> + ?Sized,
    {
        let key = self.slots[slot];
        let moving = rank::<N, S>(store, key);
        let mut hole = slot;

        loop {
            let left = 2 * hole;
            if left > self.len {
                break;
            }

            let mut best = left;
            let mut best_rank = rank::<N, S>(store, self.slots[left]);
            let right = left + 1;
            if right <= self.len {
                let right_rank = rank::<N, S>(store, self.slots[right]);
                if right_rank < best_rank {
                    best = right;
                    best_rank = right_rank;
                }
            }

            if best_rank > moving {
                break;
            }
            self.place::<N, S>(store, hole, self.slots[best]);
            hole = best;
        }

        if hole != slot {
            self.place::<N, S>(store, hole, key);
        }
    }
}

#[inline]
fn rank<N, S>(store: &S, key: S::Key) -> Rank<N::Priority>
where
    N: QueueNode,
    S: NodeStore<N> + ?Sized,
{
    store.node(key).expect(DANGLING).rank()
}

#[inline]
fn node_mut<N, S>(store: &mut S, key: S::Key) -> &mut N
where
    S: NodeStore<N> + ?Sized,
{
    store.node_mut(key).expect(DANGLING)
}

impl<'a, K: Key> IntoIterator for &'a PriorityQueue<K> {
    type Item = K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over member keys in heap-array order.
///
/// Created by [`PriorityQueue::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, K> {
    inner: slice::Iter<'a, K>,
}

impl<K: Copy> Iterator for Iter<'_, K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.inner.next().copied()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Copy> ExactSizeIterator for Iter<'_, K> {}

impl<K: Copy> FusedIterator for Iter<'_, K> {}

/// A restartable walk over member keys that holds no borrow.
///
/// Each step checks that the queue has not been mutated since the cursor
/// was created or restarted. A cursor must only be stepped against the queue
/// that created it.
///
/// # Example
///
/// ```
/// use slotheap::{PriorityNode, PriorityQueue, QueueError};
///
/// let mut store: Vec<PriorityNode<(), i32>> = (0..3).map(|_| PriorityNode::new(())).collect();
/// let mut queue: PriorityQueue<usize> = PriorityQueue::new();
/// queue.enqueue(&mut store, 0, 1).unwrap();
/// queue.enqueue(&mut store, 1, 2).unwrap();
///
/// let mut cursor = queue.cursor();
/// assert_eq!(cursor.advance(&queue), Ok(Some(0)));
///
/// queue.enqueue(&mut store, 2, 3).unwrap();
/// assert_eq!(cursor.advance(&queue), Err(QueueError::ConcurrentModification));
///
/// cursor.restart(&queue);
/// let mut seen = 0;
/// while let Some(_) = cursor.advance(&queue).unwrap() {
///     seen += 1;
/// }
/// assert_eq!(seen, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    generation: u64,
    next: usize,
}

impl Cursor {
    /// Returns the next member key, or `None` past the last member.
    ///
    /// # Errors
    ///
    /// [`QueueError::ConcurrentModification`] if the queue was mutated since
    /// this cursor started.
    pub fn advance<K: Key>(
        &mut self,
        queue: &PriorityQueue<K>,
    ) -> Result<Option<K>, QueueError> {
        if self.generation != queue.generation {
            return Err(QueueError::ConcurrentModification);
        }
        if self.next > queue.len {
            return Ok(None);
        }

        let key = queue.slots[self.next];
        self.next += 1;
        Ok(Some(key))
    }

    /// Rewinds to the first slot and adopts the queue's current generation.
    pub fn restart<K: Key>(&mut self, queue: &PriorityQueue<K>) {
        *self = queue.cursor();
    }
}

/// Draining iterator returned by [`PriorityQueue::drain_while`].
pub struct DrainWhile<'a, K: Key, N, S: ?Sized, F> {
    queue: &'a mut PriorityQueue<K>,
    store: &'a mut S,
    pred: F,
    _node: PhantomData<fn(&N)>,
}

impl<K, N, S, F> Iterator for DrainWhile<'_, K, N, S, F>
where
    K: Key,
    N: QueueNode,
    S: NodeStore<N, Key = K> + ?Sized,
    F: FnMut(&N) -> bool,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let key = self.queue.peek().ok()?;
        let head = self.store.node(key)?;
        if !(self.pred)(head) {
            return None;
        }
        self.queue.dequeue::<N, S>(&mut *self.store).ok()
    }
}

impl<K: Key + fmt::Debug, N, S: ?Sized, F> fmt::Debug for DrainWhile<'_, K, N, S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrainWhile")
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
