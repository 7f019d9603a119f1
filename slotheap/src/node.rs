//! The node capability and the ordering relation.
//!
//! Any caller type that can hold a priority, an insertion sequence and a slot
//! index can live in a [`PriorityQueue`](crate::PriorityQueue). The queue
//! writes those three fields; everything else on the node is the caller's.

use core::sync::atomic::{AtomicU64, Ordering};

/// Slot index of a node that is not in any queue.
///
/// Slot 0 of the heap array is reserved, so this never names a real slot.
pub const DETACHED: usize = 0;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Draws the next insertion sequence from the process-wide counter.
#[inline]
pub(crate) fn next_sequence() -> u64 {
    NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Trait for types that can be queued.
///
/// Implementors embed the three fields the queue manages. Only the queue
/// should call the setters while the node is a member.
///
/// # Example
///
/// ```
/// use slotheap::QueueNode;
///
/// struct Timer {
///     fire_at: u64,
///     seq: u64,
///     slot: usize,
/// }
///
/// impl QueueNode for Timer {
///     type Priority = u64;
///
///     fn priority(&self) -> u64 { self.fire_at }
///     fn set_priority(&mut self, priority: u64) { self.fire_at = priority; }
///     fn insertion_sequence(&self) -> u64 { self.seq }
///     fn set_insertion_sequence(&mut self, seq: u64) { self.seq = seq; }
///     fn queue_index(&self) -> usize { self.slot }
///     fn set_queue_index(&mut self, slot: usize) { self.slot = slot; }
/// }
/// ```
pub trait QueueNode {
    /// Priority key. Lower values are dequeued first.
    type Priority: Ord + Copy;

    /// Returns the current priority.
    fn priority(&self) -> Self::Priority;

    /// Sets the priority.
    fn set_priority(&mut self, priority: Self::Priority);

    /// Returns the sequence assigned at the last enqueue.
    fn insertion_sequence(&self) -> u64;

    /// Sets the insertion sequence.
    fn set_insertion_sequence(&mut self, sequence: u64);

    /// Returns the 1-based heap slot, or [`DETACHED`].
    fn queue_index(&self) -> usize;

    /// Sets the heap slot.
    fn set_queue_index(&mut self, index: usize);

    /// Returns this node's position in the queue ordering.
    #[inline]
    fn rank(&self) -> Rank<Self::Priority> {
        Rank {
            priority: self.priority(),
            sequence: self.insertion_sequence(),
        }
    }
}

/// Sort key of a queued node: priority first, then insertion sequence.
///
/// Field order matters: the derived `Ord` compares `priority` and falls back
/// to `sequence`, so a smaller `Rank` is dequeued first. Sequences are unique,
/// which makes the order total over queue members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank<P> {
    /// Caller-assigned priority.
    pub priority: P,
    /// Insertion sequence.
    pub sequence: u64,
}

/// A ready-made queue node carrying a payload.
///
/// ```
/// use slotheap::{PriorityNode, PriorityQueue};
///
/// let mut store = vec![PriorityNode::new("idle"), PriorityNode::new("urgent")];
/// let mut queue: PriorityQueue<usize> = PriorityQueue::with_capacity(4);
///
/// queue.enqueue(&mut store, 0, 10u32).unwrap();
/// queue.enqueue(&mut store, 1, 1u32).unwrap();
///
/// let key = queue.dequeue(&mut store).unwrap();
/// assert_eq!(*store[key].value(), "urgent");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityNode<T, P = i64> {
    value: T,
    priority: P,
    sequence: u64,
    slot: usize,
}

impl<T, P: Default> PriorityNode<T, P> {
    /// Creates a detached node with a default priority.
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            value,
            priority: P::default(),
            sequence: 0,
            slot: DETACHED,
        }
    }
}

impl<T, P> PriorityNode<T, P> {
    /// Returns a reference to the payload.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns a mutable reference to the payload.
    #[inline]
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Consumes the node and returns its payload.
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T, P: Ord + Copy> QueueNode for PriorityNode<T, P> {
    type Priority = P;

    #[inline]
    fn priority(&self) -> P {
        self.priority
    }

    #[inline]
    fn set_priority(&mut self, priority: P) {
        self.priority = priority;
    }

    #[inline]
    fn insertion_sequence(&self) -> u64 {
        self.sequence
    }

    #[inline]
    fn set_insertion_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    #[inline]
    fn queue_index(&self) -> usize {
        self.slot
    }

    #[inline]
    fn set_queue_index(&mut self, index: usize) {
        self.slot = index;
    }
}
