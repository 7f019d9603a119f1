//! Error types for queue operations.

use thiserror::Error;

/// A precondition of a queue operation did not hold.
///
/// Every check runs before the queue or any node is touched, so the queue is
/// unchanged when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// `dequeue`, `peek` or `first` on a queue with no members.
    #[error("queue is empty")]
    EmptyQueue,

    /// `enqueue` on a node this queue already tracks.
    #[error("node is already enqueued")]
    AlreadyMember,

    /// `remove` or `update_priority` on a node this queue does not track.
    #[error("node is not enqueued")]
    NotMember,

    /// The key does not resolve to a node in the store.
    #[error("key does not resolve to a node in the store")]
    MissingNode,

    /// `resize` to zero or below the current member count.
    #[error("capacity {requested} cannot hold {count} queued nodes")]
    InvalidCapacity {
        /// Capacity that was asked for.
        requested: usize,
        /// Members at the time of the call.
        count: usize,
    },

    /// A [`Cursor`](crate::Cursor) outlived a mutation of its queue.
    #[error("queue was modified during iteration")]
    ConcurrentModification,
}
