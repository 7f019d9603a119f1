//! Indexed binary min-heap over caller-owned nodes.
//!
//! The queue never owns its elements. Nodes live in whatever storage the
//! caller already has (a `Vec`, a `HashMap`, a slab), and embed the three
//! fields the queue manages: priority, insertion sequence and slot index.
//! The embedded slot index is what makes the hard operations cheap.
//!
//! ```text
//! NodeStore (Vec / HashMap / Slab)  - owns nodes, hands out stable keys
//! PriorityQueue                      - orders keys, writes node queue fields
//! ```
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `enqueue` | O(log n), amortized growth |
//! | `dequeue` | O(log n) |
//! | `peek` / `contains` / `len` | O(1) |
//! | `remove` (from anywhere) | O(log n) |
//! | `update_priority` | O(log n) |
//! | `resize` / `clear` | O(n) |
//!
//! # Ordering
//!
//! Lower priority values dequeue first. Equal priorities dequeue in enqueue
//! order: every enqueue draws a sequence number from a process-wide counter,
//! and `(priority, sequence)` is the only rank the heap consults.
//!
//! # Quick Start
//!
//! ```
//! use slotheap::{PriorityNode, PriorityQueue};
//!
//! let mut store: Vec<PriorityNode<&str, u32>> = ["a", "b", "c"]
//!     .into_iter()
//!     .map(PriorityNode::new)
//!     .collect();
//! let mut queue: PriorityQueue<usize> = PriorityQueue::new();
//!
//! queue.enqueue(&mut store, 0, 5).unwrap();
//! queue.enqueue(&mut store, 1, 3).unwrap();
//! queue.enqueue(&mut store, 2, 3).unwrap();
//! assert!(queue.contains(&store, 2));
//!
//! // Re-prioritize in place, remove from the middle
//! queue.update_priority(&mut store, 0, 1).unwrap();
//! queue.remove(&mut store, 1).unwrap();
//!
//! assert_eq!(queue.dequeue(&mut store), Ok(0));
//! assert_eq!(queue.dequeue(&mut store), Ok(2));
//! assert!(queue.is_empty());
//! ```
//!
//! # Critical Invariant: Same Store Instance
//!
//! All calls on one queue must pass the same store, and a queued node must
//! stay in that store until it leaves the queue. This is the caller's
//! responsibility, the same discipline as the `slab` crate. Breaking it makes
//! the next heap repair that reaches the missing node panic.
//!
//! # Threading
//!
//! Nothing here locks. Wrap the queue and its store together in one mutex,
//! or keep both on a single owning thread.
//!
//! # Feature Flags
//!
//! - `slab` - [`NodeStore`] impl for `slab::Slab`
//! - `tracing` - emit `tracing` events on capacity changes and `clear`

#![warn(missing_docs)]

macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}

macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

pub mod error;
pub mod key;
pub mod node;
pub mod queue;
pub mod store;

pub use error::QueueError;
pub use key::Key;
pub use node::{DETACHED, PriorityNode, QueueNode, Rank};
pub use queue::{Cursor, DEFAULT_CAPACITY, DrainWhile, Iter, PriorityQueue};
pub use store::NodeStore;
