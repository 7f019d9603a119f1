//! Randomized operation sequences checked against a `BTreeMap` model.
//!
//! The model keys on `(priority, enqueue order)`, so its first entry is the
//! node the queue must dequeue next.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slotheap::{PriorityNode, PriorityQueue, QueueError, QueueNode};

const NODES: usize = 256;
const STEPS: usize = 20_000;

type Store = Vec<PriorityNode<usize, u16>>;

struct Model {
    /// (priority, order) -> key
    ranks: BTreeMap<(u16, u64), usize>,
    /// key -> (priority, order) while queued
    members: Vec<Option<(u16, u64)>>,
    next_order: u64,
}

impl Model {
    fn new() -> Self {
        Self {
            ranks: BTreeMap::new(),
            members: vec![None; NODES],
            next_order: 0,
        }
    }

    fn enqueue(&mut self, key: usize, priority: u16) {
        let rank = (priority, self.next_order);
        self.next_order += 1;
        self.ranks.insert(rank, key);
        self.members[key] = Some(rank);
    }

    fn remove(&mut self, key: usize) {
        let rank = self.members[key].take().unwrap();
        self.ranks.remove(&rank);
    }

    fn update(&mut self, key: usize, priority: u16) {
        let (_, order) = self.members[key].unwrap();
        self.remove(key);
        self.ranks.insert((priority, order), key);
        self.members[key] = Some((priority, order));
    }

    fn head(&self) -> Option<usize> {
        self.ranks.values().next().copied()
    }
}

fn check(queue: &PriorityQueue<usize>, store: &Store, model: &Model) {
    assert!(queue.is_valid(store), "heap invariant broken");
    assert_eq!(queue.len(), model.ranks.len());
    for key in 0..NODES {
        assert_eq!(
            queue.contains(store, key),
            model.members[key].is_some(),
            "membership of {key}"
        );
    }
}

fn run(seed: u64, initial_capacity: usize) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut store: Store = (0..NODES).map(PriorityNode::new).collect();
    let mut queue: PriorityQueue<usize> = PriorityQueue::with_capacity(initial_capacity);
    let mut model = Model::new();

    for step in 0..STEPS {
        let key = rng.gen_range(0..NODES);
        // Narrow priority range so ties are common
        let priority = rng.gen_range(0..32u16);

        match rng.gen_range(0..100) {
            0..=39 => {
                let result = queue.enqueue(&mut store, key, priority);
                if model.members[key].is_some() {
                    assert_eq!(result, Err(QueueError::AlreadyMember));
                } else {
                    assert_eq!(result, Ok(()));
                    model.enqueue(key, priority);
                }
            }
            40..=64 => {
                let result = queue.dequeue(&mut store);
                match model.head() {
                    Some(expected) => {
                        assert_eq!(result, Ok(expected));
                        model.remove(expected);
                    }
                    None => assert_eq!(result, Err(QueueError::EmptyQueue)),
                }
            }
            65..=79 => {
                let result = queue.remove(&mut store, key);
                if model.members[key].is_some() {
                    assert_eq!(result, Ok(()));
                    model.remove(key);
                } else {
                    assert_eq!(result, Err(QueueError::NotMember));
                }
            }
            80..=94 => {
                let result = queue.update_priority(&mut store, key, priority);
                if model.members[key].is_some() {
                    assert_eq!(result, Ok(()));
                    model.update(key, priority);
                } else {
                    assert_eq!(result, Err(QueueError::NotMember));
                }
            }
            95..=98 => {
                let target = queue.len() + rng.gen_range(0..8);
                if target == 0 {
                    assert!(queue.resize(target).is_err());
                } else {
                    queue.resize(target).unwrap();
                    assert_eq!(queue.capacity(), target);
                }
            }
            _ => {
                if step % 7 == 0 {
                    queue.clear(&mut store);
                    model = Model::new();
                }
            }
        }

        match model.head() {
            Some(expected) => assert_eq!(queue.peek(), Ok(expected)),
            None => assert_eq!(queue.peek(), Err(QueueError::EmptyQueue)),
        }
        if step % 64 == 0 {
            check(&queue, &store, &model);
        }
    }

    check(&queue, &store, &model);

    // Drain the rest; priorities must come out non-decreasing
    let mut last = 0;
    while let Ok(key) = queue.dequeue(&mut store) {
        let priority = store[key].priority();
        assert!(priority >= last, "heap order violated");
        last = priority;
    }
    assert!(store.iter().all(|node| !queue.contains(&store, *node.value())));
}

#[test]
fn random_ops_match_model() {
    for seed in 0..8 {
        run(seed, 16);
    }
}

#[test]
fn random_ops_from_minimum_capacity() {
    run(0xdead_beef, 1);
}

#[test]
fn iteration_visits_every_member_once() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut store: Store = (0..NODES).map(PriorityNode::new).collect();
    let mut queue: PriorityQueue<usize> = PriorityQueue::with_capacity(4);

    for key in 0..NODES {
        if rng.gen_bool(0.6) {
            queue.enqueue(&mut store, key, rng.gen_range(0..100)).unwrap();
        }
    }

    let mut seen = vec![false; NODES];
    let mut cursor = queue.cursor();
    while let Some(key) = cursor.advance(&queue).unwrap() {
        assert!(!seen[key], "visited {key} twice");
        seen[key] = true;
    }

    for key in 0..NODES {
        assert_eq!(seen[key], queue.contains(&store, key));
    }
    assert_eq!(queue.iter().count(), queue.len());
}
