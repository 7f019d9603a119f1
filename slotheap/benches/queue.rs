//! Benchmarks for the indexed priority queue.
//!
//! Compares against `std::collections::BinaryHeap` for push/pop, and measures
//! the operations BinaryHeap cannot do (remove from middle, update in place).
//!
//! Run with: cargo bench -p slotheap

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use slotheap::{PriorityNode, PriorityQueue};

const SIZES: [usize; 3] = [64, 1024, 16_384];

fn scrambled(i: usize, n: usize) -> u64 {
    ((i * 7919 + 13) % n) as u64
}

fn store(n: usize) -> Vec<PriorityNode<(), u64>> {
    (0..n).map(|_| PriorityNode::new(())).collect()
}

// ============================================================================
// Push / pop
// ============================================================================

fn bench_fill_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_drain");

    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("slotheap", n), &n, |b, &n| {
            let mut nodes = store(n);
            let mut queue: PriorityQueue<usize> = PriorityQueue::with_capacity(n);
            b.iter(|| {
                for key in 0..n {
                    queue.enqueue(&mut nodes, key, scrambled(key, n)).unwrap();
                }
                while let Ok(key) = queue.dequeue(&mut nodes) {
                    black_box(key);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("std_binary_heap", n), &n, |b, &n| {
            let mut heap = BinaryHeap::with_capacity(n);
            b.iter(|| {
                for key in 0..n {
                    heap.push(Reverse((scrambled(key, n), key)));
                }
                while let Some(entry) = heap.pop() {
                    black_box(entry);
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Steady state: pop one, push one
// ============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    for n in SIZES {
        group.bench_with_input(BenchmarkId::new("slotheap", n), &n, |b, &n| {
            let mut nodes = store(n);
            let mut queue: PriorityQueue<usize> = PriorityQueue::with_capacity(n);
            for key in 0..n {
                queue.enqueue(&mut nodes, key, scrambled(key, n)).unwrap();
            }
            let mut tick = n as u64;
            b.iter(|| {
                let key = queue.dequeue(&mut nodes).unwrap();
                tick += 1;
                queue.enqueue(&mut nodes, key, tick % n as u64).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("std_binary_heap", n), &n, |b, &n| {
            let mut heap = BinaryHeap::with_capacity(n);
            for key in 0..n {
                heap.push(Reverse((scrambled(key, n), key)));
            }
            let mut tick = n as u64;
            b.iter(|| {
                let Reverse((_, key)) = heap.pop().unwrap();
                tick += 1;
                heap.push(Reverse((tick % n as u64, key)));
            });
        });
    }

    group.finish();
}

// ============================================================================
// Indexed operations
// ============================================================================

fn bench_indexed(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed");

    for n in SIZES {
        group.bench_with_input(BenchmarkId::new("remove_reinsert", n), &n, |b, &n| {
            let mut nodes = store(n);
            let mut queue: PriorityQueue<usize> = PriorityQueue::with_capacity(n);
            for key in 0..n {
                queue.enqueue(&mut nodes, key, scrambled(key, n)).unwrap();
            }
            let mut i = 0;
            b.iter(|| {
                let key = scrambled(i, n) as usize;
                i += 1;
                queue.remove(&mut nodes, key).unwrap();
                queue.enqueue(&mut nodes, key, scrambled(i, n)).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("update_priority", n), &n, |b, &n| {
            let mut nodes = store(n);
            let mut queue: PriorityQueue<usize> = PriorityQueue::with_capacity(n);
            for key in 0..n {
                queue.enqueue(&mut nodes, key, scrambled(key, n)).unwrap();
            }
            let mut i = 0;
            b.iter(|| {
                let key = scrambled(i, n) as usize;
                i += 1;
                queue
                    .update_priority(&mut nodes, key, scrambled(i * 3, n))
                    .unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("contains", n), &n, |b, &n| {
            let mut nodes = store(n);
            let mut queue: PriorityQueue<usize> = PriorityQueue::with_capacity(n);
            for key in (0..n).step_by(2) {
                queue.enqueue(&mut nodes, key, scrambled(key, n)).unwrap();
            }
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % n;
                black_box(queue.contains(&nodes, i))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fill_drain, bench_churn, bench_indexed);
criterion_main!(benches);
