//! Red-black tree benchmarks for rblink.
//!
//! These measure the raw linkage operations the crate exists for:
//! insertion (sequential and shuffled), erasure, and a full in-order
//! walk, with a `BTreeMap` baseline for scale.

use std::collections::BTreeMap;
use std::ptr::NonNull;

use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use rblink::{intrusive_adapter, Adapter, RbNode, RbTree, Side};

struct Entry {
    key: u64,
    link: RbNode,
}

intrusive_adapter!(EntryAdapter = Entry { link });

fn alloc_entries(bump: &Bump, keys: &[u64]) -> Vec<NonNull<Entry>> {
    keys.iter()
        .map(|&key| {
            NonNull::from(bump.alloc(Entry {
                key,
                link: RbNode::new(),
            }))
        })
        .collect()
}

unsafe fn insert(tree: &mut RbTree, entry: NonNull<Entry>) {
    let key = entry.as_ref().key;
    let link = EntryAdapter::link_of(entry);
    let mut parent = None;
    let mut side = Side::Left;
    let mut cur = tree.root();
    while let Some(c) = cur {
        parent = Some(c);
        if key < EntryAdapter::container_of(c).as_ref().key {
            side = Side::Left;
            cur = c.as_ref().left();
        } else {
            side = Side::Right;
            cur = c.as_ref().right();
        }
    }
    tree.link_node(link, parent, side);
    tree.insert_fixup(link);
}

fn sequential_keys(count: usize) -> Vec<u64> {
    (0..count as u64).collect()
}

fn shuffled_keys(count: usize) -> Vec<u64> {
    let mut keys = sequential_keys(count);
    let mut rng = StdRng::seed_from_u64(7);
    keys.shuffle(&mut rng);
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbtree_insert");

    for count in [1_000usize, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("sequential", count), count, |b, &count| {
            b.iter_with_setup(
                || {
                    let bump = Bump::new();
                    let entries = alloc_entries(&bump, &sequential_keys(count));
                    (bump, entries)
                },
                |(bump, entries)| {
                    let mut tree = RbTree::new();
                    for &entry in &entries {
                        unsafe { insert(&mut tree, entry) };
                    }
                    black_box((bump, tree))
                },
            );
        });

        group.bench_with_input(BenchmarkId::new("shuffled", count), count, |b, &count| {
            b.iter_with_setup(
                || {
                    let bump = Bump::new();
                    let entries = alloc_entries(&bump, &shuffled_keys(count));
                    (bump, entries)
                },
                |(bump, entries)| {
                    let mut tree = RbTree::new();
                    for &entry in &entries {
                        unsafe { insert(&mut tree, entry) };
                    }
                    black_box((bump, tree))
                },
            );
        });

        group.bench_with_input(
            BenchmarkId::new("btreemap_baseline", count),
            count,
            |b, &count| {
                b.iter_with_setup(
                    || shuffled_keys(count),
                    |keys| {
                        let mut map = BTreeMap::new();
                        for key in keys {
                            map.insert(key, ());
                        }
                        black_box(map)
                    },
                );
            },
        );
    }

    group.finish();
}

fn bench_erase(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbtree_erase");

    for count in [1_000usize, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("shuffled", count), count, |b, &count| {
            b.iter_with_setup(
                || {
                    let bump = Bump::new();
                    let entries = alloc_entries(&bump, &shuffled_keys(count));
                    let mut tree = RbTree::new();
                    for &entry in &entries {
                        unsafe { insert(&mut tree, entry) };
                    }
                    let mut order = entries;
                    order.shuffle(&mut StdRng::seed_from_u64(13));
                    (bump, tree, order)
                },
                |(bump, mut tree, order)| {
                    for &entry in &order {
                        unsafe { tree.erase(EntryAdapter::link_of(entry)) };
                    }
                    black_box((bump, tree))
                },
            );
        });
    }

    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbtree_traverse");

    for count in [10_000usize].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        let bump = Bump::new();
        let entries = alloc_entries(&bump, &shuffled_keys(*count));
        let mut tree = RbTree::new();
        for &entry in &entries {
            unsafe { insert(&mut tree, entry) };
        }

        group.bench_with_input(BenchmarkId::new("in_order", count), count, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                unsafe {
                    for node in tree.iter() {
                        sum = sum.wrapping_add(EntryAdapter::container_of(node).as_ref().key);
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_erase, bench_traverse);
criterion_main!(benches);
