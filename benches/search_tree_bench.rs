//! Benchmark for AvlTree and RedBlackTree vs standard BTreeMap.
//!
//! Keys are inserted in a scrambled order so the plain insertion path and
//! both fixup passes are exercised, not just the sorted-input special case.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ordered_trees::{AvlTree, RedBlackTree};
use std::collections::BTreeMap;

const SIZES: [i32; 3] = [100, 1_000, 10_000];

/// `0..size` visited in a fixed pseudo-random order.
fn scrambled(size: i32) -> Vec<i32> {
    // 7_919 is prime and divides none of the sizes, so this is a permutation.
    (0..size).map(|index| (index * 7_919) % size).collect()
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in SIZES {
        let keys = scrambled(size);

        group.bench_with_input(BenchmarkId::new("AvlTree", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut tree = AvlTree::new();
                for &key in keys {
                    tree.insert(black_box(key), black_box(key * 2));
                }
                black_box(tree)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("RedBlackTree", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut tree = RedBlackTree::new();
                    for &key in keys {
                        tree.insert(black_box(key), black_box(key * 2));
                    }
                    black_box(tree)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut map = BTreeMap::new();
                for &key in keys {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in SIZES {
        let avl_tree: AvlTree<i32, i32> =
            scrambled(size).into_iter().map(|key| (key, key)).collect();
        let red_black_tree: RedBlackTree<i32, i32> =
            scrambled(size).into_iter().map(|key| (key, key)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("AvlTree", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0_i64;
                for key in 0..size {
                    if let Some(&value) = avl_tree.get(&black_box(key)) {
                        sum += i64::from(value);
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("RedBlackTree", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0_i64;
                    for key in 0..size {
                        if let Some(&value) = red_black_tree.get(&black_box(key)) {
                            sum += i64::from(value);
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0_i64;
                for key in 0..size {
                    if let Some(&value) = standard_map.get(&black_box(key)) {
                        sum += i64::from(value);
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in SIZES {
        let avl_tree: AvlTree<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let red_black_tree: RedBlackTree<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let keys = scrambled(size);

        group.bench_with_input(BenchmarkId::new("AvlTree", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut tree = avl_tree.clone();
                for key in keys {
                    tree.remove(black_box(key));
                }
                black_box(tree)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("RedBlackTree", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut tree = red_black_tree.clone();
                    for key in keys {
                        tree.remove(black_box(key));
                    }
                    black_box(tree)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut map = standard_map.clone();
                for key in keys {
                    map.remove(black_box(key));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_insert, benchmark_get, benchmark_remove);
criterion_main!(benches);
