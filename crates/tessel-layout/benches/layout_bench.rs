//! Benchmarks for viewport solving, hover resolution, and tree edits.
//!
//! Run with: cargo bench -p tessel-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tessel_core::geometry::{Rect, Vec2};
use tessel_layout::{
    LayoutTree, MergeDirection, NodeId, PlacementRegion, compute_viewports,
    resolve_hovered_target, resolve_placement_region,
};

/// Build a tree with `n` leaves by repeatedly splitting the newest leaf,
/// alternating axes so rows nest.
fn make_tree(n: usize) -> LayoutTree {
    let mut tree = LayoutTree::singleton("leaf-0");
    for i in 1..n {
        let target = format!("leaf-{}", i / 2);
        let region = if i % 2 == 0 {
            PlacementRegion::Right
        } else {
            PlacementRegion::Bottom
        };
        let _ = tree.split(&target, region, NodeId::new(format!("leaf-{i}")));
    }
    tree
}

fn bench_compute_viewports(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/compute_viewports");
    let container = Rect::from_size(1920.0, 1080.0);

    for n in [4, 16, 64, 256] {
        let tree = make_tree(n);
        group.bench_with_input(BenchmarkId::new("leaves", n), &tree, |b, tree| {
            b.iter(|| black_box(compute_viewports(tree, container)))
        });
    }

    group.finish();
}

fn bench_resolve_hovered_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/resolve_hovered_target");
    let container = Rect::from_size(1920.0, 1080.0);
    let pointers = [
        Vec2::new(10.0, 10.0),
        Vec2::new(960.0, 540.0),
        Vec2::new(1910.0, 1070.0),
        Vec2::new(2400.0, -50.0),
    ];

    for n in [4, 16, 64, 256] {
        let tree = make_tree(n);
        let viewports = compute_viewports(&tree, container);
        group.bench_with_input(BenchmarkId::new("leaves", n), &n, |b, _| {
            b.iter(|| {
                for pointer in pointers {
                    let _ = black_box(resolve_hovered_target(pointer, &viewports, &tree, None));
                }
            })
        });
    }

    group.finish();
}

fn bench_resolve_placement_region(c: &mut Criterion) {
    let target = Rect::new(100.0, 50.0, 300.0, 200.0);
    c.bench_function("layout/resolve_placement_region", |b| {
        b.iter(|| {
            for x in [105.0, 250.0, 395.0] {
                for y in [55.0, 150.0, 245.0] {
                    let _ = black_box(resolve_placement_region(target, Vec2::new(x, y)));
                }
            }
        })
    });
}

fn bench_split_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/split_join");

    for n in [16, 128] {
        let tree = make_tree(n);
        group.bench_with_input(BenchmarkId::new("leaves", n), &tree, |b, tree| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| {
                    let result = tree
                        .split("leaf-1", PlacementRegion::Right, NodeId::new("extra"))
                        .ok()?;
                    let index = tree.row(&result.row_id)?.child_index("extra")?;
                    black_box(tree.join(&result.row_id, index, MergeDirection::Previous).ok())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_invariant_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/invariant_report");

    for n in [16, 256] {
        let tree = make_tree(n);
        group.bench_with_input(BenchmarkId::new("leaves", n), &tree, |b, tree| {
            b.iter(|| black_box(tree.invariant_report()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_viewports,
    bench_resolve_hovered_target,
    bench_resolve_placement_region,
    bench_split_join,
    bench_invariant_report,
);

criterion_main!(benches);
