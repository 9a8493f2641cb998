//! Orthtree benchmarks.
//!
//! Covers the hot paths of a point quadtree/octree:
//! - **refine**: bucket refinement of a fresh tree
//! - **grade**: 2:1 balancing of a deliberately unbalanced tree
//! - **locate**: single and parallel point location
//! - **nearest**: k-nearest queries with pruning

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{DVec2, DVec3};
use orthtree::{Bbox, Octree, Quadtree, RefineConfig, RegionTree, Sphere};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Fixtures
// =============================================================================

fn points_2d(count: usize) -> Vec<DVec2> {
  let mut rng = StdRng::seed_from_u64(12345);
  (0..count)
    .map(|_| DVec2::new(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
    .collect()
}

/// Clustered points: most of the set in one corner, so the tree is deep there.
fn points_3d_clustered(count: usize) -> Vec<DVec3> {
  let mut rng = StdRng::seed_from_u64(54321);
  (0..count)
    .map(|i| {
      let spread = if i % 10 == 0 { 100.0 } else { 5.0 };
      DVec3::new(
        rng.random_range(0.0..spread),
        rng.random_range(0.0..spread),
        rng.random_range(0.0..spread),
      )
    })
    .collect()
}

/// Region tree with one corner refined to `depth`, everything else at depth 1.
fn unbalanced_tree(depth: usize) -> RegionTree<3> {
  let mut tree = RegionTree::<3>::from_bbox(Bbox::new([0.0; 3], [1.0; 3]));
  let mut node = tree.root();
  for _ in 0..depth {
    tree.split(node);
    node = tree.child(node, 7);
  }
  tree
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_refine(c: &mut Criterion) {
  let mut group = c.benchmark_group("refine");

  for count in [1_000, 10_000, 100_000] {
    let points = points_2d(count);
    group.bench_with_input(BenchmarkId::new("quadtree_uniform", count), &points, |b, points| {
      b.iter(|| {
        let mut tree = Quadtree::from_points(points.clone());
        tree.refine_with(black_box(RefineConfig::default()));
        tree
      })
    });
  }

  let points = points_3d_clustered(50_000);
  group.bench_function("octree_clustered_50k", |b| {
    b.iter(|| {
      let mut tree = Octree::from_points(points.clone());
      tree.refine_to(black_box(12), black_box(8));
      tree
    })
  });

  group.finish();
}

fn bench_grade(c: &mut Criterion) {
  let mut group = c.benchmark_group("grade");

  for depth in [4, 6, 8] {
    let tree = unbalanced_tree(depth);
    group.bench_with_input(BenchmarkId::new("octree_corner", depth), &tree, |b, tree| {
      b.iter(|| {
        let mut tree = tree.clone();
        tree.grade();
        tree
      })
    });
  }

  group.finish();
}

fn bench_locate(c: &mut Criterion) {
  let mut group = c.benchmark_group("locate");
  let points = points_2d(100_000);
  let mut tree = Quadtree::from_points(points.clone());
  tree.refine_with(RefineConfig::default());

  let queries = points_2d(10_000);
  group.bench_function("sequential_10k", |b| {
    b.iter(|| queries.iter().map(|q| tree.locate(black_box(q))).sum::<usize>())
  });
  group.bench_function("parallel_10k", |b| b.iter(|| tree.locate_all(black_box(&queries))));

  let sphere = Sphere::new([50.0, 50.0], 10.0);
  group.bench_function("intersected_sphere", |b| b.iter(|| tree.intersected(black_box(&sphere))));

  group.finish();
}

fn bench_nearest(c: &mut Criterion) {
  let mut group = c.benchmark_group("nearest");
  let points = points_3d_clustered(50_000);
  let mut tree = Octree::from_points(points);
  tree.refine_to(12, 8);

  let query = DVec3::new(2.5, 2.5, 2.5);
  for k in [1, 10, 100] {
    group.bench_with_input(BenchmarkId::new("octree_clustered", k), &k, |b, &k| {
      b.iter(|| tree.nearest_neighbors(black_box(&query), k))
    });
  }

  group.finish();
}

criterion_group!(construction, bench_refine, bench_grade);
criterion_group!(queries, bench_locate, bench_nearest);
criterion_main!(construction, queries);
