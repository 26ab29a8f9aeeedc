//! Benchmarks for the packing solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use blockfit::geometry::placements;
use blockfit::grid::format_solution;
use blockfit::matrix::Matrix;
use blockfit::pieces::Catalog;
use blockfit::{solve, Request, SolveConfig};

/// Benchmark a full solve of four T pieces in a 4x4 board.
fn bench_solve(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let request = Request::new(&catalog, 4, 4, &[('T', 4)]).unwrap();
    let config = SolveConfig::default().with_seed(1);

    c.bench_function("solve_t_4x4", |b| {
        b.iter(|| solve(black_box(&request), &config))
    });
}

/// Benchmark a mixed request on an auto-sized board.
fn bench_solve_mixed(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let counts = [('B', 2), ('D', 2), ('L', 2), ('O', 1), ('T', 2), ('A', 2)];
    let request = Request::with_auto_dimensions(&catalog, &counts).unwrap();
    let config = SolveConfig::default().with_seed(7);

    let mut group = c.benchmark_group("mixed");
    group.sample_size(20);
    group.bench_function("solve_8x4", |b| {
        b.iter(|| solve(black_box(&request), &config))
    });
    group.finish();
}

/// Benchmark building the cover matrix alone.
fn bench_build_matrix(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let request = Request::new(&catalog, 8, 8, &[('L', 4), ('T', 4), ('S', 4), ('O', 4)]).unwrap();

    c.bench_function("build_matrix_8x8", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(3);
            Matrix::build(request.width, request.height, black_box(&request.pieces), &mut rng)
        })
    });
}

/// Benchmark enumerating placements of one orientation.
fn bench_placements(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let shape = &catalog.get('U').unwrap().orientations[0];

    c.bench_function("placements_u_10x10", |b| {
        b.iter(|| placements(black_box(shape), 10, 10))
    });
}

/// Benchmark formatting a solution for display.
fn bench_format_solution(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let request = Request::new(&catalog, 4, 4, &[('T', 4)]).unwrap();
    let outcome = solve(&request, &SolveConfig::default().with_seed(1));

    c.bench_function("format_solution", |b| {
        b.iter(|| format_solution(black_box(&outcome.placements), 4, 4))
    });
}

criterion_group!(
    benches,
    bench_solve,
    bench_solve_mixed,
    bench_build_matrix,
    bench_placements,
    bench_format_solution
);
criterion_main!(benches);
