use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array1;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use event_isotropy::cylinder::{cylinder_points, cylinder_points_shifted};
use event_isotropy::emd::compute_emd;
use event_isotropy::metric::{cylindrical_cost, phi_cosine_cost, spherical_cosine_cost};
use event_isotropy::ring::{ring_points, ring_points_shifted};
use event_isotropy::sinkhorn::SinkhornSolver;
use event_isotropy::sphere::{sphere_points, sphere_with_dijet_points};

fn bench_cost_matrices(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost_matrix");
    group.sample_size(30);
    let mut rng = ChaCha8Rng::seed_from_u64(123);

    for n in [16usize, 64, 256] {
        let a = ring_points(n).unwrap();
        let b = ring_points_shifted(n, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("phi_cosine", n), &n, |bch, _| {
            bch.iter(|| phi_cosine_cost(&a.view(), &b.view()))
        });
    }

    // Grid size grows ~ n^2 / pi.
    for n in [8usize, 16, 32] {
        let ca = cylinder_points(n, 2.0).unwrap();
        let cb = cylinder_points_shifted(n, 2.0, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("cylindrical", n), &n, |bch, _| {
            bch.iter(|| cylindrical_cost(&ca.view(), &cb.view(), 2.0).unwrap())
        });
    }

    for level in [1u32, 2, 3] {
        let s = sphere_points(level, None).unwrap();
        let d = sphere_with_dijet_points(level, 0.5, &mut rng).unwrap();
        group.bench_with_input(
            BenchmarkId::new("spherical_cosine", format!("level{level}")),
            &level,
            |bch, _| bch.iter(|| spherical_cosine_cost(&s.view(), &d.points.view()).unwrap()),
        );
    }
    group.finish();
}

fn bench_emd(c: &mut Criterion) {
    let mut group = c.benchmark_group("emd_sinkhorn");
    group.sample_size(10);
    let solver = SinkhornSolver::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    // Keep iteration caps modest; the goal is relative scaling, not convergence.
    for n in [16usize, 64] {
        let a = ring_points(n).unwrap();
        let b = ring_points_shifted(n, &mut rng).unwrap();
        let cost = phi_cosine_cost(&a.view(), &b.view());
        let w = Array1::<f64>::ones(n);
        group.bench_with_input(BenchmarkId::new("ring", n), &n, |bch, _| {
            bch.iter(|| compute_emd(&solver, &w.view(), &w.view(), &cost.view(), 5_000).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cost_matrices, bench_emd);
criterion_main!(benches);
