use event_isotropy::emd::compute_emd;
use event_isotropy::event::{read_events, Event, Particle};
use event_isotropy::isotropy::{Geometry, IsotropyConfig, Reference, SphereMetric};
use event_isotropy::kinematics::energies;
use event_isotropy::metric::spherical_cosine_cost;
use event_isotropy::sinkhorn::SinkhornSolver;
use event_isotropy::sphere::{sphere_points, sphere_with_dijet_points};
use event_isotropy::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const MAX_ITER: usize = 50_000;

fn event_from_directions(points: &ndarray::Array2<f64>, energy: f64) -> Event {
    Event::new(
        points
            .rows()
            .into_iter()
            .map(|r| Particle {
                energy,
                momentum: [energy * r[0], energy * r[1], energy * r[2]],
            })
            .collect(),
    )
}

fn dijet_event() -> Event {
    Event::new(vec![
        Particle {
            energy: 50.0,
            momentum: [50.0, 0.0, 0.0],
        },
        Particle {
            energy: 50.0,
            momentum: [-50.0, 0.0, 0.0],
        },
    ])
}

#[test]
fn finer_tiling_is_far_more_isotropic_than_a_dijet() -> Result<()> {
    let solver = SinkhornSolver::default();
    let reference = Reference::new(Geometry::Sphere {
        level: 1,
        metric: SphereMetric::Cosine,
    })?;

    let fine = event_from_directions(&sphere_points(2, None)?, 3.0);
    let iso = reference.isotropy(&solver, &fine, MAX_ITER)?;
    let dijet = reference.isotropy(&solver, &dijet_event(), MAX_ITER)?;

    assert!(iso.diagnostics.converged && dijet.diagnostics.converged);
    // Each reference point travels to the nearer jet: E[2(1 - |x|)] = 1 on the sphere.
    assert!((dijet.cost - 1.0).abs() < 0.1, "dijet cost {}", dijet.cost);
    assert!(iso.cost < 0.2 * dijet.cost, "iso={} dijet={}", iso.cost, dijet.cost);
    Ok(())
}

#[test]
fn dijet_fraction_controls_anisotropy() -> Result<()> {
    let solver = SinkhornSolver::default();
    let reference = sphere_points(1, None)?;
    let ref_w = energies(&reference.view())?;

    let mut costs = Vec::new();
    for frac in [0.0, 0.5, 1.0] {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let ev = sphere_with_dijet_points(1, frac, &mut rng)?;
        let cost = spherical_cosine_cost(&reference.view(), &ev.points.view())?;
        let emd = compute_emd(&solver, &ref_w.view(), &ev.weights.view(), &cost.view(), MAX_ITER)?;
        costs.push(emd.cost);
    }
    assert!(
        costs[0] < costs[1] && costs[1] < costs[2],
        "expected growing anisotropy with dijet fraction: {costs:?}"
    );
    Ok(())
}

#[test]
fn event_file_to_isotropy() -> Result<()> {
    let text = "\
<event>
50.0 50.0 0.0 0.0
50.0 -50.0 0.0 0.0
0.000001 0.0 0.000001 0.0
</event>
";
    let events = read_events(text.as_bytes())?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].len(), 2);

    let cfg = IsotropyConfig {
        geometry: Geometry::Sphere {
            level: 1,
            metric: SphereMetric::Cosine,
        },
        max_iter: MAX_ITER,
    };
    let from_file =
        event_isotropy::isotropy::event_isotropy(&SinkhornSolver::default(), &cfg, &events[0])?;
    let direct = event_isotropy::isotropy::event_isotropy(
        &SinkhornSolver::default(),
        &cfg,
        &dijet_event(),
    )?;
    assert!((from_file.cost - direct.cost).abs() < 1e-9);
    Ok(())
}
