//! Event → isotropy value.
//!
//! Wires the pieces together for the three supported geometries:
//!
//! | geometry | event points        | event weights | reference                 |
//! |----------|---------------------|---------------|---------------------------|
//! | ring     | azimuths            | pT            | [`ring_points`]           |
//! | cylinder | `[eta, phi]`        | pT            | [`cylinder_points`]       |
//! | sphere   | 3-momenta           | energy        | [`sphere_points`]         |
//!
//! The reference is always the row side of the cost matrix.
//!
//! Particles without a defined position in the chosen geometry are dropped with a `warn!`
//! before the cost matrix is built: on the cylinder, particles along the beam axis (zero pT,
//! infinite eta, and zero weight anyway); on the sphere, particles with a zero 3-momentum.

use crate::cylinder::cylinder_points;
use crate::emd::{compute_emd, Emd, TransportSolver, DEFAULT_MAX_ITER};
use crate::event::{Event, Particle};
use crate::kinematics::energies;
use crate::metric::{
    cylindrical_cost, phi_cosine_cost, phi_linear_cost, spherical_angular_cost,
    spherical_cosine_cost,
};
use crate::ring::ring_points;
use crate::sphere::sphere_points;
use crate::weights::uniform_weights;
use crate::Result;
use ndarray::{Array1, Array2};

/// Ground distance on the ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RingMetric {
    /// \(\frac{4}{\pi}\Delta\phi\)
    Linear,
    /// \(\frac{\pi}{\pi-2}(1 - \cos\Delta\phi)\)
    #[default]
    Cosine,
}

/// Ground distance on the sphere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SphereMetric {
    /// Opening angle.
    Angular,
    /// \(2(1 - \cos\theta)\)
    #[default]
    Cosine,
}

/// Reference geometry and the metric used against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Ring { segments: usize, metric: RingMetric },
    Cylinder { segments: usize, y_max: f64 },
    /// `12 · 4^level` points, all of \(|\eta|\) (no cut).
    Sphere { level: u32, metric: SphereMetric },
}

#[derive(Debug, Clone)]
pub struct IsotropyConfig {
    pub geometry: Geometry,
    /// Iteration cap handed to the solver.
    pub max_iter: usize,
}

impl Default for IsotropyConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::Sphere {
                level: 2,
                metric: SphereMetric::Cosine,
            },
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

/// Reference point sets, one variant per geometry.
#[derive(Debug, Clone)]
pub enum Points {
    Angles(Array1<f64>),
    EtaPhi(Array2<f64>),
    Directions(Array2<f64>),
}

impl Points {
    pub fn len(&self) -> usize {
        match self {
            Points::Angles(a) => a.len(),
            Points::EtaPhi(p) | Points::Directions(p) => p.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A quasi-isotropic reference event. Build once, compare many events against it.
#[derive(Debug, Clone)]
pub struct Reference {
    pub geometry: Geometry,
    pub points: Points,
    pub weights: Array1<f64>,
}

impl Reference {
    pub fn new(geometry: Geometry) -> Result<Self> {
        let (points, weights) = match geometry {
            Geometry::Ring { segments, .. } => {
                let r = ring_points(segments)?;
                let w = uniform_weights(r.len());
                (Points::Angles(r), w)
            }
            Geometry::Cylinder { segments, y_max } => {
                let c = cylinder_points(segments, y_max)?;
                let w = uniform_weights(c.nrows());
                (Points::EtaPhi(c), w)
            }
            Geometry::Sphere { level, .. } => {
                let s = sphere_points(level, None)?;
                let w = energies(&s.view())?;
                (Points::Directions(s), w)
            }
        };
        Ok(Self {
            geometry,
            points,
            weights,
        })
    }

    /// Cost matrix (reference rows × event columns) and the event weights.
    ///
    /// Columns follow the event's particles after dropping the ones this geometry cannot place.
    pub fn cost_to(&self, event: &Event) -> Result<(Array2<f64>, Array1<f64>)> {
        match (&self.points, self.geometry) {
            (Points::Angles(r), Geometry::Ring { metric, .. }) => {
                let phis = event.phis();
                let cost = match metric {
                    RingMetric::Linear => phi_linear_cost(&r.view(), &phis.view()),
                    RingMetric::Cosine => phi_cosine_cost(&r.view(), &phis.view()),
                };
                Ok((cost, event.pts()))
            }
            (Points::EtaPhi(c), Geometry::Cylinder { y_max, .. }) => {
                let event = &placeable(event, |p| p.eta().is_finite(), "along the beam axis");
                let cost = cylindrical_cost(&c.view(), &event.eta_phi().view(), y_max)?;
                Ok((cost, event.pts()))
            }
            (Points::Directions(s), Geometry::Sphere { metric, .. }) => {
                let event = &placeable(event, has_direction, "zero or non-finite 3-momentum");
                let p = event.momenta();
                let cost = match metric {
                    SphereMetric::Angular => spherical_angular_cost(&s.view(), &p.view())?,
                    SphereMetric::Cosine => spherical_cosine_cost(&s.view(), &p.view())?,
                };
                Ok((cost, event.energies()))
            }
            _ => Err(crate::Error::InvalidParameter(
                "reference points do not match their geometry",
            )),
        }
    }

    /// Isotropy of `event` against this reference.
    pub fn isotropy<S: TransportSolver + ?Sized>(
        &self,
        solver: &S,
        event: &Event,
        max_iter: usize,
    ) -> Result<Emd> {
        let (cost, w) = self.cost_to(event)?;
        compute_emd(solver, &self.weights.view(), &w.view(), &cost.view(), max_iter)
    }
}

fn has_direction(p: &Particle) -> bool {
    p.momentum.iter().all(|c| c.is_finite()) && p.momentum.iter().any(|&c| c != 0.0)
}

fn placeable(event: &Event, keep: impl Fn(&Particle) -> bool, reason: &str) -> Event {
    let kept: Vec<Particle> = event.particles.iter().copied().filter(|p| keep(p)).collect();
    let dropped = event.len() - kept.len();
    if dropped > 0 {
        log::warn!("dropping {dropped} of {} particles: {reason}", event.len());
    }
    Event::new(kept)
}

/// Build the reference for `cfg.geometry` and compute the isotropy of `event` against it.
pub fn event_isotropy<S: TransportSolver + ?Sized>(
    solver: &S,
    cfg: &IsotropyConfig,
    event: &Event,
) -> Result<Emd> {
    Reference::new(cfg.geometry)?.isotropy(solver, event, cfg.max_iter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emd::{Diagnostics, Transport};
    use crate::event::Particle;
    use crate::Error;
    use ndarray::{ArrayView1, ArrayView2};

    /// Reports the independent-coupling cost.
    struct ProductSolver;

    impl TransportSolver for ProductSolver {
        fn solve(
            &self,
            a: &ArrayView1<f64>,
            b: &ArrayView1<f64>,
            cost: &ArrayView2<f64>,
            _max_iter: usize,
        ) -> Result<Transport> {
            Ok(Transport {
                cost: a.dot(&cost.dot(b)),
                diagnostics: Diagnostics::converged(1),
            })
        }
    }

    fn particle(px: f64, py: f64, pz: f64) -> Particle {
        Particle {
            energy: (px * px + py * py + pz * pz).sqrt(),
            momentum: [px, py, pz],
        }
    }

    #[test]
    fn references_have_expected_sizes() {
        let ring = Reference::new(Geometry::Ring {
            segments: 16,
            metric: RingMetric::Cosine,
        })
        .unwrap();
        assert_eq!(ring.points.len(), 16);

        let cyl = Reference::new(Geometry::Cylinder {
            segments: 4,
            y_max: 2.0,
        })
        .unwrap();
        assert_eq!(cyl.points.len(), 8);

        let sph = Reference::new(Geometry::Sphere {
            level: 1,
            metric: SphereMetric::Angular,
        })
        .unwrap();
        assert_eq!(sph.points.len(), 48);
        assert!(sph.weights.iter().all(|&w| (w - 1.0).abs() < 1e-12));
    }

    #[test]
    fn cost_shapes_follow_reference_by_event() {
        let event = Event::new(vec![particle(1.0, 0.0, 0.5), particle(-1.0, 0.2, -0.3)]);
        for geometry in [
            Geometry::Ring {
                segments: 8,
                metric: RingMetric::Linear,
            },
            Geometry::Cylinder {
                segments: 8,
                y_max: 2.0,
            },
            Geometry::Sphere {
                level: 0,
                metric: SphereMetric::Cosine,
            },
        ] {
            let r = Reference::new(geometry).unwrap();
            let (cost, w) = r.cost_to(&event).unwrap();
            assert_eq!(cost.dim(), (r.points.len(), 2));
            assert_eq!(w.len(), 2);
        }
    }

    #[test]
    fn empty_event_is_invalid_weights() {
        let cfg = IsotropyConfig::default();
        let err = event_isotropy(&ProductSolver, &cfg, &Event::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidWeights(_)), "{err:?}");
    }

    #[test]
    fn unplaceable_particles_are_dropped() {
        let event = Event::new(vec![
            particle(1.0, 0.0, 0.5),
            particle(-1.0, 0.2, -0.3),
            // Along the beam: infinite eta, zero pT.
            particle(0.0, 0.0, 3.0),
        ]);
        let cyl = Reference::new(Geometry::Cylinder {
            segments: 8,
            y_max: 2.0,
        })
        .unwrap();
        let (cost, w) = cyl.cost_to(&event).unwrap();
        assert_eq!(cost.ncols(), 2);
        assert_eq!(w.len(), 2);
        assert!(cost.iter().all(|c| c.is_finite()));

        // Energy above the floor but no 3-momentum.
        let mut with_blob = event.clone();
        with_blob.particles.push(Particle {
            energy: 2.0,
            momentum: [0.0, 0.0, 0.0],
        });
        let sph = Reference::new(Geometry::Sphere {
            level: 0,
            metric: SphereMetric::Cosine,
        })
        .unwrap();
        let (cost, w) = sph.cost_to(&with_blob).unwrap();
        assert_eq!(cost.ncols(), 3);
        assert_eq!(w.len(), 3);
        assert!(event_isotropy(
            &ProductSolver,
            &IsotropyConfig {
                geometry: sph.geometry,
                max_iter: 10,
            },
            &with_blob
        )
        .is_ok());
    }

    #[test]
    fn mismatched_reference_is_rejected() {
        let mut r = Reference::new(Geometry::Ring {
            segments: 4,
            metric: RingMetric::Cosine,
        })
        .unwrap();
        r.geometry = Geometry::Sphere {
            level: 0,
            metric: SphereMetric::Cosine,
        };
        let event = Event::new(vec![particle(1.0, 0.0, 0.0)]);
        assert!(matches!(
            r.cost_to(&event),
            Err(Error::InvalidParameter(_))
        ));
    }
}
