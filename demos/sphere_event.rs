//! Spherical isotropy of every event in a file.
//!
//! The file holds `<event>` … `</event>` blocks of `E px py pz` lines. Each event is compared
//! against the level-2 (192 point) sphere with the 2(1 − cos θ) metric and the EMD is printed,
//! one per line.
//!
//! Run:
//! ```bash
//! RUST_LOG=info cargo run --release --example sphere_event -- events.txt [level]
//! ```

use event_isotropy::event::read_events;
use event_isotropy::isotropy::{Geometry, IsotropyConfig, Reference, SphereMetric};
use event_isotropy::sinkhorn::SinkhornSolver;
use event_isotropy::{Error, Result};
use std::fs::File;
use std::io::BufReader;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or(Error::InvalidParameter("usage: sphere_event <events file> [level]"))?;
    let level: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2);

    let cfg = IsotropyConfig {
        geometry: Geometry::Sphere {
            level,
            metric: SphereMetric::Cosine,
        },
        ..IsotropyConfig::default()
    };
    let reference = Reference::new(cfg.geometry)?;
    let events = read_events(BufReader::new(File::open(&path)?))?;

    let solver = SinkhornSolver::default();
    for (i, ev) in events.iter().enumerate() {
        match reference.isotropy(&solver, ev, cfg.max_iter) {
            Ok(emd) => println!("{}", emd.cost),
            Err(e) => log::warn!("event {i}: {e}"),
        }
    }
    Ok(())
}
