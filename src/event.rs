//! Event records and flat result dumps.
//!
//! Input format: blocks delimited by literal `<event>` / `</event>` lines; every line inside a
//! block is `energy px py pz` (whitespace separated, further columns ignored). Particles with
//! `energy <= ENERGY_FLOOR` are dropped.
//!
//! Output format: all values on one line, each followed by a single space.

use crate::kinematics::{azimuth, pseudorapidity, pt};
use crate::{Error, Result};
use ndarray::{Array1, Array2};
use std::io::{BufRead, Write};

/// Particles at or below this energy are discarded on read.
pub const ENERGY_FLOOR: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub energy: f64,
    pub momentum: [f64; 3],
}

impl Particle {
    pub fn pt(&self) -> f64 {
        pt(self.momentum[0], self.momentum[1])
    }

    pub fn eta(&self) -> f64 {
        let [px, py, pz] = self.momentum;
        pseudorapidity(px, py, pz)
    }

    pub fn phi(&self) -> f64 {
        azimuth(self.momentum[0], self.momentum[1])
    }
}

/// One collider event: an ordered list of particles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub particles: Vec<Particle>,
}

impl Event {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// `n × 3` momenta.
    pub fn momenta(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), 3), |(i, k)| self.particles[i].momentum[k])
    }

    pub fn energies(&self) -> Array1<f64> {
        self.particles.iter().map(|p| p.energy).collect()
    }

    pub fn pts(&self) -> Array1<f64> {
        self.particles.iter().map(Particle::pt).collect()
    }

    pub fn phis(&self) -> Array1<f64> {
        self.particles.iter().map(Particle::phi).collect()
    }

    /// `n × 2` rows `[eta, phi]`.
    pub fn eta_phi(&self) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((self.len(), 2));
        for (i, p) in self.particles.iter().enumerate() {
            out[[i, 0]] = p.eta();
            out[[i, 1]] = p.phi();
        }
        out
    }

    pub fn total_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.energy).sum()
    }

    pub fn total_pt(&self) -> f64 {
        self.particles.iter().map(Particle::pt).sum()
    }
}

fn parse_particle(line: &str, line_no: usize) -> Result<Particle> {
    let mut vals = [0.0f64; 4];
    let mut fields = line.split_whitespace();
    for v in &mut vals {
        let tok = fields.next().ok_or(Error::Parse {
            line: line_no,
            reason: "expected four columns: energy px py pz",
        })?;
        *v = tok.parse().map_err(|_| Error::Parse {
            line: line_no,
            reason: "not a floating-point number",
        })?;
    }
    Ok(Particle {
        energy: vals[0],
        momentum: [vals[1], vals[2], vals[3]],
    })
}

/// Read every `<event>` block from `reader`.
///
/// Blank lines between blocks are skipped; any other text outside a block is an error, as is a
/// block left open at end of input.
pub fn read_events(reader: impl BufRead) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    let mut current: Option<Event> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();

        if current.is_none() {
            if trimmed.starts_with("<event>") {
                current = Some(Event::default());
            } else if !trimmed.is_empty() {
                return Err(Error::Parse {
                    line: line_no,
                    reason: "expected <event>",
                });
            }
        } else if trimmed.starts_with("</event>") {
            events.extend(current.take());
        } else if trimmed.starts_with("<event>") {
            return Err(Error::Parse {
                line: line_no,
                reason: "nested <event>",
            });
        } else if !trimmed.is_empty() {
            let p = parse_particle(trimmed, line_no)?;
            if let Some(ev) = current.as_mut().filter(|_| p.energy > ENERGY_FLOOR) {
                ev.particles.push(p);
            }
        }
    }

    if current.is_some() {
        return Err(Error::Parse {
            line: 0,
            reason: "unterminated <event> block",
        });
    }
    log::info!("read {} events", events.len());
    Ok(events)
}

/// Write `values` on a single line, each followed by a space.
pub fn write_dump(mut writer: impl Write, values: &[f64]) -> Result<()> {
    for v in values {
        write!(writer, "{v} ")?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a dump written by [`write_dump`].
pub fn read_dump(text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|tok| {
            tok.parse().map_err(|_| Error::Parse {
                line: 1,
                reason: "not a floating-point number",
            })
        })
        .collect()
}
