//! Equal-area sphere tiling.
//!
//! A resolution level `k` has `nside = 2^k` and exactly `12 · 4^k` pixels of equal solid angle.
//! [`HealpixRing`] returns pixel centres in the HEALPix RING ordering (Górski et al. 2005), which is
//! the ordering `healpy.pix2vec` uses by default.

use crate::{Error, Result};
use core::f64::consts::{FRAC_PI_2, PI};

/// Highest level the pixel index math supports (`nside = 2^29`, the HEALPix limit for 64-bit
/// indices). Generating every centre is capped much lower, see `sphere::sphere_points`.
pub const MAX_LEVEL: u32 = 29;

/// Number of pixels at `level`: \(12 \cdot 4^{level}\).
pub fn pixel_count(level: u32) -> Result<u64> {
    check_level(level)?;
    Ok(12u64 << (2 * level))
}

/// Inverse of [`pixel_count`]: the level whose tiling has exactly `count` pixels.
pub fn level_for_pixel_count(count: u64) -> Result<u32> {
    if count % 12 != 0 || count == 0 {
        return Err(Error::InvalidParameter("pixel count must be 12 * 4^k"));
    }
    let q = count / 12;
    if !q.is_power_of_two() || q.trailing_zeros() % 2 != 0 {
        return Err(Error::InvalidParameter("pixel count must be 12 * 4^k"));
    }
    let level = q.trailing_zeros() / 2;
    check_level(level)?;
    Ok(level)
}

fn check_level(level: u32) -> Result<()> {
    if level > MAX_LEVEL {
        return Err(Error::InvalidParameter("resolution level exceeds MAX_LEVEL"));
    }
    Ok(())
}

/// Equal-area pixelization of the unit sphere.
pub trait SphereTiling {
    /// Total pixels at `level`.
    fn pixel_count(&self, level: u32) -> Result<u64>;

    /// Pixel centre as `(theta, phi)`, colatitude in \([0, \pi]\), azimuth in \([0, 2\pi)\).
    fn pixel_to_angles(&self, level: u32, pixel: u64) -> Result<(f64, f64)>;

    /// Pixel centre as a unit vector.
    fn pixel_to_vector(&self, level: u32, pixel: u64) -> Result<[f64; 3]>;
}

/// HEALPix, RING scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealpixRing;

impl HealpixRing {
    /// `(z, phi)` of a pixel centre, `z = cos(theta)`.
    fn pixel_to_z_phi(&self, level: u32, pixel: u64) -> Result<(f64, f64)> {
        let npix = pixel_count(level)?;
        if pixel >= npix {
            return Err(Error::InvalidParameter("pixel index out of range"));
        }
        let nside = 1u64 << level;
        let ncap = 2 * nside * (nside - 1);
        let fact2 = 4.0 / npix as f64;

        if pixel < ncap {
            // North polar cap.
            let iring = (1 + isqrt(1 + 2 * pixel)) >> 1;
            let iphi = (pixel + 1) - 2 * iring * (iring - 1);
            let z = 1.0 - (iring * iring) as f64 * fact2;
            let phi = (iphi as f64 - 0.5) * FRAC_PI_2 / iring as f64;
            Ok((z, phi))
        } else if pixel < npix - ncap {
            // Equatorial belt.
            let fact1 = (2 * nside) as f64 * fact2;
            let ip = pixel - ncap;
            let tmp = ip / (4 * nside);
            let iring = tmp + nside;
            let iphi = ip - tmp * 4 * nside + 1;
            let fodd = if (iring + nside) & 1 == 1 { 1.0 } else { 0.5 };
            let z = (2 * nside) as f64 - iring as f64;
            let z = z * fact1;
            let phi = (iphi as f64 - fodd) * PI / (2 * nside) as f64;
            Ok((z, phi))
        } else {
            // South polar cap.
            let ip = npix - pixel;
            let iring = (1 + isqrt(2 * ip - 1)) >> 1;
            let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
            let z = -1.0 + (iring * iring) as f64 * fact2;
            let phi = (iphi as f64 - 0.5) * FRAC_PI_2 / iring as f64;
            Ok((z, phi))
        }
    }
}

impl SphereTiling for HealpixRing {
    fn pixel_count(&self, level: u32) -> Result<u64> {
        pixel_count(level)
    }

    fn pixel_to_angles(&self, level: u32, pixel: u64) -> Result<(f64, f64)> {
        let (z, phi) = self.pixel_to_z_phi(level, pixel)?;
        Ok((z.clamp(-1.0, 1.0).acos(), phi))
    }

    fn pixel_to_vector(&self, level: u32, pixel: u64) -> Result<[f64; 3]> {
        let (z, phi) = self.pixel_to_z_phi(level, pixel)?;
        let sth = ((1.0 - z) * (1.0 + z)).max(0.0).sqrt();
        Ok([sth * phi.cos(), sth * phi.sin(), z])
    }
}

/// Integer square root (floor).
fn isqrt(x: u64) -> u64 {
    let mut r = (x as f64).sqrt() as u64;
    while r * r > x {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= x {
        r += 1;
    }
    r
}
