use serde::{Deserialize, Serialize};

use super::{LonLat, normalize_lon_deg};

/// Three-axis sphere rotation in degrees: spin (`lambda`), tilt (`phi`), roll (`gamma`).
///
/// Conventions match the usual orthographic globe setup: the rotation is
/// applied to geographic positions, and the rotated position `(0, 0)` faces
/// the viewer. `Rotation::centered_on(p)` therefore brings `p` to the front.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
    pub gamma: f64,
}

impl Rotation {
    pub fn new(lambda: f64, phi: f64, gamma: f64) -> Self {
        Self { lambda, phi, gamma }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    /// Rotation that puts `p` at the center of the visible disc.
    pub fn centered_on(p: LonLat) -> Self {
        Self::new(-p.lon, -p.lat, 0.0)
    }

    pub fn as_array(self) -> [f64; 3] {
        [self.lambda, self.phi, self.gamma]
    }

    /// Spin wrapped into `[-180, 180)` and tilt clamped to `[-max_tilt, max_tilt]`.
    pub fn constrained(self, max_tilt_deg: f64) -> Self {
        let lambda = if self.lambda.is_finite() {
            normalize_lon_deg(self.lambda)
        } else {
            0.0
        };
        let phi = if self.phi.is_nan() {
            0.0
        } else {
            self.phi.clamp(-max_tilt_deg, max_tilt_deg)
        };
        let gamma = if self.gamma.is_finite() {
            normalize_lon_deg(self.gamma)
        } else {
            0.0
        };
        Self::new(lambda, phi, gamma)
    }

    /// Rotate a geographic position into view space.
    pub fn apply(self, p: LonLat) -> LonLat {
        let lambda = wrap_rad((p.lon + self.lambda).to_radians());
        let phi = p.lat.to_radians();
        if self.phi == 0.0 && self.gamma == 0.0 {
            return LonLat::new(lambda.to_degrees(), p.lat);
        }

        let (sin_dphi, cos_dphi) = self.phi.to_radians().sin_cos();
        let (sin_dgamma, cos_dgamma) = self.gamma.to_radians().sin_cos();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * cos_dphi + x * sin_dphi;

        LonLat::new(
            (y * cos_dgamma - k * sin_dgamma)
                .atan2(x * cos_dphi - z * sin_dphi)
                .to_degrees(),
            (k * cos_dgamma + y * sin_dgamma)
                .clamp(-1.0, 1.0)
                .asin()
                .to_degrees(),
        )
    }

    /// Map a view-space position back to geographic coordinates.
    pub fn invert(self, p: LonLat) -> LonLat {
        let mut lambda = p.lon.to_radians();
        let mut phi = p.lat.to_radians();

        if self.phi != 0.0 || self.gamma != 0.0 {
            let (sin_dphi, cos_dphi) = self.phi.to_radians().sin_cos();
            let (sin_dgamma, cos_dgamma) = self.gamma.to_radians().sin_cos();

            let cos_phi = phi.cos();
            let x = lambda.cos() * cos_phi;
            let y = lambda.sin() * cos_phi;
            let z = phi.sin();
            let k = z * cos_dgamma - y * sin_dgamma;

            lambda = (y * cos_dgamma + z * sin_dgamma).atan2(x * cos_dphi + k * sin_dphi);
            phi = (k * cos_dphi - x * sin_dphi).clamp(-1.0, 1.0).asin();
        }

        LonLat::new(
            wrap_rad(lambda - self.lambda.to_radians()).to_degrees(),
            phi.to_degrees(),
        )
    }

    /// Geographic position currently facing the viewer.
    pub fn front(self) -> LonLat {
        self.invert(LonLat::new(0.0, 0.0))
    }
}

impl From<[f64; 3]> for Rotation {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

fn wrap_rad(a: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    if a > PI {
        a - TAU
    } else if a < -PI {
        a + TAU
    } else {
        a
    }
}
