use serde::{Deserialize, Serialize};

use super::Vec3;

/// Mean Earth radius (kilometers), the sphere all distances are measured on.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

/// Half the great-circle circumference of the modeled sphere (kilometers).
pub const MAX_GREAT_CIRCLE_KM: f64 = std::f64::consts::PI * EARTH_MEAN_RADIUS_KM;

/// Geographic position in degrees, longitude first.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Finite, with latitude inside [-90, 90].
    pub fn is_valid(self) -> bool {
        self.is_finite() && (-90.0..=90.0).contains(&self.lat)
    }

    /// Unit vector with x toward (0, 0), y toward (90E, 0), z toward the north pole.
    pub fn to_unit_vector(self) -> Vec3 {
        let lon = self.lon.to_radians();
        let lat = self.lat.to_radians();
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    /// Inverse of [`LonLat::to_unit_vector`]. The input need not be normalized.
    pub fn from_vector(v: Vec3) -> Self {
        let len = v.length();
        let lat = if len > 0.0 {
            (v.z / len).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };
        Self::new(v.y.atan2(v.x).to_degrees(), lat.to_degrees())
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

/// Wrap a longitude into `[-180, 180)`.
pub fn normalize_lon_deg(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Great-circle angle between two positions (radians), haversine form.
pub fn central_angle_rad(a: LonLat, b: LonLat) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let sin_dphi = ((phi2 - phi1) * 0.5).sin();
    let sin_dlambda = ((b.lon - a.lon).to_radians() * 0.5).sin();
    let h = sin_dphi * sin_dphi + phi1.cos() * phi2.cos() * sin_dlambda * sin_dlambda;
    2.0 * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Great-circle distance on the mean-radius sphere (kilometers).
pub fn distance_km(a: LonLat, b: LonLat) -> f64 {
    central_angle_rad(a, b) * EARTH_MEAN_RADIUS_KM
}

/// Initial compass bearing from `a` toward `b`, degrees clockwise from north in `[0, 360)`.
pub fn initial_bearing_deg(a: LonLat, b: LonLat) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}
