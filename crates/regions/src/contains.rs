use foundation::math::Vec3;

use crate::centroid::ring_orientation;
use crate::region::{Polygon, Ring};

/// Winding number of a ring around the axis through `p` (unit vector).
///
/// Positive when the ring runs counter-clockwise around `p` seen from
/// outside the sphere. Zero when `p` and its antipode lie on the same side.
pub fn ring_winding(ring: &Ring, p: Vec3) -> i32 {
    let units = ring.unit_vectors();
    let mut total = 0.0;
    for (i, j) in ring.edges() {
        let ta = tangent(units[i], p);
        let tb = tangent(units[j], p);
        total += p.dot(ta.cross(tb)).atan2(ta.dot(tb));
    }
    (total / std::f64::consts::TAU).round() as i32
}

/// Whether `p` lies on the enclosed (smaller) side of the ring.
///
/// A point exactly on a vertex counts as inside.
pub fn ring_contains(ring: &Ring, p: Vec3) -> bool {
    if ring
        .unit_vectors()
        .iter()
        .any(|v| (*v - p).length() < 1e-12)
    {
        return true;
    }
    let winding = ring_winding(ring, p);
    winding != 0 && (winding > 0) == (ring_orientation(ring) > 0.0)
}

/// Inside the exterior and outside every hole.
pub fn polygon_contains(polygon: &Polygon, p: Vec3) -> bool {
    let Some(exterior) = polygon.exterior() else {
        return false;
    };
    ring_contains(exterior, p) && !polygon.holes().iter().any(|h| ring_contains(h, p))
}

/// Projection of `v` onto the tangent plane at `p`.
fn tangent(v: Vec3, p: Vec3) -> Vec3 {
    v - p.scale(p.dot(v))
}

#[cfg(test)]
mod tests {
    use super::{polygon_contains, ring_winding};
    use crate::region::{Polygon, Ring};
    use foundation::math::LonLat;

    fn rect(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Ring {
        Ring::from(vec![[lon0, lat0], [lon1, lat0], [lon1, lat1], [lon0, lat1]])
    }

    fn unit(lon: f64, lat: f64) -> foundation::math::Vec3 {
        LonLat::new(lon, lat).to_unit_vector()
    }

    #[test]
    fn winding_sign_follows_direction() {
        let ring = rect(-5.0, -5.0, 5.0, 5.0);
        assert_eq!(ring_winding(&ring, unit(0.0, 0.0)), 1);
        assert_eq!(ring_winding(&ring, unit(90.0, 0.0)), 0);
        // Seen from the antipode the same ring runs the other way.
        assert_eq!(ring_winding(&ring, unit(180.0, 0.0)), -1);
    }

    #[test]
    fn contains_respects_holes() {
        let poly = Polygon::new(vec![rect(0.0, 0.0, 10.0, 10.0), rect(4.0, 4.0, 6.0, 6.0)]);
        assert!(polygon_contains(&poly, unit(2.0, 2.0)));
        assert!(!polygon_contains(&poly, unit(5.0, 5.0)));
        assert!(!polygon_contains(&poly, unit(-3.0, 5.0)));
        // Antipode of an interior point is outside.
        assert!(!polygon_contains(&poly, unit(-178.0, -2.0)));
    }

    #[test]
    fn clockwise_exterior_still_contains() {
        let mut pts = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        pts.reverse();
        let poly = Polygon::new(vec![Ring::from(pts)]);
        assert!(polygon_contains(&poly, unit(5.0, 5.0)));
        assert!(!polygon_contains(&poly, unit(15.0, 5.0)));
    }

    #[test]
    fn ring_spanning_the_antimeridian() {
        let poly = Polygon::new(vec![rect(170.0, -5.0, -170.0, 5.0)]);
        assert!(polygon_contains(&poly, unit(180.0, 0.0)));
        assert!(polygon_contains(&poly, unit(-175.0, 1.0)));
        assert!(!polygon_contains(&poly, unit(0.0, 0.0)));
    }
}
