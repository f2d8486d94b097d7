use foundation::math::{LonLat, Vec3};

use crate::region::{Polygon, Ring};

const MOMENT_EPSILON: f64 = 1e-12;

/// First moment of a ring's enclosed area, as a vector.
///
/// Summing `angle * unit_normal` over the ring's great-circle edges gives a
/// vector parallel to the integral of position over the enclosed cap. The
/// raw sum points into whichever side the ring winds counter-clockwise
/// around; callers orient it with [`oriented_ring_moment`].
pub fn ring_moment(ring: &Ring) -> Vec3 {
    let units = ring.unit_vectors();
    let mut sum = Vec3::default();
    for (i, j) in ring.edges() {
        let a = units[i];
        let b = units[j];
        let cross = a.cross(b);
        let m = cross.length();
        if m <= 0.0 {
            continue;
        }
        let angle = m.atan2(a.dot(b));
        sum = sum + cross.scale(angle / m);
    }
    sum
}

/// Sum of a ring's vertex unit vectors; points toward the ring's small side.
pub fn ring_vertex_mean(ring: &Ring) -> Vec3 {
    ring.unit_vectors()
        .iter()
        .fold(Vec3::default(), |acc, v| acc + *v)
}

/// +1 when the ring winds counter-clockwise (seen from outside the sphere)
/// around its smaller side, -1 otherwise.
pub fn ring_orientation(ring: &Ring) -> f64 {
    if ring_moment(ring).dot(ring_vertex_mean(ring)) >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Ring moment oriented toward the area the ring encloses, independent of
/// whether the dataset winds exteriors clockwise or counter-clockwise.
pub fn oriented_ring_moment(ring: &Ring) -> Vec3 {
    ring_moment(ring).scale(ring_orientation(ring))
}

/// Area-weighted centroid of a set of spherical polygons.
///
/// Holes subtract from their exterior. Falls back to the vertex mean when the
/// enclosed area vanishes; `None` when that is undefined too.
pub fn spherical_centroid(polygons: &[Polygon]) -> Option<LonLat> {
    let mut moment = Vec3::default();
    let mut vertex_sum = Vec3::default();

    for polygon in polygons {
        let Some(exterior) = polygon.exterior() else {
            continue;
        };
        moment = moment + oriented_ring_moment(exterior);
        vertex_sum = vertex_sum + ring_vertex_mean(exterior);
        for hole in polygon.holes() {
            moment = moment - oriented_ring_moment(hole);
        }
    }

    let dir = if moment.length() > MOMENT_EPSILON {
        moment
    } else {
        vertex_sum
    };
    dir.normalize().map(LonLat::from_vector)
}
