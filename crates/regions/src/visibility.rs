use foundation::math::{LonLat, Rotation};

use crate::region::Region;

/// Cosine of the angular distance between `point` and the position the
/// rotation brings to the front of the globe.
pub fn front_cosine(point: LonLat, rotation: Rotation) -> f64 {
    point
        .to_unit_vector()
        .dot(rotation.front().to_unit_vector())
}

/// True when `point` is on the near side of the sphere under `rotation`.
///
/// Hit-testing and tooltips use this to ignore back-facing geometry.
pub fn is_on_visible_hemisphere(point: LonLat, rotation: Rotation) -> bool {
    front_cosine(point, rotation) >= 0.0
}

/// Region whose centroid faces the viewer.
pub fn region_faces_viewer(region: &Region, rotation: Rotation) -> bool {
    is_on_visible_hemisphere(region.centroid(), rotation)
}
