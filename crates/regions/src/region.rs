use std::borrow::Borrow;

use foundation::math::{LonLat, Vec3};

use crate::centroid::spherical_centroid;
use crate::contains::polygon_contains;
use crate::error::GeometryError;

/// Stable region identifier supplied by the dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RegionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Closed ring of positions. The closing vertex is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<LonLat>,
    units: Vec<Vec3>,
}

impl Ring {
    /// Builds a ring, dropping an explicit closing vertex if present.
    pub fn new(mut points: Vec<LonLat>) -> Self {
        if points.len() >= 2 && points.first() == points.last() {
            points.pop();
        }
        let units = points.iter().map(|p| p.to_unit_vector()).collect();
        Self { points, units }
    }

    pub fn points(&self) -> &[LonLat] {
        &self.points
    }

    /// Unit vectors matching `points()`.
    pub fn unit_vectors(&self) -> &[Vec3] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges as `(from, to)` index pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (i, (i + 1) % n))
    }

    /// Vertex count after collapsing consecutive repeats (wrapping around).
    pub fn distinct_vertex_count(&self) -> usize {
        let n = self.points.len();
        if n == 0 {
            return 0;
        }
        let repeats = self
            .edges()
            .filter(|&(i, j)| self.points[i] == self.points[j])
            .count();
        (n - repeats).max(1)
    }
}

impl From<Vec<[f64; 2]>> for Ring {
    fn from(coords: Vec<[f64; 2]>) -> Self {
        Self::new(coords.into_iter().map(LonLat::from).collect())
    }
}

/// Exterior ring followed by zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    pub fn contains(&self, point: LonLat) -> bool {
        polygon_contains(self, point.to_unit_vector())
    }
}

/// An immutable named area on the sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: RegionId,
    name: String,
    polygons: Vec<Polygon>,
    centroid: LonLat,
}

impl Region {
    /// Validates the boundary and computes the centroid.
    pub fn new(
        id: impl Into<RegionId>,
        name: impl Into<String>,
        polygons: Vec<Polygon>,
    ) -> Result<Self, GeometryError> {
        let id = id.into();
        validate_boundary(&id, &polygons)?;
        let centroid =
            spherical_centroid(&polygons).ok_or_else(|| GeometryError::DegenerateCentroid {
                region: id.to_string(),
            })?;

        Ok(Self {
            id,
            name: name.into(),
            polygons,
            centroid,
        })
    }

    pub fn id(&self) -> &RegionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flat_map(|p| p.rings().iter())
    }

    pub fn centroid(&self) -> LonLat {
        self.centroid
    }

    /// Spherical point-in-region test; holes are excluded.
    pub fn contains(&self, point: LonLat) -> bool {
        let p = point.to_unit_vector();
        self.polygons.iter().any(|poly| polygon_contains(poly, p))
    }
}

fn validate_boundary(id: &RegionId, polygons: &[Polygon]) -> Result<(), GeometryError> {
    if polygons.is_empty() || polygons.iter().any(|p| p.rings().is_empty()) {
        return Err(GeometryError::EmptyBoundary {
            region: id.to_string(),
        });
    }

    for (pi, polygon) in polygons.iter().enumerate() {
        for (ri, ring) in polygon.rings().iter().enumerate() {
            if let Some(bad) = ring.points().iter().find(|p| !p.is_valid()) {
                return Err(GeometryError::InvalidCoordinate {
                    region: id.to_string(),
                    lon: bad.lon,
                    lat: bad.lat,
                });
            }
            let distinct = ring.distinct_vertex_count();
            if ring.is_empty() || distinct < 3 {
                return Err(GeometryError::DegenerateRing {
                    region: id.to_string(),
                    polygon: pi,
                    ring: ri,
                    distinct_vertices: if ring.is_empty() { 0 } else { distinct },
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Polygon, Region, Ring};
    use crate::error::GeometryError;
    use foundation::math::LonLat;

    fn square(lon0: f64, lat0: f64, size: f64) -> Ring {
        Ring::from(vec![
            [lon0, lat0],
            [lon0 + size, lat0],
            [lon0 + size, lat0 + size],
            [lon0, lat0 + size],
            [lon0, lat0],
        ])
    }

    #[test]
    fn ring_drops_closing_vertex() {
        let ring = square(0.0, 0.0, 1.0);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.edges().count(), 4);
    }

    #[test]
    fn builds_region_with_centroid() {
        let region = Region::new("a", "Alpha Sea", vec![Polygon::new(vec![square(10.0, -1.0, 2.0)])])
            .expect("valid region");
        assert_eq!(region.id().as_str(), "a");
        assert_eq!(region.name(), "Alpha Sea");
        let c = region.centroid();
        assert!((c.lon - 11.0).abs() < 1e-3);
        assert!(c.lat.abs() < 1e-3);
        assert!(region.contains(LonLat::new(11.0, 0.0)));
        assert!(!region.contains(LonLat::new(15.0, 0.0)));
    }

    #[test]
    fn rejects_empty_boundary() {
        let err = Region::new("e", "Empty", vec![]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::EmptyBoundary {
                region: "e".to_string()
            }
        );
    }

    #[test]
    fn rejects_duplicate_only_ring() {
        let ring = Ring::from(vec![[1.0, 1.0], [1.0, 1.0], [2.0, 2.0], [1.0, 1.0]]);
        let err = Region::new("d", "Dup", vec![Polygon::new(vec![ring])]).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateRing { distinct_vertices: 2, .. }));
    }

    #[test]
    fn rejects_zero_length_ring() {
        let err = Region::new("z", "Zero", vec![Polygon::new(vec![Ring::new(vec![])])]).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateRing { distinct_vertices: 0, .. }));
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let ring = Ring::from(vec![[0.0, 0.0], [1.0, 95.0], [2.0, 0.0]]);
        let err = Region::new("x", "Bad", vec![Polygon::new(vec![ring])]).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidCoordinate { .. }));
    }
}
