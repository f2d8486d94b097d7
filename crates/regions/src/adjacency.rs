use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use foundation::math::{LonLat, normalize_lon_deg};
use tracing::debug;

use crate::error::GeometryError;
use crate::region::{Region, RegionId};

/// Coordinate-equality tolerance (degrees) used when matching shared vertices.
pub const DEFAULT_VERTEX_TOLERANCE_DEG: f64 = 1e-6;

/// Symmetric region-to-neighbours mapping.
///
/// Ordering contract:
/// - Neighbour iteration is in ascending `RegionId` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyIndex {
    neighbors: BTreeMap<RegionId, BTreeSet<RegionId>>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from unordered pairs; self-pairs are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (RegionId, RegionId)>,
    {
        let mut index = Self::new();
        for (a, b) in pairs {
            index.insert_pair(a, b);
        }
        index
    }

    /// Records `a` and `b` as neighbours of each other.
    ///
    /// Returns `true` if the index changed.
    pub fn insert_pair(&mut self, a: RegionId, b: RegionId) -> bool {
        if a == b {
            return false;
        }
        let added = self
            .neighbors
            .entry(a.clone())
            .or_default()
            .insert(b.clone());
        self.neighbors.entry(b).or_default().insert(a);
        added
    }

    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a RegionId> + use<'a> {
        self.neighbors.get(id).into_iter().flat_map(|s| s.iter())
    }

    pub fn neighbor_count(&self, id: &str) -> usize {
        self.neighbors.get(id).map_or(0, BTreeSet::len)
    }

    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbors.get(a).is_some_and(|s| s.contains(b))
    }

    /// Regions with at least one neighbour.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RegionId> {
        self.neighbors.keys()
    }

    /// Each unordered pair once, `a < b`.
    pub fn pairs(&self) -> impl Iterator<Item = (&RegionId, &RegionId)> {
        self.neighbors
            .iter()
            .flat_map(|(a, set)| set.iter().filter(move |b| a < *b).map(move |b| (a, b)))
    }

    pub fn is_symmetric(&self) -> bool {
        self.neighbors
            .iter()
            .all(|(a, set)| set.iter().all(|b| self.are_adjacent(b.as_str(), a.as_str())))
    }
}

/// Derives adjacency by matching shared boundary edges.
///
/// Two regions are neighbours iff they share at least one edge, i.e. two
/// consecutive vertices equal within [`DEFAULT_VERTEX_TOLERANCE_DEG`].
pub fn build_adjacency(regions: &[Region]) -> Result<AdjacencyIndex, GeometryError> {
    build_adjacency_with_tolerance(regions, DEFAULT_VERTEX_TOLERANCE_DEG)
}

/// Shared-edge hash: every edge is keyed by the direction-free pair of its
/// endpoints' cluster ids, so the pass is linear in the total vertex count.
pub fn build_adjacency_with_tolerance(
    regions: &[Region],
    tolerance_deg: f64,
) -> Result<AdjacencyIndex, GeometryError> {
    if !(tolerance_deg.is_finite() && tolerance_deg > 0.0) {
        return Err(GeometryError::InvalidTolerance(tolerance_deg));
    }

    let mut seen_ids: HashSet<&RegionId> = HashSet::with_capacity(regions.len());
    for region in regions {
        if !seen_ids.insert(region.id()) {
            return Err(GeometryError::DuplicateRegionId {
                id: region.id().to_string(),
            });
        }
    }

    let mut vertices = VertexIndex::new(tolerance_deg);
    let mut owners: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
    for (region_index, region) in regions.iter().enumerate() {
        for ring in region.rings() {
            let points = ring.points();
            for (i, j) in ring.edges() {
                let a = vertices.canonical(points[i]);
                let b = vertices.canonical(points[j]);
                if a == b {
                    continue;
                }
                let key = if a < b { (a, b) } else { (b, a) };
                let list = owners.entry(key).or_default();
                if list.last() != Some(&region_index) {
                    list.push(region_index);
                }
            }
        }
    }

    let mut index = AdjacencyIndex::new();
    for list in owners.values().filter(|l| l.len() > 1) {
        for (n, &a) in list.iter().enumerate() {
            for &b in &list[n + 1..] {
                index.insert_pair(regions[a].id().clone(), regions[b].id().clone());
            }
        }
    }

    debug!(
        regions = regions.len(),
        edges = owners.len(),
        pairs = index.pairs().count(),
        "built adjacency index"
    );
    Ok(index)
}

type CellKey = (i64, i64);
type EdgeKey = (usize, usize);

/// Assigns one id to every cluster of vertices within the tolerance.
///
/// Vertices are bucketed on a grid of cell size `tolerance`; a lookup scans
/// the 3x3 block of cells around the query so points straddling a cell
/// boundary still meet.
struct VertexIndex {
    tolerance: f64,
    wrap: i64,
    cells: HashMap<CellKey, Vec<(LonLat, usize)>>,
    next_id: usize,
}

impl VertexIndex {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            wrap: (360.0 / tolerance).round() as i64,
            cells: HashMap::new(),
            next_id: 0,
        }
    }

    fn canonical(&mut self, p: LonLat) -> usize {
        let p = self.normalize(p);
        let (lon_key, lat_key) = self.cell(p);
        for d_lon in -1..=1 {
            for d_lat in -1..=1 {
                let key = (self.wrap_lon_key(lon_key + d_lon), lat_key + d_lat);
                let Some(bucket) = self.cells.get(&key) else {
                    continue;
                };
                if let Some(&(_, id)) = bucket.iter().find(|(q, _)| self.coincide(p, *q)) {
                    return id;
                }
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.cells.entry((lon_key, lat_key)).or_default().push((p, id));
        id
    }

    fn normalize(&self, p: LonLat) -> LonLat {
        // Both poles collapse to a single point regardless of longitude.
        if p.lat.abs() >= 90.0 - self.tolerance * 0.5 {
            return LonLat::new(0.0, 90f64.copysign(p.lat));
        }
        LonLat::new(normalize_lon_deg(p.lon), p.lat)
    }

    fn cell(&self, p: LonLat) -> CellKey {
        let lon_key = (p.lon / self.tolerance).floor() as i64;
        let lat_key = (p.lat / self.tolerance).floor() as i64;
        (self.wrap_lon_key(lon_key), lat_key)
    }

    // Longitude +180 and -180 are the same meridian.
    fn wrap_lon_key(&self, key: i64) -> i64 {
        let half = self.wrap / 2;
        (key + half).rem_euclid(self.wrap) - half
    }

    fn coincide(&self, a: LonLat, b: LonLat) -> bool {
        let d_lon = (a.lon - b.lon).abs();
        let d_lon = d_lon.min(360.0 - d_lon);
        d_lon <= self.tolerance && (a.lat - b.lat).abs() <= self.tolerance
    }
}
