//! TopoJSON topologies.
//!
//! Geometries reference shared arcs by index; a negative index `i` means
//! arc `!i` traversed backwards. Quantized topologies carry a transform and
//! delta-encode every arc.

use std::collections::{BTreeSet, HashMap};

use foundation::math::LonLat;
use regions::{AdjacencyIndex, Region, RegionId};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::dataset::{RegionOptions, build_region};
use crate::error::DatasetError;
use crate::geojson::{PolygonCoords, id_string};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Option<Transform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: Map<String, Value>,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    /// Points, lines and null geometries carry no area.
    #[serde(other)]
    Other,
}

/// A polygonal geometry flattened out of an object's collection.
#[derive(Debug, Clone, PartialEq)]
pub struct TopoArea {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// Arc references per polygon, per ring.
    pub arcs: Vec<Vec<Vec<i64>>>,
}

impl Topology {
    pub fn parse(payload: &str) -> Result<Self, DatasetError> {
        let topology: Topology = serde_json::from_str(payload).map_err(DatasetError::Json)?;
        if topology.kind != "Topology" {
            return Err(DatasetError::UnknownFormat(topology.kind));
        }
        Ok(topology)
    }

    /// Name of the object to read: `requested`, or the first one.
    pub fn object_name<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str, DatasetError> {
        match requested {
            Some(name) if self.objects.contains_key(name) => Ok(name),
            Some(name) => Err(DatasetError::UnknownObject(name.to_string())),
            None => self
                .objects
                .keys()
                .next()
                .map(String::as_str)
                .ok_or_else(|| DatasetError::UnknownObject(String::new())),
        }
    }

    /// Polygon and MultiPolygon members of `object`, in order.
    pub fn areas(&self, object: &str) -> Result<Vec<TopoArea>, DatasetError> {
        let value = self
            .objects
            .get(object)
            .ok_or_else(|| DatasetError::UnknownObject(object.to_string()))?;
        let geometry: TopoGeometry =
            serde_json::from_value(value.clone()).map_err(DatasetError::Json)?;
        let mut out = Vec::new();
        collect_areas(geometry, &mut out);
        Ok(out)
    }

    /// Arc `index` in absolute coordinates, reversed for negative indices.
    pub fn decode_arc(&self, index: i64) -> Result<Vec<LonLat>, DatasetError> {
        let (slot, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(slot)
            .ok()
            .and_then(|i| self.arcs.get(i))
            .ok_or(DatasetError::InvalidArc {
                index,
                arc_count: self.arcs.len(),
            })?;

        let mut points = Vec::with_capacity(arc.len());
        let (mut x, mut y) = (0.0, 0.0);
        for position in arc {
            let (px, py) = match position.as_slice() {
                [px, py, ..] => (*px, *py),
                _ => {
                    return Err(DatasetError::InvalidArc {
                        index,
                        arc_count: self.arcs.len(),
                    });
                }
            };
            let p = match self.transform {
                Some(Transform { scale, translate }) => {
                    x += px;
                    y += py;
                    LonLat::new(x * scale[0] + translate[0], y * scale[1] + translate[1])
                }
                None => LonLat::new(px, py),
            };
            points.push(p);
        }
        if reversed {
            points.reverse();
        }
        Ok(points)
    }

    /// Stitch a ring from consecutive arcs; each arc after the first starts
    /// where the previous one ended, so its first point is dropped.
    pub fn decode_ring(&self, arcs: &[i64]) -> Result<Vec<LonLat>, DatasetError> {
        let mut ring: Vec<LonLat> = Vec::new();
        for &index in arcs {
            let points = self.decode_arc(index)?;
            let skip = usize::from(!ring.is_empty());
            ring.extend(points.into_iter().skip(skip));
        }
        Ok(ring)
    }

    fn decode_polygons(&self, arcs: &[Vec<Vec<i64>>]) -> Result<Vec<PolygonCoords>, DatasetError> {
        arcs.iter()
            .map(|polygon| polygon.iter().map(|ring| self.decode_ring(ring)).collect())
            .collect()
    }
}

fn collect_areas(geometry: TopoGeometry, out: &mut Vec<TopoArea>) {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_areas(g, out);
            }
        }
        TopoGeometry::Polygon { arcs, id, properties } => out.push(TopoArea {
            id: id.as_ref().and_then(id_string),
            properties: properties.unwrap_or_default(),
            arcs: vec![arcs],
        }),
        TopoGeometry::MultiPolygon { arcs, id, properties } => out.push(TopoArea {
            id: id.as_ref().and_then(id_string),
            properties: properties.unwrap_or_default(),
            arcs,
        }),
        TopoGeometry::Other => {}
    }
}

/// Regions of one topology object, with adjacency from shared arcs.
pub fn topojson_regions(
    topology: &Topology,
    options: &RegionOptions,
) -> Result<(Vec<Region>, AdjacencyIndex), DatasetError> {
    let object = topology.object_name(options.object.as_deref())?;
    let areas = topology.areas(object)?;

    let mut regions = Vec::with_capacity(areas.len());
    for (index, area) in areas.iter().enumerate() {
        let polygons = topology.decode_polygons(&area.arcs)?;
        regions.push(build_region(
            index,
            area.id.clone(),
            &area.properties,
            polygons,
            options,
        )?);
    }
    let ids: Vec<RegionId> = regions.iter().map(|r| r.id().clone()).collect();
    let adjacency = topology_neighbors(&areas, &ids);
    debug!(object, regions = regions.len(), "decoded topology");
    Ok((regions, adjacency))
}

pub fn read_topojson_regions(
    payload: &str,
    options: &RegionOptions,
) -> Result<(Vec<Region>, AdjacencyIndex), DatasetError> {
    topojson_regions(&Topology::parse(payload)?, options)
}

/// Areas that reference a common arc (in either direction) are neighbours.
/// `ids[i]` names `areas[i]`.
pub fn topology_neighbors(areas: &[TopoArea], ids: &[RegionId]) -> AdjacencyIndex {
    let mut by_arc: HashMap<i64, BTreeSet<usize>> = HashMap::new();
    for (i, area) in areas.iter().enumerate() {
        for &arc in area.arcs.iter().flatten().flatten() {
            let slot = if arc < 0 { !arc } else { arc };
            by_arc.entry(slot).or_default().insert(i);
        }
    }

    let mut index = AdjacencyIndex::new();
    for owners in by_arc.values().filter(|o| o.len() > 1) {
        let owners: Vec<usize> = owners.iter().copied().collect();
        for (n, &a) in owners.iter().enumerate() {
            for &b in &owners[n + 1..] {
                if let (Some(id_a), Some(id_b)) = (ids.get(a), ids.get(b)) {
                    index.insert_pair(id_a.clone(), id_b.clone());
                }
            }
        }
    }
    index
}
