use std::fs;
use std::path::Path;

use regions::{Polygon, Region, RegionCatalog, Ring};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::DatasetError;
use crate::geojson::{PolygonCoords, geojson_regions};
use crate::topojson::{Topology, topojson_regions};

pub const DEFAULT_NAME_PROPERTY: &str = "NAME";

/// How features map onto regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionOptions {
    /// Property holding the display name; also the id fallback.
    pub name_property: String,
    /// TopoJSON object to read. Defaults to the first one.
    pub object: Option<String>,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
            object: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DatasetFormat {
    GeoJson,
    TopoJson,
}

impl DatasetFormat {
    /// Sniff the top-level `type` member.
    pub fn detect(value: &Value) -> Result<Self, DatasetError> {
        match value.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => Ok(DatasetFormat::GeoJson),
            Some("Topology") => Ok(DatasetFormat::TopoJson),
            Some(other) => Err(DatasetError::UnknownFormat(other.to_string())),
            None => Err(DatasetError::UnknownFormat(String::new())),
        }
    }
}

/// Build the region catalog from a GeoJSON or TopoJSON payload.
///
/// Topologies supply adjacency from shared arcs; GeoJSON catalogs derive it
/// from shared edges on first use.
pub fn load_catalog_str(payload: &str, options: &RegionOptions) -> Result<RegionCatalog, DatasetError> {
    let value: Value = serde_json::from_str(payload).map_err(DatasetError::Json)?;
    let catalog = match DatasetFormat::detect(&value)? {
        DatasetFormat::GeoJson => RegionCatalog::new(geojson_regions(&value, options)?)?,
        DatasetFormat::TopoJson => {
            let topology: Topology = serde_json::from_value(value).map_err(DatasetError::Json)?;
            let (regions, adjacency) = topojson_regions(&topology, options)?;
            RegionCatalog::with_adjacency(regions, adjacency)?
        }
    };
    Ok(catalog)
}

pub fn load_catalog_path(path: impl AsRef<Path>, options: &RegionOptions) -> Result<RegionCatalog, DatasetError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = load_catalog_str(&payload, options)?;
    debug!(path = %path.display(), regions = catalog.len(), "dataset loaded");
    Ok(catalog)
}

pub(crate) fn build_region(
    index: usize,
    id: Option<String>,
    properties: &Map<String, Value>,
    polygons: Vec<PolygonCoords>,
    options: &RegionOptions,
) -> Result<Region, DatasetError> {
    let name = properties
        .get(&options.name_property)
        .and_then(Value::as_str)
        .map(str::to_string);
    let Some(id) = id.or_else(|| name.clone()) else {
        return Err(DatasetError::InvalidFeature {
            index,
            reason: format!("feature has neither an id nor a {:?} property", options.name_property),
        });
    };
    let name = name.unwrap_or_else(|| id.clone());
    let polygons = polygons
        .into_iter()
        .map(|rings| Polygon::new(rings.into_iter().map(Ring::new).collect()))
        .collect();
    Ok(Region::new(id, name, polygons)?)
}

#[cfg(test)]
mod tests {
    use super::{DatasetFormat, RegionOptions, load_catalog_path, load_catalog_str};
    use crate::error::DatasetError;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn asset(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets").join(name)
    }

    #[test]
    fn both_encodings_agree() {
        let opts = RegionOptions::default();
        let geo = load_catalog_path(asset("demo-seas.geojson"), &opts).unwrap();
        let topo = load_catalog_path(asset("demo-seas.topo.json"), &opts).unwrap();
        assert_eq!(geo.len(), topo.len());
        for (a, b) in geo.iter().zip(topo.iter()) {
            assert_eq!(a.id(), b.id());
            assert!((a.centroid().lon - b.centroid().lon).abs() < 1e-9);
            assert!((a.centroid().lat - b.centroid().lat).abs() < 1e-9);
        }
        assert_eq!(geo.adjacency().unwrap(), topo.adjacency().unwrap());
    }

    #[test]
    fn name_lookup_in_loaded_catalog() {
        let catalog = load_catalog_path(asset("demo-seas.geojson"), &RegionOptions::default()).unwrap();
        let baltic = catalog.find_by_name("  baltic sea ").unwrap();
        assert_eq!(baltic.id().as_str(), "baltic-sea");
    }

    #[test]
    fn custom_name_property() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "label": "Square" },
                  "geometry": { "type": "Polygon",
                                "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] } }
            ]
        }"#;
        let options = RegionOptions {
            name_property: "label".to_string(),
            object: None,
        };
        let catalog = load_catalog_str(payload, &options).unwrap();
        assert!(catalog.get("Square").is_some());

        let err = load_catalog_str(payload, &RegionOptions::default()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidFeature { index: 0, .. }));
    }

    #[test]
    fn degenerate_ring_fails_at_load() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "id": "flat", "properties": {},
                  "geometry": { "type": "Polygon",
                                "coordinates": [[[0,0],[1,1],[0,0]]] } }
            ]
        }"#;
        assert!(matches!(
            load_catalog_str(payload, &RegionOptions::default()),
            Err(DatasetError::Geometry(_))
        ));
    }

    #[test]
    fn detect_rejects_other_types() {
        let value = serde_json::json!({ "type": "GeometryCollection" });
        assert!(matches!(
            DatasetFormat::detect(&value),
            Err(DatasetError::UnknownFormat(t)) if t == "GeometryCollection"
        ));
        let missing = load_catalog_path(asset("no-such-file.json"), &RegionOptions::default());
        assert!(matches!(missing, Err(DatasetError::Io { .. })));
    }
}
