use foundation::math::LonLat;
use regions::Region;
use serde_json::{Map, Value};

use crate::dataset::{RegionOptions, build_region};
use crate::error::DatasetError;

/// Polygon rings as parsed, outer ring first. Closing vertices are kept.
pub type PolygonCoords = Vec<Vec<LonLat>>;

/// A GeoJSON feature reduced to what a region needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub polygons: Vec<PolygonCoords>,
}

/// Parse a FeatureCollection of Polygon / MultiPolygon features.
pub fn parse_area_features(value: &Value) -> Result<Vec<AreaFeature>, DatasetError> {
    let obj = value.as_object().ok_or(DatasetError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(DatasetError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(DatasetError::NotAFeatureCollection);
    }
    let features_val = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(DatasetError::NotAFeatureCollection)?;

    let mut features = Vec::with_capacity(features_val.len());
    for (index, feat_val) in features_val.iter().enumerate() {
        let invalid = |reason: String| DatasetError::InvalidFeature { index, reason };
        let feat_obj = feat_val
            .as_object()
            .ok_or_else(|| invalid("feature must be an object".to_string()))?;

        let feat_type = feat_obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| invalid("feature missing type".to_string()))?;
        if feat_type != "Feature" {
            return Err(invalid(format!("unexpected feature type: {feat_type}")));
        }

        let properties = feat_obj
            .get("properties")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        let geometry_val = feat_obj
            .get("geometry")
            .ok_or_else(|| invalid("feature missing geometry".to_string()))?;
        let polygons = parse_area_geometry(geometry_val).map_err(invalid)?;

        features.push(AreaFeature {
            id: feat_obj.get("id").and_then(id_string),
            properties,
            polygons,
        });
    }
    Ok(features)
}

/// Parse a GeoJSON payload straight into regions.
pub fn read_geojson_regions(payload: &str, options: &RegionOptions) -> Result<Vec<Region>, DatasetError> {
    let value: Value = serde_json::from_str(payload).map_err(DatasetError::Json)?;
    geojson_regions(&value, options)
}

pub fn geojson_regions(value: &Value, options: &RegionOptions) -> Result<Vec<Region>, DatasetError> {
    parse_area_features(value)?
        .into_iter()
        .enumerate()
        .map(|(index, f)| build_region(index, f.id, &f.properties, f.polygons, options))
        .collect()
}

/// Feature / geometry ids may be strings or numbers.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_area_geometry(value: &Value) -> Result<Vec<PolygonCoords>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(vec![parse_polygon(coords)?]),
        "MultiPolygon" => parse_multi_polygon(coords),
        other => Err(format!("unsupported geometry type for a region: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(LonLat::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<LonLat>, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_polygon(coords: &Value) -> Result<PolygonCoords, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<PolygonCoords>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_area_features, read_geojson_regions};
    use crate::dataset::RegionOptions;
    use crate::error::DatasetError;
    use pretty_assertions::assert_eq;
    use regions::build_adjacency;

    const DEMO: &str = include_str!("../../../assets/demo-seas.geojson");

    #[test]
    fn parses_demo_seas() {
        let regions = read_geojson_regions(DEMO, &RegionOptions::default()).expect("parse demo");
        let ids: Vec<&str> = regions.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["north-sea", "baltic-sea", "Tasman Sea"]);
        assert_eq!(regions[1].name(), "Baltic Sea");
        // MultiPolygon with one polygon.
        assert_eq!(regions[2].polygons().len(), 1);

        let adjacency = build_adjacency(&regions).unwrap();
        assert!(adjacency.are_adjacent("north-sea", "baltic-sea"));
        assert_eq!(adjacency.neighbor_count("Tasman Sea"), 0);
    }

    #[test]
    fn rejects_non_collections() {
        let value = serde_json::json!({ "type": "Feature" });
        assert!(matches!(
            parse_area_features(&value),
            Err(DatasetError::NotAFeatureCollection)
        ));
    }

    #[test]
    fn rejects_point_features() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "NAME": "Buoy" },
                  "geometry": { "type": "Point", "coordinates": [1, 2] } }
            ]
        }"#;
        let err = read_geojson_regions(payload, &RegionOptions::default()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidFeature { index: 0, .. }), "{err}");
    }

    #[test]
    fn numeric_ids_become_strings() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "id": 7, "properties": { "NAME": "Seven" },
                  "geometry": { "type": "Polygon",
                                "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] } }
            ]
        }"#;
        let regions = read_geojson_regions(payload, &RegionOptions::default()).unwrap();
        assert_eq!(regions[0].id().as_str(), "7");
    }
}
