use std::path::PathBuf;

use regions::GeometryError;

#[derive(Debug)]
pub enum DatasetError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    NotAFeatureCollection,
    UnknownFormat(String),
    InvalidFeature {
        index: usize,
        reason: String,
    },
    UnknownObject(String),
    InvalidArc {
        index: i64,
        arc_count: usize,
    },
    Geometry(GeometryError),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            DatasetError::Json(e) => write!(f, "JSON parse error: {e}"),
            DatasetError::NotAFeatureCollection => write!(f, "expected GeoJSON FeatureCollection"),
            DatasetError::UnknownFormat(ty) => {
                write!(f, "unrecognised dataset type {ty:?} (expected FeatureCollection or Topology)")
            }
            DatasetError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
            DatasetError::UnknownObject(name) => write!(f, "topology has no object named {name:?}"),
            DatasetError::InvalidArc { index, arc_count } => {
                write!(f, "arc index {index} out of range ({arc_count} arcs)")
            }
            DatasetError::Geometry(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io { source, .. } => Some(source),
            DatasetError::Json(e) => Some(e),
            DatasetError::Geometry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for DatasetError {
    fn from(e: GeometryError) -> Self {
        DatasetError::Geometry(e)
    }
}
