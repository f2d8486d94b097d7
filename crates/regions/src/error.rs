#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    EmptyBoundary {
        region: String,
    },
    DegenerateRing {
        region: String,
        polygon: usize,
        ring: usize,
        distinct_vertices: usize,
    },
    InvalidCoordinate {
        region: String,
        lon: f64,
        lat: f64,
    },
    DegenerateCentroid {
        region: String,
    },
    DuplicateRegionId {
        id: String,
    },
    UnknownRegionId {
        id: String,
    },
    InvalidTolerance(f64),
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::EmptyBoundary { region } => {
                write!(f, "region {region} has no polygons")
            }
            GeometryError::DegenerateRing {
                region,
                polygon,
                ring,
                distinct_vertices,
            } => write!(
                f,
                "region {region}: ring {ring} of polygon {polygon} has only \
                 {distinct_vertices} distinct vertices (need 3)"
            ),
            GeometryError::InvalidCoordinate { region, lon, lat } => {
                write!(f, "region {region}: invalid coordinate ({lon}, {lat})")
            }
            GeometryError::DegenerateCentroid { region } => {
                write!(f, "region {region}: centroid is undefined")
            }
            GeometryError::DuplicateRegionId { id } => write!(f, "duplicate region id: {id}"),
            GeometryError::UnknownRegionId { id } => write!(f, "unknown region id: {id}"),
            GeometryError::InvalidTolerance(tol) => {
                write!(f, "vertex tolerance must be positive and finite, got {tol}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
