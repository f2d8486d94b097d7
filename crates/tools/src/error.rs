use std::path::PathBuf;

use formats::DatasetError;
use regions::GeometryError;
use scoring::ScoringError;

#[derive(Debug)]
pub enum CliError {
    Io { path: PathBuf, source: std::io::Error },
    Config { path: PathBuf, reason: String },
    Dataset(DatasetError),
    Geometry(GeometryError),
    Scoring(ScoringError),
    UnknownName(String),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io { path, source } => write!(f, "read {}: {source}", path.display()),
            CliError::Config { path, reason } => {
                write!(f, "config {}: {reason}", path.display())
            }
            CliError::Dataset(e) => write!(f, "dataset: {e}"),
            CliError::Geometry(e) => write!(f, "geometry: {e}"),
            CliError::Scoring(e) => write!(f, "{e}"),
            CliError::UnknownName(name) => write!(f, "no region named {name:?}"),
            CliError::Json(e) => write!(f, "JSON output: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<DatasetError> for CliError {
    fn from(e: DatasetError) -> Self {
        CliError::Dataset(e)
    }
}

impl From<GeometryError> for CliError {
    fn from(e: GeometryError) -> Self {
        CliError::Geometry(e)
    }
}

impl From<ScoringError> for CliError {
    fn from(e: ScoringError) -> Self {
        CliError::Scoring(e)
    }
}
