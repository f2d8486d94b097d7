pub mod dataset;
pub mod error;
pub mod geojson;
pub mod topojson;

pub use dataset::*;
pub use error::*;
pub use geojson::*;
pub use topojson::*;
