//! Spherical geometry over region polygons.
//!
//! Regions are immutable once built: the constructor validates every ring
//! and computes the area-weighted centroid, so downstream code (scoring,
//! hit-testing, adjacency) never sees degenerate input.

pub mod adjacency;
pub mod catalog;
pub mod centroid;
pub mod contains;
pub mod error;
pub mod region;
pub mod visibility;

pub use adjacency::*;
pub use catalog::*;
pub use centroid::*;
pub use error::*;
pub use region::*;
pub use visibility::*;
