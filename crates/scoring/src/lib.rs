//! Guess scoring: great-circle distance between centroids, adjacency, and
//! the colour a guessed region is painted with.

pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod guess;
pub mod score;

pub use color::*;
pub use config::*;
pub use display::*;
pub use error::*;
pub use guess::*;
pub use score::*;
