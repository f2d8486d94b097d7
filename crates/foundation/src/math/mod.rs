pub mod geodesy;
pub mod precision;
pub mod rotation;
pub mod vec;

pub use geodesy::*;
pub use precision::*;
pub use rotation::*;
pub use vec::*;
