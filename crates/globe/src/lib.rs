//! Interactive orthographic globe: projection, gestures, camera animation.
//!
//! Everything here is single-threaded and frame-driven. The host feeds
//! input events and frame timestamps into a [`Globe`], then drains redraw
//! notifications and reads screen coordinates back out of the projection.

pub mod config;
pub mod gesture;
pub mod globe;
pub mod picking;
pub mod projection;

pub use config::*;
pub use gesture::*;
pub use globe::*;
pub use picking::*;
pub use projection::*;
