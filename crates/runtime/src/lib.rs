pub mod event_bus;
pub mod scheduler;
pub mod tween;

pub use event_bus::*;
pub use scheduler::*;
pub use tween::*;
