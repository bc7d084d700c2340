//! Utility Module
//!
//! - [`OrbitControls`]: damped camera orbit
//! - [`Timer`]: frame timing

pub mod orbit_control;
pub mod time;

pub use orbit_control::{ControlConfig, OrbitControls};
pub use time::Timer;
