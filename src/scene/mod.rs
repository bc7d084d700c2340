//! Per-viewport scene state
//!
//! - [`Transform`]: TRS component with pivot and dirty checking
//! - [`PerspectiveCamera`]: viewport camera
//! - [`MeshInstance`]: a viewport's instance of the shared mesh
//! - [`LightRig`]: lights of a viewport

pub mod camera;
pub mod light;
pub mod mesh_instance;
pub mod transform;

pub use camera::PerspectiveCamera;
pub use light::{AmbientLight, DirectionalLight, LightRig};
pub use mesh_instance::{MeshInstance, PaintableSurface};
pub use transform::Transform;
