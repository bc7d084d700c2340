//! Render-surface collaborator contracts
//!
//! The core never talks to a GPU. Each viewport owns a [`RenderSurface`]
//! and hands it one [`FrameView`] per draw; what the surface does with it
//! (WebGL, wgpu, a test recorder) is up to the host.

use glam::Mat4;

use crate::scene::{LightRig, MeshInstance, PerspectiveCamera};

/// Everything a surface needs to draw one frame of one viewport.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub viewport: &'a str,
    pub camera: &'a PerspectiveCamera,
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    /// `None` until the mesh is attached, or forever if its load failed.
    pub mesh: Option<&'a MeshInstance>,
    pub lights: &'a LightRig,
}

/// A drawable target backing one viewport.
pub trait RenderSurface {
    /// Current client (CSS) size of the surface. Zero when hidden.
    fn client_size(&self) -> (u32, u32);

    /// Resizes the drawing buffer. Only called with non-zero sizes.
    fn set_size(&mut self, width: u32, height: u32);

    /// Draws one frame.
    fn draw(&mut self, frame: &FrameView<'_>);
}

/// Looks render surfaces up by id at startup.
pub trait SurfaceProvider {
    /// Returns `None` when no surface with this id exists.
    fn acquire(&mut self, surface_id: &str) -> Option<Box<dyn RenderSurface>>;
}
