//! Frame driver
//!
//! [`RenderLoop::tick`] is called once per display refresh by the host
//! (`requestAnimationFrame` on the web, the host's own callback natively).
//! It never blocks: asset loading progresses by pumping the cache, and a
//! viewport without a mesh still renders its lights and background.

use crate::assets::{AssetCache, MeshHandle, TexturePalette};
use crate::utils::time::Timer;
use crate::viewport::ViewportRegistry;

#[derive(Default)]
pub struct RenderLoop {
    timer: Timer,
    frame_count: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame.
    ///
    /// 1. advance the timer
    /// 2. let pending loads make progress
    /// 3. attach the mesh to the viewports once it has resolved
    /// 4. per viewport, in insertion order: controls, rotation, one draw
    pub fn tick(
        &mut self,
        registry: &mut ViewportRegistry,
        assets: &mut AssetCache,
        mesh: &MeshHandle,
        palette: &TexturePalette,
    ) {
        self.timer.tick();
        let dt = self.timer.dt_seconds();

        assets.pump();
        registry.attach_resolved(mesh, palette);

        registry.for_each_mut(|viewport| {
            viewport.update_controls(dt);
            viewport.advance_rotation(dt);
            viewport.render_once();
        });

        self.frame_count += 1;
        log::trace!("Frame {} done (dt {dt:.4}s)", self.frame_count);
    }

    /// Completed ticks.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}
