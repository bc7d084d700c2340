//! Viewports
//!
//! A [`Viewport`] is one independent camera, render surface, orbit control
//! and mesh instance. Viewports are created from declarative
//! [`ViewportSpec`]s by the [`ViewportRegistry`] and never share mutable
//! state with each other.

pub mod registry;

use std::fmt;
use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::app::input::Input;
use crate::app::surface::{FrameView, RenderSurface};
use crate::errors::{Error, Result};
use crate::resources::geometry::MeshAsset;
use crate::resources::material::Material;
use crate::scene::{LightRig, MeshInstance, PerspectiveCamera};
use crate::utils::orbit_control::OrbitControls;

pub use crate::utils::orbit_control::ControlConfig;
pub use registry::{InitReport, ResizeReport, ViewportRegistry};

new_key_type! {
    /// Stable handle of a registered viewport.
    pub struct ViewportId;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportRole {
    /// The large hero view.
    Primary,
    /// One tile of the product grid.
    #[default]
    Gallery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    /// Orbit target.
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// One row of the viewport table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSpec {
    /// Id of the backing render surface (the canvas element id on the web).
    pub surface_id: String,
    pub role: ViewportRole,
    pub camera: CameraConfig,
    pub controls: ControlConfig,
    /// Uniform scale applied after centering.
    pub scale: f32,
    pub rotate_continuously: bool,
    /// Radians per second around +Y.
    pub rotation_speed: f32,
    /// 1-based palette index of the material shown once the mesh attaches.
    pub initial_texture: Option<usize>,
    pub lights: LightRig,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            surface_id: String::new(),
            role: ViewportRole::default(),
            camera: CameraConfig::default(),
            controls: ControlConfig::default(),
            scale: 1.0,
            rotate_continuously: false,
            rotation_speed: 0.5,
            initial_texture: None,
            lights: LightRig::default(),
        }
    }
}

impl ViewportSpec {
    pub fn new(surface_id: impl Into<String>) -> Self {
        Self {
            surface_id: surface_id.into(),
            ..Self::default()
        }
    }
}

/// Result of a successful [`Viewport::resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Resized { width: u32, height: u32 },
    /// Size did not change; nothing was touched.
    Unchanged,
}

pub struct Viewport {
    id: ViewportId,
    name: String,
    role: ViewportRole,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    input: Input,
    surface: Box<dyn RenderSurface>,
    mesh: Option<MeshInstance>,
    lights: LightRig,

    scale: f32,
    rotate_continuously: bool,
    rotation_speed: f32,
    rotation_angle: f32,
    initial_texture: Option<usize>,

    size: (u32, u32),
    draw_count: u64,
}

impl Viewport {
    /// Builds camera, controls and surface state. The mesh stays empty until
    /// [`attach_mesh`](Self::attach_mesh).
    pub fn create(id: ViewportId, spec: &ViewportSpec, surface: Box<dyn RenderSurface>) -> Self {
        let camera_config = &spec.camera;
        let position = Vec3::from(camera_config.position);
        let target = Vec3::from(camera_config.target);

        let mut camera = PerspectiveCamera::new(
            camera_config.fov_degrees,
            1.0,
            camera_config.near,
            camera_config.far,
        );
        camera.transform.position = position;
        camera.transform.look_at(target, Vec3::Y);
        camera.update_view_matrix();

        let controls = OrbitControls::from_camera(position, target, &spec.controls);

        let mut viewport = Self {
            id,
            name: spec.surface_id.clone(),
            role: spec.role,
            camera,
            controls,
            input: Input::new(),
            surface,
            mesh: None,
            lights: spec.lights.clone(),

            scale: spec.scale,
            rotate_continuously: spec.rotate_continuously,
            rotation_speed: spec.rotation_speed,
            rotation_angle: 0.0,
            initial_texture: spec.initial_texture,

            size: (0, 0),
            draw_count: 0,
        };

        // A surface hidden at startup stays at aspect 1 until resized.
        if let Err(e) = viewport.resize_to_surface() {
            log::debug!("{e}");
        }

        log::info!("Viewport '{}' created ({:?})", viewport.name, viewport.role);
        viewport
    }

    #[inline]
    pub fn id(&self) -> ViewportId {
        self.id
    }

    /// The surface id this viewport was created for.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn role(&self) -> ViewportRole {
        self.role
    }

    #[inline]
    pub fn initial_texture(&self) -> Option<usize> {
        self.initial_texture
    }

    #[inline]
    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// Last applied drawing-buffer size. `(0, 0)` until the surface is shown.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Number of draw calls issued so far.
    #[inline]
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    #[inline]
    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    /// Pointer state fed by the host; consumed by the orbit controls.
    #[inline]
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    #[inline]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    #[inline]
    pub fn mesh(&self) -> Option<&MeshInstance> {
        self.mesh.as_ref()
    }

    #[inline]
    pub fn mesh_mut(&mut self) -> Option<&mut MeshInstance> {
        self.mesh.as_mut()
    }

    /// Instances the shared mesh for this viewport, centered and scaled.
    ///
    /// Every paintable surface starts out with a copy of `material`.
    /// Replaces any previously attached instance.
    pub fn attach_mesh(&mut self, asset: Arc<MeshAsset>, material: &Material) {
        let mut instance = MeshInstance::new(asset, material);
        instance.set_uniform_scale(self.scale);
        instance.transform.rotation = Quat::from_rotation_y(self.rotation_angle);

        log::info!(
            "Viewport '{}': attached '{}' ({} paintable surfaces)",
            self.name,
            instance.asset().name,
            instance.surfaces().len()
        );
        self.mesh = Some(instance);
    }

    /// Applies a new surface size.
    ///
    /// A zero width or height (hidden surface) is rejected with
    /// [`Error::ZeroSizeSurface`] and leaves camera and surface untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<ResizeOutcome> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroSizeSurface {
                viewport: self.id,
                width,
                height,
            });
        }
        if self.size == (width, height) {
            return Ok(ResizeOutcome::Unchanged);
        }

        let aspect = width as f32 / height as f32;
        self.camera.set_aspect(aspect);
        self.surface.set_size(width, height);
        self.input.handle_resize(width, height);
        self.size = (width, height);

        log::debug!("Viewport '{}' resized to {width}x{height}", self.name);
        Ok(ResizeOutcome::Resized { width, height })
    }

    /// Resizes to the surface's current client size.
    pub fn resize_to_surface(&mut self) -> Result<ResizeOutcome> {
        let (width, height) = self.surface.client_size();
        self.resize(width, height)
    }

    /// Advances orbit damping by `dt` seconds and consumes this frame's input.
    pub fn update_controls(&mut self, dt: f32) {
        self.controls
            .update(&mut self.camera.transform, &self.input, self.camera.fov, dt);
        self.input.end_frame();
    }

    /// Spins the mesh around +Y if this viewport is flagged to.
    pub fn advance_rotation(&mut self, dt: f32) {
        if !self.rotate_continuously {
            return;
        }
        self.rotation_angle = (self.rotation_angle + self.rotation_speed * dt) % std::f32::consts::TAU;
        if let Some(mesh) = &mut self.mesh {
            mesh.transform.rotation = Quat::from_rotation_y(self.rotation_angle);
        }
    }

    /// Issues exactly one draw call on the surface.
    pub fn render_once(&mut self) {
        self.camera.update_view_matrix();
        let frame = FrameView {
            viewport: &self.name,
            camera: &self.camera,
            view_matrix: self.camera.view_matrix(),
            projection_matrix: self.camera.projection_matrix(),
            mesh: self.mesh.as_ref(),
            lights: &self.lights,
        };
        self.surface.draw(&frame);
        self.draw_count += 1;
    }
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("size", &self.size)
            .field("has_mesh", &self.mesh.is_some())
            .field("draw_count", &self.draw_count)
            .finish_non_exhaustive()
    }
}
