//! Composition root
//!
//! [`Showroom`] wires the asset cache, the viewport registry, the render
//! loop and the material controller together from one [`ShowroomConfig`].
//! Hosts call [`Showroom::frame`] once per display refresh and forward UI
//! events to the remaining methods.
//!
//! ```rust,ignore
//! let config = ShowroomConfig::carpet_showroom();
//! let loader = Rc::new(FileAssetLoader::new("public"));
//! let mut showroom = Showroom::new(&config, loader, &mut surfaces)?;
//!
//! // every display refresh
//! showroom.frame();
//!
//! // UI glue
//! let outcome = showroom.apply_texture("home-canvas", 2)?;
//! ```

use std::rc::Rc;

use crate::app::surface::SurfaceProvider;
use crate::assets::{AssetCache, AssetLoader, MeshHandle, TexturePalette};
use crate::config::ShowroomConfig;
use crate::errors::{Error, Result};
use crate::material_controller::{MaterialController, MaterialOutcome};
use crate::render_loop::RenderLoop;
use crate::viewport::{ResizeReport, Viewport, ViewportId, ViewportRegistry};

pub struct Showroom {
    assets: AssetCache,
    mesh: MeshHandle,
    registry: ViewportRegistry,
    render_loop: RenderLoop,
    materials: MaterialController,
    skipped_surfaces: Vec<String>,
}

impl Showroom {
    /// Validates the table, starts every load and creates the viewports.
    ///
    /// Returns before any asset has loaded. Surfaces the provider does not
    /// know are skipped (see [`skipped_surfaces`](Self::skipped_surfaces)).
    pub fn new(
        config: &ShowroomConfig,
        loader: Rc<dyn AssetLoader>,
        surfaces: &mut dyn SurfaceProvider,
    ) -> Result<Self> {
        config.validate()?;

        let mut assets = AssetCache::from_shared(loader);
        let mesh = assets.load_mesh(&config.mesh_url);
        let palette = assets.load_texture_palette(config.palette_urls());

        let mut registry = ViewportRegistry::new();
        let report = registry.initialize(&config.viewports, surfaces);
        let skipped_surfaces = report
            .skipped
            .into_iter()
            .filter_map(|e| match e {
                Error::MissingSurface { surface_id } => Some(surface_id),
                _ => None,
            })
            .collect();

        let materials = MaterialController::new(
            palette,
            config.palette_labels(),
            &config.unknown_label,
            config.flat_color_label.clone(),
        );

        log::info!(
            "Showroom ready: {} viewports, {} palette entries",
            registry.len(),
            materials.palette().len()
        );

        Ok(Self {
            assets,
            mesh,
            registry,
            render_loop: RenderLoop::new(),
            materials,
            skipped_surfaces,
        })
    }

    /// Runs one frame of the render loop.
    pub fn frame(&mut self) {
        self.render_loop.tick(
            &mut self.registry,
            &mut self.assets,
            &self.mesh,
            self.materials.palette(),
        );
    }

    /// Call on every window resize.
    pub fn resize_all(&mut self) -> ResizeReport {
        self.registry.resize_all()
    }

    /// Call after a previously hidden section became visible, so viewports
    /// laid out while hidden pick up their real size.
    pub fn section_shown(&mut self) -> ResizeReport {
        self.registry.resize_all()
    }

    /// Applies palette texture `index` (1-based) to the named viewport.
    pub fn apply_texture(&mut self, viewport: &str, index: usize) -> Result<MaterialOutcome> {
        let target = viewport_by_name(&mut self.registry, viewport)?;
        self.materials.apply_texture(target, index)
    }

    /// Applies a flat color to the named viewport.
    pub fn apply_color(&mut self, viewport: &str, color: &str) -> Result<MaterialOutcome> {
        let target = viewport_by_name(&mut self.registry, viewport)?;
        self.materials.apply_color(target, color)
    }

    #[inline]
    pub fn registry(&self) -> &ViewportRegistry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut ViewportRegistry {
        &mut self.registry
    }

    pub fn viewport(&self, name: &str) -> Option<&Viewport> {
        self.registry.by_name(name)
    }

    pub fn viewport_id(&self, name: &str) -> Option<ViewportId> {
        self.registry.id_by_name(name)
    }

    #[inline]
    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    #[inline]
    pub fn mesh(&self) -> &MeshHandle {
        &self.mesh
    }

    #[inline]
    pub fn palette(&self) -> &TexturePalette {
        self.materials.palette()
    }

    #[inline]
    pub fn materials(&self) -> &MaterialController {
        &self.materials
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.render_loop.frame_count()
    }

    /// Configured surfaces that did not exist at startup.
    #[inline]
    pub fn skipped_surfaces(&self) -> &[String] {
        &self.skipped_surfaces
    }
}

fn viewport_by_name<'a>(registry: &'a mut ViewportRegistry, name: &str) -> Result<&'a mut Viewport> {
    registry.by_name_mut(name).ok_or_else(|| Error::MissingSurface {
        surface_id: name.to_owned(),
    })
}
