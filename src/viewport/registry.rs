use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::app::surface::SurfaceProvider;
use crate::assets::{MeshHandle, TexturePalette};
use crate::errors::Error;
use crate::resources::material::Material;
use crate::viewport::{ResizeOutcome, Viewport, ViewportId, ViewportSpec};

/// What [`ViewportRegistry::initialize`] did.
#[derive(Debug, Default)]
pub struct InitReport {
    pub created: Vec<ViewportId>,
    /// One [`Error::MissingSurface`] per skipped spec.
    pub skipped: Vec<Error>,
}

/// What [`ViewportRegistry::resize_all`] did.
#[derive(Debug, Default)]
pub struct ResizeReport {
    pub resized: Vec<ViewportId>,
    pub unchanged: Vec<ViewportId>,
    /// One [`Error::ZeroSizeSurface`] per hidden viewport.
    pub skipped: Vec<Error>,
}

/// Mesh attachment progress, advanced by [`ViewportRegistry::attach_resolved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AttachState {
    #[default]
    Waiting,
    Attached,
    Failed,
}

/// Insertion-ordered collection of viewports.
///
/// Filled once by [`initialize`](Self::initialize); viewports are never
/// removed.
#[derive(Debug, Default)]
pub struct ViewportRegistry {
    viewports: SlotMap<ViewportId, Viewport>,
    order: Vec<ViewportId>,
    by_name: FxHashMap<String, ViewportId>,
    attach_state: AttachState,
}

impl ViewportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one viewport per spec, in order.
    ///
    /// Specs whose surface the provider cannot find are skipped and
    /// reported; the remaining viewports are unaffected.
    pub fn initialize<'a>(
        &mut self,
        specs: impl IntoIterator<Item = &'a ViewportSpec>,
        provider: &mut dyn SurfaceProvider,
    ) -> InitReport {
        let mut report = InitReport::default();

        for spec in specs {
            let Some(surface) = provider.acquire(&spec.surface_id) else {
                log::warn!("Render surface '{}' not found, viewport skipped", spec.surface_id);
                report.skipped.push(Error::MissingSurface {
                    surface_id: spec.surface_id.clone(),
                });
                continue;
            };

            let id = self
                .viewports
                .insert_with_key(|id| Viewport::create(id, spec, surface));
            self.order.push(id);
            self.by_name.insert(spec.surface_id.clone(), id);
            report.created.push(id);
        }

        report
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order.
    #[inline]
    pub fn ids(&self) -> &[ViewportId] {
        &self.order
    }

    #[inline]
    pub fn get(&self, id: ViewportId) -> Option<&Viewport> {
        self.viewports.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ViewportId) -> Option<&mut Viewport> {
        self.viewports.get_mut(id)
    }

    /// Looks a viewport up by its surface id.
    pub fn id_by_name(&self, name: &str) -> Option<ViewportId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Viewport> {
        self.id_by_name(name).and_then(|id| self.viewports.get(id))
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Viewport> {
        let id = self.id_by_name(name)?;
        self.viewports.get_mut(id)
    }

    /// Iterates viewports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Viewport> {
        self.order.iter().filter_map(|id| self.viewports.get(*id))
    }

    pub fn for_each(&self, mut f: impl FnMut(&Viewport)) {
        for viewport in self.iter() {
            f(viewport);
        }
    }

    /// Applies `f` to every viewport in insertion order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Viewport)) {
        for id in &self.order {
            if let Some(viewport) = self.viewports.get_mut(*id) {
                f(viewport);
            }
        }
    }

    /// Re-reads every surface's current size.
    ///
    /// Call on window resize and whenever a hidden section becomes visible.
    /// Hidden surfaces are skipped with their previous state intact.
    pub fn resize_all(&mut self) -> ResizeReport {
        let mut report = ResizeReport::default();
        self.for_each_mut(|viewport| match viewport.resize_to_surface() {
            Ok(ResizeOutcome::Resized { .. }) => report.resized.push(viewport.id()),
            Ok(ResizeOutcome::Unchanged) => report.unchanged.push(viewport.id()),
            Err(e) => {
                log::debug!("Resize skipped: {e}");
                report.skipped.push(e);
            }
        });
        report
    }

    /// Attaches the shared mesh to every viewport once it has resolved.
    ///
    /// Cheap to call every frame: does nothing while the mesh is pending and
    /// nothing after it has been attached. A failed load is logged once and
    /// leaves every viewport empty. Returns how many viewports were attached
    /// by this call.
    pub fn attach_resolved(&mut self, mesh: &MeshHandle, palette: &TexturePalette) -> usize {
        if self.attach_state != AttachState::Waiting {
            return 0;
        }

        if let Some(error) = mesh.error() {
            log::error!("Mesh '{}' failed to load, viewports stay empty: {error}", mesh.uri());
            self.attach_state = AttachState::Failed;
            return 0;
        }

        let Some(asset) = mesh.get() else {
            return 0;
        };

        let mut attached = 0;
        self.for_each_mut(|viewport| {
            if viewport.has_mesh() {
                return;
            }
            let material = default_material(viewport, palette);
            viewport.attach_mesh(asset.clone(), &material);
            attached += 1;
        });

        self.attach_state = AttachState::Attached;
        attached
    }

    /// Whether the shared mesh load ended in failure.
    pub fn mesh_failed(&self) -> bool {
        self.attach_state == AttachState::Failed
    }
}

fn default_material(viewport: &Viewport, palette: &TexturePalette) -> Material {
    let Some(index) = viewport.initial_texture() else {
        return Material::new();
    };
    match palette.get(index) {
        Some(texture) => Material::textured(texture.clone()),
        None => {
            log::warn!(
                "Viewport '{}': initial texture {index} outside palette of {}, using plain material",
                viewport.name(),
                palette.len()
            );
            Material::new()
        }
    }
}
