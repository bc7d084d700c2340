use std::sync::Arc;

use glam::Vec3;

use crate::resources::geometry::{BoundingBox, MeshAsset};
use crate::resources::material::Material;
use crate::scene::transform::Transform;

/// A node of the instance that accepts a material.
#[derive(Debug, Clone)]
pub struct PaintableSurface {
    /// Index into [`MeshAsset::nodes`].
    pub node_index: usize,
    pub name: String,
    pub material: Material,
}

/// One viewport's instance of the shared mesh.
///
/// Geometry is shared by `Arc` and never touched. The instance owns its own
/// transform and one material per paintable node, so viewports can diverge
/// freely without affecting each other.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    asset: Arc<MeshAsset>,
    pub transform: Transform,
    surfaces: Vec<PaintableSurface>,
    authored_bounds: Option<BoundingBox>,
}

impl MeshInstance {
    /// Instantiates `asset` centered on the local origin.
    ///
    /// The pivot is set to the negated bounding-box center, which the
    /// transform applies before scale, so the center stays at the origin
    /// whatever scale is configured afterwards.
    pub fn new(asset: Arc<MeshAsset>, default_material: &Material) -> Self {
        let authored_bounds = asset.bounding_box();

        let mut transform = Transform::new();
        if let Some(bounds) = &authored_bounds {
            transform.pivot = -bounds.center();
        }

        let surfaces = asset
            .paintable_nodes()
            .map(|(node_index, node)| PaintableSurface {
                node_index,
                name: node.name.clone(),
                material: default_material.clone(),
            })
            .collect();

        Self {
            asset,
            transform,
            surfaces,
            authored_bounds,
        }
    }

    #[inline]
    pub fn asset(&self) -> &Arc<MeshAsset> {
        &self.asset
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.transform.scale = Vec3::splat(scale);
    }

    #[inline]
    pub fn surfaces(&self) -> &[PaintableSurface] {
        &self.surfaces
    }

    /// Applies `f` to the material of every paintable surface.
    pub fn paint(&mut self, mut f: impl FnMut(&mut Material)) {
        for surface in &mut self.surfaces {
            f(&mut surface.material);
        }
    }

    /// Bounds in the viewport's local space (after pivot, scale, rotation
    /// and position).
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let matrix = self.transform.compute_matrix();
        self.authored_bounds.map(|b| b.transform(&matrix))
    }
}
