//! Mesh geometry shared by every viewport.
//!
//! A [`MeshAsset`] is produced once by the asset loader and then shared by
//! `Arc` across all viewports. It is never mutated after load: per-viewport
//! customization happens on [`MeshInstance`](crate::scene::MeshInstance)
//! transforms and materials only.

use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Smallest box containing every point, `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bbox = Self { min: first, max: first };
        for p in points {
            bbox.min = bbox.min.min(p);
            bbox.max = bbox.max.max(p);
        }
        Some(bbox)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut new_min = Vec3::splat(f32::INFINITY);
        let mut new_max = Vec3::splat(f32::NEG_INFINITY);

        for point in corners {
            let transformed = matrix.transform_point3(point);
            new_min = new_min.min(transformed);
            new_max = new_max.max(transformed);
        }

        Self { min: new_min, max: new_max }
    }
}

/// What a node of a loaded mesh is able to do.
///
/// Only [`NodeKind::Mesh`] nodes carry a surface that accepts materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Mesh,
    Group,
    Line,
    Points,
}

impl NodeKind {
    #[inline]
    #[must_use]
    pub fn is_paintable(self) -> bool {
        matches!(self, NodeKind::Mesh)
    }
}

/// One node of a loaded mesh, in the asset's authored coordinate space.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshNode {
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
    #[serde(default)]
    pub indices: Vec<u32>,
}

impl MeshNode {
    pub fn mesh(name: impl Into<String>, positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Mesh,
            positions,
            uvs: Vec::new(),
            indices,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Group,
            ..Default::default()
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions.iter().copied().map(Vec3::from))
    }
}

/// Immutable, load-once geometry description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshAsset {
    #[serde(skip, default = "Uuid::new_v4")]
    pub uuid: Uuid,
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<MeshNode>,
}

impl MeshAsset {
    pub fn new(name: impl Into<String>, nodes: Vec<MeshNode>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            nodes,
        }
    }

    /// Axis-aligned bounds over every node that has vertices.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.nodes
            .iter()
            .filter_map(MeshNode::bounding_box)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Indices of the nodes that accept a material.
    pub fn paintable_nodes(&self) -> impl Iterator<Item = (usize, &MeshNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.kind.is_paintable())
    }
}
