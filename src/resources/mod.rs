//! Core resource definitions
//!
//! CPU-side data shared or owned by viewports, independent of any GPU backend:
//! - [`MeshAsset`]: load-once geometry, shared by `Arc`
//! - [`Texture`]: decoded palette image
//! - [`Material`]: per-surface texture/color state
//! - [`ChangeTracker`]: dirty counter driving re-upload

pub mod geometry;
pub mod material;
pub mod texture;
pub mod version_tracker;

pub use geometry::{BoundingBox, MeshAsset, MeshNode, NodeKind};
pub use material::{Color, Material, MaterialSelection};
pub use texture::Texture;
pub use version_tracker::ChangeTracker;
