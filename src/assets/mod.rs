//! Asset loading and caching
//!
//! - [`AssetHandle`]: shared handle to a load that may still be pending
//! - [`AssetLoader`]: the mesh/texture loading collaborator
//! - [`AssetCache`]: at-most-once loading per URI
//! - [`TexturePalette`]: the fixed, ordered set of selectable textures

pub mod cache;
pub mod handle;
pub mod io;
pub mod palette;

pub use cache::AssetCache;
pub use handle::{AssetHandle, LoadState};
pub use io::{AssetLoader, FileAssetLoader, JsonMeshDecoder, MeshDecoder};
pub use palette::TexturePalette;

use crate::resources::geometry::MeshAsset;
use crate::resources::texture::Texture;

pub type MeshHandle = AssetHandle<MeshAsset>;
pub type TextureHandle = AssetHandle<Texture>;
