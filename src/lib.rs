//! # Vitrine
//!
//! Core of a multi-viewport 3D product viewer: one shared mesh, a palette
//! of textures, and any number of independent viewports (camera, orbit
//! controls, render surface, mesh instance) driven by a single
//! cooperative render loop.
//!
//! - [`assets`]: at-most-once asset loading ([`AssetCache`])
//! - [`viewport`]: [`Viewport`] and [`ViewportRegistry`]
//! - [`render_loop`]: per-frame driver ([`RenderLoop`])
//! - [`material_controller`]: texture / flat-color selection ([`MaterialController`])
//! - [`showroom`]: everything wired from one [`ShowroomConfig`]
//!
//! Drawing is delegated to [`RenderSurface`] implementations supplied by
//! the host.

pub mod app;
pub mod assets;
pub mod config;
pub mod errors;
pub mod material_controller;
pub mod render_loop;
pub mod resources;
pub mod scene;
pub mod showroom;
pub mod utils;
pub mod viewport;

pub use app::{FrameView, Input, PointerButton, RenderSurface, SurfaceProvider};
pub use assets::{AssetCache, AssetHandle, AssetLoader, FileAssetLoader, MeshHandle, TextureHandle, TexturePalette};
pub use config::{PaletteEntry, ShowroomConfig};
pub use errors::{AssetError, Error, Result, SelectionError};
pub use material_controller::{MaterialController, MaterialOutcome};
pub use render_loop::RenderLoop;
pub use resources::{Color, Material, MaterialSelection, MeshAsset, MeshNode, Texture};
pub use showroom::Showroom;
pub use utils::OrbitControls;
pub use viewport::{Viewport, ViewportId, ViewportRegistry, ViewportRole, ViewportSpec};
