//! Host integration
//!
//! - [`input`]: per-viewport pointer state
//! - [`surface`]: render-surface contracts
//! - `web` (wasm32 only): browser canvases, `fetch` and `requestAnimationFrame`

pub mod input;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Input, PointerButton};
pub use surface::{FrameView, RenderSurface, SurfaceProvider};
