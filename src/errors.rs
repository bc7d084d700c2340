//! Error Types
//!
//! This module defines the error types used throughout the viewer core.
//!
//! # Overview
//!
//! The main error type [`Error`] covers the four runtime failure kinds the
//! viewer distinguishes, plus configuration problems:
//! - [`Error::Load`]: a mesh or texture fetch/decode failed
//! - [`Error::InvalidSelection`]: an out-of-range texture index or a malformed color
//! - [`Error::MissingSurface`]: a configured viewport has no render surface
//! - [`Error::ZeroSizeSurface`]: a resize was requested against a hidden surface
//!
//! None of the runtime kinds ever stop the render loop. They are reported in
//! return values (and logged) at the point where they occur.
//!
//! ```rust,ignore
//! use vitrine::errors::{Error, Result};
//!
//! fn pick(index: usize) -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::viewport::ViewportId;

/// Failure while fetching or decoding an asset.
///
/// Messages are stored as strings so that a failed handle can hand the
/// same error to every interested caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The asset bytes could not be read.
    #[error("Failed to read asset '{uri}': {message}")]
    Io { uri: String, message: String },

    /// The asset bytes were read but could not be decoded.
    #[error("Failed to decode asset '{uri}': {message}")]
    Decode { uri: String, message: String },

    /// HTTP response error with status code.
    #[error("HTTP error for '{uri}': status {status}")]
    Http { uri: String, status: u16 },

    /// The loading task could not be scheduled.
    #[error("Failed to schedule asset load: {0}")]
    Spawn(String),
}

/// A rejected material selection. The material is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Texture indices are 1-based and must not exceed the palette length.
    #[error("Texture index {index} is outside the palette (1..={len})")]
    TextureIndexOutOfRange { index: usize, len: usize },

    /// The color specification could not be parsed.
    #[error("Malformed color specification: '{0}'")]
    MalformedColor(String),
}

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// Mesh or texture loading failed.
    #[error(transparent)]
    Load(#[from] AssetError),

    // ========================================================================
    // Selection Errors
    // ========================================================================
    /// A texture index or color was rejected.
    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),

    // ========================================================================
    // Surface Errors
    // ========================================================================
    /// The render target of a configured viewport does not exist.
    #[error("Render surface '{surface_id}' not found")]
    MissingSurface { surface_id: String },

    /// The surface currently has no area (hidden or collapsed).
    #[error("Surface of viewport {viewport:?} has zero size ({width}x{height})")]
    ZeroSizeSurface {
        viewport: ViewportId,
        width: u32,
        height: u32,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration parsed but is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
