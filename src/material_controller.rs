//! Material selection
//!
//! The public mutation surface used by the UI glue: put a palette texture
//! or a flat color on one viewport's mesh and get back the label to show.

use crate::assets::TexturePalette;
use crate::errors::{Result, SelectionError};
use crate::resources::material::{Color, MaterialSelection};
use crate::viewport::Viewport;

/// Result of an accepted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialOutcome {
    /// The material was changed.
    Applied { label: String },
    /// The viewport has no mesh yet (still loading, or the load failed).
    /// Nothing was changed.
    NoMesh,
}

impl MaterialOutcome {
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Applied { label } => Some(label),
            Self::NoMesh => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialController {
    palette: TexturePalette,
    labels: Vec<String>,
    flat_color_label: String,
}

impl MaterialController {
    /// `labels[i]` describes palette entry `i + 1`. Missing or `None`
    /// entries fall back to `unknown_label`.
    pub fn new(
        palette: TexturePalette,
        labels: impl IntoIterator<Item = Option<String>>,
        unknown_label: &str,
        flat_color_label: impl Into<String>,
    ) -> Self {
        let mut labels: Vec<String> = labels
            .into_iter()
            .take(palette.len())
            .map(|label| label.unwrap_or_else(|| unknown_label.to_owned()))
            .collect();
        labels.resize(palette.len(), unknown_label.to_owned());

        Self {
            palette,
            labels,
            flat_color_label: flat_color_label.into(),
        }
    }

    #[inline]
    pub fn palette(&self) -> &TexturePalette {
        &self.palette
    }

    /// Label of the 1-based palette entry.
    pub fn texture_label(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }

    #[inline]
    pub fn flat_color_label(&self) -> &str {
        &self.flat_color_label
    }

    /// Puts palette texture `index` (1-based) on every paintable surface of
    /// the viewport's mesh and resets the color to white.
    ///
    /// The index is validated first: an out-of-range index is rejected even
    /// when the mesh has not attached yet.
    pub fn apply_texture(&self, viewport: &mut Viewport, index: usize) -> Result<MaterialOutcome> {
        let texture = self.palette.get(index).ok_or(SelectionError::TextureIndexOutOfRange {
            index,
            len: self.palette.len(),
        })?;

        let Some(mesh) = viewport.mesh_mut() else {
            log::debug!("Viewport '{}': texture {index} ignored, no mesh yet", viewport.name());
            return Ok(MaterialOutcome::NoMesh);
        };
        mesh.paint(|material| material.set_texture(texture.clone()));

        let label = self.texture_label(index).unwrap_or_default().to_owned();
        Ok(MaterialOutcome::Applied { label })
    }

    /// Parses `spec` (`#rgb`, `#rrggbb`, `0xrrggbb` or a color name) and puts
    /// it on the viewport's mesh, clearing any texture.
    pub fn apply_color(&self, viewport: &mut Viewport, spec: &str) -> Result<MaterialOutcome> {
        let color = Color::parse(spec)?;
        Ok(self.apply_flat_color(viewport, color))
    }

    pub fn apply_flat_color(&self, viewport: &mut Viewport, color: Color) -> MaterialOutcome {
        let Some(mesh) = viewport.mesh_mut() else {
            log::debug!("Viewport '{}': color {color} ignored, no mesh yet", viewport.name());
            return MaterialOutcome::NoMesh;
        };
        mesh.paint(|material| material.set_flat_color(color));

        MaterialOutcome::Applied {
            label: self.flat_color_label.clone(),
        }
    }

    pub fn apply(&self, viewport: &mut Viewport, selection: &MaterialSelection) -> Result<MaterialOutcome> {
        match selection {
            MaterialSelection::Texture { index } => self.apply_texture(viewport, *index),
            MaterialSelection::FlatColor(color) => Ok(self.apply_flat_color(viewport, *color)),
        }
    }
}
