use uuid::Uuid;

use crate::errors::AssetError;

/// A decoded 2D image, stored as tightly packed RGBA8 on the CPU side.
///
/// GPU upload is the render surface's business; the core only keeps the
/// pixel data and the metadata needed to describe it.
#[derive(Debug, Clone)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// Set when this texture stands in for one that failed to load.
    pub is_fallback: bool,
}

impl Texture {
    pub fn from_rgba8(name: impl Into<String>, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            width,
            height,
            data,
            is_fallback: false,
        }
    }

    /// 1x1 opaque white texture. Multiplies through to the material color
    /// unchanged, so a broken palette entry renders as a neutral surface.
    pub fn blank(name: impl Into<String>) -> Self {
        Self {
            is_fallback: true,
            ..Self::from_rgba8(name, 1, 1, vec![255; 4])
        }
    }

    /// CPU image decoding (PNG/JPEG).
    pub fn decode(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        use image::GenericImageView;

        let img = image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
            uri: name.to_string(),
            message: e.to_string(),
        })?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        Ok(Self::from_rgba8(name, width, height, rgba.into_vec()))
    }
}
