use crate::assets::TextureHandle;

/// Ordered, fixed set of selectable textures.
///
/// Indices are 1-based in the public API and stable for the lifetime of
/// the palette.
#[derive(Debug, Clone, Default)]
pub struct TexturePalette {
    textures: Vec<TextureHandle>,
}

impl TexturePalette {
    pub fn new(textures: Vec<TextureHandle>) -> Self {
        Self { textures }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Entry at the 1-based `index`.
    pub fn get(&self, index: usize) -> Option<&TextureHandle> {
        index.checked_sub(1).and_then(|i| self.textures.get(i))
    }

    pub fn contains_index(&self, index: usize) -> bool {
        (1..=self.len()).contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureHandle> {
        self.textures.iter()
    }

    /// `true` once every entry has resolved (loaded or replaced by a fallback).
    pub fn is_resolved(&self) -> bool {
        self.textures.iter().all(|t| !t.is_pending())
    }
}
