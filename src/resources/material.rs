//! Surface appearance of a mesh instance.
//!
//! A [`Material`] is either textured (a palette texture rendered unmodified
//! under a white color) or flat-colored (no texture). The two states are
//! mutually exclusive and the only way to change them is through
//! [`Material::set_texture`] and [`Material::set_flat_color`], so a
//! material can never carry an active map together with a tint.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::assets::TextureHandle;
use crate::errors::SelectionError;
use crate::resources::version_tracker::ChangeTracker;

/// RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Color {
    pub const WHITE: Color = Color(Vec3::ONE);
    pub const BLACK: Color = Color(Vec3::ZERO);

    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self(Vec3::new(r, g, b))
    }

    #[must_use]
    pub fn to_hex(self) -> u32 {
        let c = (self.0.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        ((c.x as u32) << 16) | ((c.y as u32) << 8) | c.z as u32
    }

    /// Parses `#rgb`, `#rrggbb`, `0xrrggbb` or a CSS color name.
    pub fn parse(spec: &str) -> Result<Self, SelectionError> {
        let malformed = || SelectionError::MalformedColor(spec.to_string());
        let trimmed = spec.trim();

        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"));

        let Some(digits) = digits else {
            return named_color(trimmed).map(Self::from_hex).ok_or_else(malformed);
        };

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }

        match digits.len() {
            6 => u32::from_str_radix(digits, 16)
                .map(Self::from_hex)
                .map_err(|_| malformed()),
            // #rgb shorthand; 0x prefixed values must spell out all six digits
            3 if trimmed.starts_with('#') => {
                let short = u32::from_str_radix(digits, 16).map_err(|_| malformed())?;
                let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                Ok(Self::from_hex((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
            }
            _ => Err(malformed()),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

fn named_color(name: &str) -> Option<u32> {
    let hex = match name.to_ascii_lowercase().as_str() {
        "white" => 0xffffff,
        "black" => 0x000000,
        "red" => 0xff0000,
        "green" => 0x008000,
        "blue" => 0x0000ff,
        "yellow" => 0xffff00,
        "gray" | "grey" => 0x808080,
        "orange" => 0xffa500,
        "purple" => 0x800080,
        "brown" => 0xa52a2a,
        "beige" => 0xf5f5dc,
        _ => return None,
    };
    Some(hex)
}

/// A requested material change. Transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSelection {
    /// 1-based palette index.
    Texture { index: usize },
    FlatColor(Color),
}

#[derive(Debug, Clone, Default)]
pub struct Material {
    map: Option<TextureHandle>,
    color: Color,
    tracker: ChangeTracker,
}

impl Material {
    /// Untextured white material.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn textured(map: TextureHandle) -> Self {
        Self {
            map: Some(map),
            color: Color::WHITE,
            tracker: ChangeTracker::new(),
        }
    }

    #[inline]
    pub fn map(&self) -> Option<&TextureHandle> {
        self.map.as_ref()
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Bumped on every mutation; renderers re-upload when it moves.
    #[inline]
    pub fn version(&self) -> u64 {
        self.tracker.version()
    }

    #[inline]
    pub fn has_active_map(&self) -> bool {
        self.map.is_some()
    }

    /// Texture replaces any color override; the color goes back to white.
    pub fn set_texture(&mut self, map: TextureHandle) {
        self.map = Some(map);
        self.color = Color::WHITE;
        self.tracker.changed();
    }

    /// Flat color replaces any texture.
    pub fn set_flat_color(&mut self, color: Color) {
        self.map = None;
        self.color = color;
        self.tracker.changed();
    }
}
