use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::resources::material::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// 0xRRGGBB
    pub color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 2.0,
            position: [2.0, 2.0, 2.0],
        }
    }
}

impl DirectionalLight {
    pub fn color(&self) -> Color {
        Color::from_hex(self.color)
    }

    /// Direction the light travels, towards the origin.
    pub fn direction(&self) -> Vec3 {
        (-Vec3::from(self.position)).normalize_or_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: u32,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn white(intensity: f32) -> Self {
        Self {
            color: 0xffffff,
            intensity,
        }
    }

    pub fn color(&self) -> Color {
        Color::from_hex(self.color)
    }
}

/// Lights of one viewport's scene. Viewports never share light state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRig {
    pub directional: Option<DirectionalLight>,
    pub ambient: Option<AmbientLight>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            directional: Some(DirectionalLight::default()),
            ambient: None,
        }
    }
}

impl LightRig {
    #[must_use]
    pub fn with_ambient(mut self, intensity: f32) -> Self {
        self.ambient = Some(AmbientLight::white(intensity));
        self
    }
}
