//! Showroom configuration
//!
//! The whole deployment is one static table: the mesh, the texture palette
//! with its labels, and one [`ViewportSpec`] per render surface. It can be
//! loaded from JSON or taken from [`ShowroomConfig::carpet_showroom`].

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::scene::LightRig;
use crate::viewport::{CameraConfig, ControlConfig, ViewportRole, ViewportSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub url: String,
    /// Description shown when this texture is selected.
    #[serde(default)]
    pub label: Option<String>,
}

impl PaletteEntry {
    pub fn new(url: impl Into<String>, label: Option<&str>) -> Self {
        Self {
            url: url.into(),
            label: label.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowroomConfig {
    pub mesh_url: String,
    pub palette: Vec<PaletteEntry>,
    /// Label of palette entries without one.
    pub unknown_label: String,
    /// Label shown for any flat color.
    pub flat_color_label: String,
    pub viewports: Vec<ViewportSpec>,
}

impl Default for ShowroomConfig {
    fn default() -> Self {
        Self {
            mesh_url: String::new(),
            palette: Vec::new(),
            unknown_label: "Unknown Carpet".to_owned(),
            flat_color_label: String::new(),
            viewports: Vec::new(),
        }
    }
}

const CARPET_LABELS: [&str; 3] = [
    "Carpet 1: Dimensions: 1.50 x 2.20 m, Material: Polyester",
    "Carpet 2: Dimensions: 2.00 x 3.00 m, Material: Cotton",
    "Carpet 3: Dimensions: 1.75 x 2.50 m, Material: Wool",
];

const GALLERY_SURFACES: [&str; 4] = ["carpetCanvas1", "carpetCanvas2", "carpetCanvas3", "carpetCanvas4"];

impl ShowroomConfig {
    /// Parses and validates a JSON table.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The carpet showroom: one hero view and a grid of four product tiles.
    pub fn carpet_showroom() -> Self {
        let palette = vec![
            PaletteEntry::new("./assets/Doormate_metallicRoughness.png", Some(CARPET_LABELS[0])),
            PaletteEntry::new("./assets/Doormate_baseColor.png", Some(CARPET_LABELS[1])),
            PaletteEntry::new("./assets/Doormate_normal.png", Some(CARPET_LABELS[2])),
            PaletteEntry::new("./assets/Carpet4.png", None),
        ];

        let home = ViewportSpec {
            surface_id: "home-canvas".to_owned(),
            role: ViewportRole::Primary,
            camera: CameraConfig {
                fov_degrees: 75.0,
                near: 0.1,
                far: 1000.0,
                position: [0.0, 3.0, 10.0],
                target: [0.0, 0.0, 0.0],
            },
            controls: ControlConfig {
                enable_damping: true,
                damping_factor: 0.05,
                min_distance: 70.0,
                max_distance: 100.0,
            },
            scale: 3.0,
            initial_texture: Some(1),
            lights: LightRig::default(),
            ..ViewportSpec::default()
        };

        let mut viewports = vec![home];
        for (i, surface_id) in GALLERY_SURFACES.iter().enumerate() {
            let texture = i + 1;
            viewports.push(ViewportSpec {
                surface_id: (*surface_id).to_owned(),
                role: ViewportRole::Gallery,
                camera: CameraConfig {
                    fov_degrees: 60.0,
                    near: 0.1,
                    far: 1000.0,
                    position: [0.0, 0.0, 5.0],
                    target: [0.0, 0.0, 0.0],
                },
                controls: ControlConfig {
                    enable_damping: true,
                    damping_factor: 0.05,
                    min_distance: 1.5,
                    max_distance: 6.0,
                },
                scale: 1.0,
                initial_texture: Some(if texture <= palette.len() { texture } else { 1 }),
                lights: LightRig::default().with_ambient(0.2),
                ..ViewportSpec::default()
            });
        }

        Self {
            mesh_url: "./assets/Doormate.json".to_owned(),
            palette,
            unknown_label: "Unknown Carpet".to_owned(),
            flat_color_label: "Red Carpet: Dimensions: 1.60 x 2.30 m, Material: Polyester (Red Finish)"
                .to_owned(),
            viewports,
        }
    }

    pub fn palette_urls(&self) -> impl Iterator<Item = &str> {
        self.palette.iter().map(|entry| entry.url.as_str())
    }

    pub fn palette_labels(&self) -> impl Iterator<Item = Option<String>> + '_ {
        self.palette.iter().map(|entry| entry.label.clone())
    }

    /// Rejects tables that cannot produce a working showroom.
    pub fn validate(&self) -> Result<()> {
        if self.mesh_url.is_empty() {
            return Err(invalid("mesh_url is empty"));
        }
        if self.palette.is_empty() {
            return Err(invalid("palette is empty"));
        }

        let mut seen = FxHashSet::default();
        for spec in &self.viewports {
            let id = spec.surface_id.as_str();
            if id.is_empty() {
                return Err(invalid("viewport without surface_id"));
            }
            if !seen.insert(id) {
                return Err(invalid(format!("duplicate surface_id '{id}'")));
            }
            if let Some(index) = spec.initial_texture {
                if !(1..=self.palette.len()).contains(&index) {
                    return Err(invalid(format!(
                        "'{id}': initial_texture {index} outside 1..={}",
                        self.palette.len()
                    )));
                }
            }

            let camera = &spec.camera;
            if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
                return Err(invalid(format!("'{id}': fov {} out of range", camera.fov_degrees)));
            }
            if !(camera.near > 0.0 && camera.near < camera.far) {
                return Err(invalid(format!(
                    "'{id}': near {} must be positive and below far {}",
                    camera.near, camera.far
                )));
            }

            let controls = &spec.controls;
            for (field, distance) in [
                ("min_distance", controls.min_distance),
                ("max_distance", controls.max_distance),
            ] {
                if !(distance.is_finite() && distance >= 0.0) {
                    return Err(invalid(format!(
                        "'{id}': {field} {distance} must be finite and non-negative"
                    )));
                }
            }
            if !(0.0..=1.0).contains(&controls.damping_factor) {
                return Err(invalid(format!(
                    "'{id}': damping_factor {} outside 0..=1",
                    controls.damping_factor
                )));
            }
            if controls.min_distance > controls.max_distance {
                return Err(invalid(format!(
                    "'{id}': min_distance {} exceeds max_distance {}",
                    controls.min_distance, controls.max_distance
                )));
            }
            if !(spec.scale.is_finite() && spec.scale > 0.0) {
                return Err(invalid(format!("'{id}': scale must be positive")));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfig(message.into())
}
