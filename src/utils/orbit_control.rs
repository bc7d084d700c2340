use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::app::input::{Input, PointerButton};
use crate::scene::transform::Transform;

/// Orbit-control settings of one viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 1.0,
            max_distance: 1000.0,
        }
    }
}

/// Damped orbit around a target point.
///
/// The camera sits on a sphere of `radius` around `center`, with `theta`
/// the azimuth around +Y and `phi` the polar angle from +Y.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    rotate_delta: Vec2,
}

const POLE_EPS: f32 = 0.0001;

impl OrbitControls {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: true,
            min_distance: 1.0,
            max_distance: 1000.0,

            center,
            radius,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,

            rotate_delta: Vec2::ZERO,
        }
    }

    /// Orbit that starts exactly at `position`, looking at `target`.
    pub fn from_camera(position: Vec3, target: Vec3, config: &ControlConfig) -> Self {
        let offset = position - target;
        let radius = offset.length();

        let mut controls = Self::new(target, radius);
        if radius > f32::EPSILON {
            controls.theta = offset.x.atan2(offset.z);
            controls.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        }
        controls.configure(config);
        controls
    }

    /// Applies `config`. Unusable bounds fall back to an unbounded range so
    /// that `update` can always clamp.
    pub fn configure(&mut self, config: &ControlConfig) {
        let defaults = ControlConfig::default();

        self.enable_damping = config.enable_damping;
        self.damping_factor = if config.damping_factor.is_nan() {
            defaults.damping_factor
        } else {
            config.damping_factor.clamp(0.0, 1.0)
        };

        let min = if config.min_distance.is_finite() {
            config.min_distance.max(0.0)
        } else {
            0.0
        };
        let max = if config.max_distance.is_nan() {
            f32::INFINITY
        } else {
            config.max_distance
        };
        self.min_distance = min;
        self.max_distance = max.max(min);
    }

    /// Rotation still to be applied by damping.
    pub fn pending_rotation(&self) -> Vec2 {
        self.rotate_delta
    }

    /// Advances one frame and writes the camera pose into `transform`.
    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_radians: f32, dt: f32) {
        let screen_height = input.screen_size.y.max(1.0);

        if input.is_button_pressed(PointerButton::Primary) {
            let rotate_per_pixel = 2.0 * std::f32::consts::PI / screen_height;
            self.rotate_delta -= input.cursor_delta * rotate_per_pixel * self.rotate_speed;
        }

        if self.enable_damping {
            // Frame-rate independent: the same fraction is retained per 1/60 s.
            let retention = (1.0 - self.damping_factor).powf(dt * 60.0);
            let delta_apply = self.rotate_delta * (1.0 - retention);

            self.theta += delta_apply.x;
            self.phi += delta_apply.y;
            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        self.phi = self.phi.clamp(POLE_EPS, std::f32::consts::PI - POLE_EPS);

        if input.scroll_delta.y != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(input.scroll_delta.y.abs());
            if input.scroll_delta.y > 0.0 {
                self.radius *= scale;
            } else {
                self.radius /= scale;
            }
        }
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);

        if input.is_button_pressed(PointerButton::Secondary) {
            let target_world_height = 2.0 * self.radius * (fov_radians / 2.0).tan();
            let pixels_to_world = target_world_height / screen_height;

            let forward = -self.direction();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();

            self.center += (right * -input.cursor_delta.x + up * input.cursor_delta.y)
                * pixels_to_world
                * self.pan_speed;
        }

        transform.position = self.center + self.direction() * self.radius;
        transform.look_at(self.center, Vec3::Y);
    }

    fn direction(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }
}
