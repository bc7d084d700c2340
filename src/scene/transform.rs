use glam::{Affine3A, Mat3, Quat, Vec3};

/// Transform component
///
/// Position, rotation and scale (TRS) plus a pivot offset, with a cached
/// local matrix and dirty checking.
///
/// The pivot is applied first, before scale and rotation:
/// `local = T(position) * R(rotation) * S(scale) * T(pivot)`.
/// Setting `pivot = -center` therefore centers a mesh on the local origin
/// regardless of the configured scale.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub pivot: Vec3,

    local_matrix: Affine3A,

    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    last_pivot: Vec3,
    force_update: bool,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            pivot: Vec3::ZERO,

            local_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            last_pivot: Vec3::ZERO,
            force_update: true,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    /// Recomputes the local matrix if any component changed.
    /// Returns whether it did.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.pivot != self.last_pivot
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
                    * Affine3A::from_translation(self.pivot);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.last_pivot = self.pivot;
            self.force_update = false;
        }

        changed
    }

    /// Local matrix, recomputed on demand.
    pub fn matrix(&mut self) -> Affine3A {
        self.update_local_matrix();
        self.local_matrix
    }

    /// Local matrix without touching the cache.
    pub fn compute_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
            * Affine3A::from_translation(self.pivot)
    }

    /// Rotates so that -Z points at `target`.
    ///
    /// Degenerate when `target - position` is parallel to `up`; the
    /// rotation is then left unchanged.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();

        if forward.cross(up).length_squared() < 1e-4 {
            return;
        }

        let right = forward.cross(up).normalize();
        let new_up = right.cross(forward).normalize();

        let rot_mat = Mat3::from_cols(right, new_up, -forward);
        self.rotation = Quat::from_mat3(&rot_mat);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
