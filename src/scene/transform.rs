//! A node's local TRS plus cached local/world matrices (§3.5).

use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    local: Mat4,
    world: Mat4,
}

impl Transform {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    pub fn local(&self) -> Mat4 {
        self.local
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// Recompute `local` from position/rotation/scale.
    pub fn update_local(&mut self) {
        self.local = Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position);
    }

    /// Recompute `world` as `parent_world * local`.
    pub fn update_world(&mut self, parent_world: Option<Mat4>) {
        self.world = match parent_world {
            Some(parent_world) => parent_world * self.local,
            None => self.local,
        };
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
        }
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
