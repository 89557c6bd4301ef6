//! Camera — low-level passive data container.
//!
//! The Camera computes nothing. The caller is responsible for computing
//! and setting all fields: view matrix, projection matrix, and frustum.
//!
//! The engine does NOT store or manage cameras. They are tools provided
//! by the engine, owned and driven by the caller, and handed to
//! [`crate::renderer::backend::RenderBackend::render`] once per submitted
//! frame.

use glam::Mat4;
use super::frustum::Frustum;

/// Low-level camera. A passive data container — computes nothing.
///
/// The caller is responsible for computing view/projection from
/// high-level parameters (position, rotation, FOV, etc.) and deriving
/// the frustum from the resulting view-projection matrix.
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
    frustum: Frustum,
}

impl Camera {
    /// Create a new camera from an already-computed view, projection and
    /// frustum.
    pub fn new(view: Mat4, projection: Mat4, frustum: Frustum) -> Self {
        Self { view_matrix: view, projection_matrix: projection, frustum }
    }

    /// Create a camera from view and projection alone, deriving the
    /// frustum via [`Frustum::from_view_projection`].
    pub fn from_view_projection(view: Mat4, projection: Mat4) -> Self {
        let frustum = Frustum::from_view_projection(&(projection * view));
        Self { view_matrix: view, projection_matrix: projection, frustum }
    }

    // ===== GETTERS =====

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Frustum planes for culling.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    // ===== SETTERS — store, compute nothing =====

    /// Set the view matrix. Does not recompute the frustum.
    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    /// Set the projection matrix. Does not recompute the frustum.
    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    /// Set the frustum directly.
    pub fn set_frustum(&mut self, frustum: Frustum) {
        self.frustum = frustum;
    }

    /// Recompute the frustum from the current view and projection matrices.
    pub fn refresh_frustum(&mut self) {
        self.frustum = Frustum::from_view_projection(&self.view_projection_matrix());
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
