//! Frustum — six clipping planes used for visibility culling.
//!
//! Each plane is a `Vec4` `(A, B, C, D)` where `(A, B, C)` is the
//! inward-pointing normal and `D` is the signed distance; a point `P` is
//! inside the frustum if `dot(plane, P_homogeneous) >= 0` for all six
//! planes.

use glam::{Mat4, Vec3, Vec4};
use crate::resource::geometry::AABB;

/// Frustum plane indices.
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes, packed in a layout consumable by std430/std140 UBOs.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Planes: left, right, bottom, top, near, far.
    pub planes: [Vec4; 6],
}

/// A plane as `(A, B, C, D)` is unit-length only once its normal is; both
/// the extraction below and the AABB test rely on that.
fn normalize_plane(plane: Vec4) -> Vec4 {
    let normal_length = plane.truncate().length();
    if normal_length > f32::EPSILON {
        plane / normal_length
    } else {
        plane
    }
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix via the
    /// Gribb & Hartmann method. Works for perspective and orthographic
    /// projections alike: each plane is the sum or difference of the
    /// matrix's last row and one of its first three rows.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let columns = vp.to_cols_array_2d();
        let row = |r: usize| Vec4::new(columns[0][r], columns[1][r], columns[2][r], columns[3][r]);
        let w_row = row(3);

        let planes = [PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR].map(|plane_index| {
            let axis_row = row(plane_index / 2);
            let raw = if plane_index % 2 == 0 { w_row + axis_row } else { w_row - axis_row };
            normalize_plane(raw)
        });

        Self { planes }
    }

    /// Positive-vertex AABB test: conservative, never a false negative.
    ///
    /// This is the host-side equivalent of the per-invocation test the
    /// draw-list builder compute pass performs on the GPU (one invocation
    /// per render bundle item, testing the transformed AABB against all
    /// six planes). For each plane, picks whichever AABB corner lies
    /// furthest along the plane's normal and rejects if even that corner
    /// falls behind the plane.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.planes.iter().all(|plane| {
            let normal = plane.truncate();
            let furthest_corner = Vec3::select(normal.cmpge(Vec3::ZERO), aabb.max, aabb.min);
            normal.dot(furthest_corner) + plane.w >= 0.0
        })
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
