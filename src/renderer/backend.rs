//! The abstract render-backend contract (§4.6): every operation a
//! concrete GPU backend must provide, called only from the render
//! thread. [`crate::renderer::MockBackend`] is the reference
//! implementation used by this crate's own tests and by callers that
//! have no real GPU to drive.

use glam::{Mat4, Vec3, Vec4};
use crate::render_scene::RenderBundleMap;
use crate::resource::{AddressMode, DataType, FilterMode, LayoutKey, TextureFormat, AABB};

/// Opaque render-thread-owned handle to an uploaded geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderGeometryHandle(pub u32);

/// Opaque render-thread-owned handle to an uploaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTextureHandle(pub u32);

/// Opaque render-thread-owned handle to an uploaded sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderSamplerHandle(pub u32);

/// Opaque render-thread-owned handle to an uploaded material's
/// parameter buffer and bound texture set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderMaterialHandle(pub u32);

/// Per-frame camera, packed in a layout consumable by a std430/std140
/// shader UBO: `mat4 projection; mat4 view; vec4 frustum_planes[6];`.
#[derive(Debug, Clone, Copy)]
pub struct RenderCamera {
    pub projection: Mat4,
    pub view: Mat4,
    pub frustum_planes: [Vec4; 6],
}

/// `(draw_command_index, render_bundle_item_index)` pairs the
/// draw-list builder pass would have written to an indirect-draw
/// buffer, produced here by an ordinary host-side loop (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawListRecord {
    pub bundle_item_index: usize,
}

/// Contract every concrete GPU backend implements. Every method here
/// is called from the render thread only.
pub trait RenderBackend: Send {
    fn initialize_context(&mut self);
    fn destroy_context(&mut self);

    fn create_render_geometry(&mut self, layout: LayoutKey, n_vertices: usize, n_indices: usize) -> RenderGeometryHandle;
    fn update_render_geometry_vertices(&mut self, handle: RenderGeometryHandle, data: &[u8]);
    fn update_render_geometry_indices(&mut self, handle: RenderGeometryHandle, data: &[u8]);
    fn update_render_geometry_aabb(&mut self, handle: RenderGeometryHandle, aabb: AABB);
    fn destroy_render_geometry(&mut self, handle: RenderGeometryHandle);

    fn create_render_texture(&mut self, format: TextureFormat, data_type: DataType, width: u32, height: u32) -> RenderTextureHandle;
    fn update_render_texture_data(&mut self, handle: RenderTextureHandle, data: &[u8]);
    fn destroy_render_texture(&mut self, handle: RenderTextureHandle);
    fn bind_render_texture_sampler(&mut self, handle: RenderTextureHandle, sampler: Option<RenderSamplerHandle>);

    fn create_render_sampler(&mut self, min_filter: FilterMode, mag_filter: FilterMode, address_u: AddressMode, address_v: AddressMode) -> RenderSamplerHandle;
    fn destroy_render_sampler(&mut self, handle: RenderSamplerHandle);

    fn create_render_material(&mut self, buffer_size: usize) -> RenderMaterialHandle;
    fn update_render_material(&mut self, handle: RenderMaterialHandle, uniform_buffer: &[u8], textures: &[Option<RenderTextureHandle>]);
    fn destroy_render_material(&mut self, handle: RenderMaterialHandle);

    /// Pack each bundle, run the host-side equivalent of the
    /// draw-list-builder compute pass (frustum cull + positive-vertex
    /// AABB test), and issue the resulting indirect multi-draws.
    fn render(&mut self, camera: &RenderCamera, bundles: &RenderBundleMap);

    /// Present. Must acquire the next swapchain image on entry of the
    /// following frame.
    fn swap_buffers(&mut self);
}

fn aabb_corners(aabb: &AABB) -> [Vec3; 8] {
    [
        Vec3::new(aabb.min.x, aabb.min.y, aabb.min.z),
        Vec3::new(aabb.max.x, aabb.min.y, aabb.min.z),
        Vec3::new(aabb.min.x, aabb.max.y, aabb.min.z),
        Vec3::new(aabb.max.x, aabb.max.y, aabb.min.z),
        Vec3::new(aabb.min.x, aabb.min.y, aabb.max.z),
        Vec3::new(aabb.max.x, aabb.min.y, aabb.max.z),
        Vec3::new(aabb.min.x, aabb.max.y, aabb.max.z),
        Vec3::new(aabb.max.x, aabb.max.y, aabb.max.z),
    ]
}

/// Per-bundle-item AABB-vs-frustum test, performed as an ordinary
/// host-side loop rather than a GPU compute dispatch (§4.6): this is
/// the CPU-observable half of the draw-list-builder pass every
/// concrete backend's `render` implementation can reuse. `items`
/// yields `(bundle_item_index, local_to_world, local_space_aabb)`.
pub fn build_draw_list(
    camera: &RenderCamera,
    items: impl Iterator<Item = (usize, Mat4, AABB)>,
) -> Vec<DrawListRecord> {
    let frustum = crate::camera::Frustum { planes: camera.frustum_planes };
    items
        .filter_map(|(index, local_to_world, aabb)| {
            let view_local = camera.view * local_to_world;
            let transformed = AABB::from_points(aabb_corners(&aabb).into_iter().map(|c| view_local.transform_point3(c)));
            frustum.intersects_aabb(&transformed).then_some(DrawListRecord { bundle_item_index: index })
        })
        .collect()
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
