//! A `RenderBackend` that records every call into plain Rust
//! collections instead of talking to a GPU. Used by this crate's own
//! tests and by any caller with no real backend to drive.

use rustc_hash::FxHashMap;
use crate::render_scene::RenderBundleMap;
use crate::resource::{AddressMode, DataType, FilterMode, LayoutKey, TextureFormat, AABB};
use crate::renderer::backend::{
    RenderBackend, RenderCamera, RenderGeometryHandle, RenderMaterialHandle, RenderSamplerHandle, RenderTextureHandle,
};

struct MockGeometry {
    layout: LayoutKey,
    vertex_count: usize,
    index_count: usize,
    vertices: Vec<u8>,
    indices: Vec<u8>,
    aabb: AABB,
}

struct MockTexture {
    format: TextureFormat,
    data_type: DataType,
    width: u32,
    height: u32,
    data: Vec<u8>,
    sampler: Option<RenderSamplerHandle>,
}

struct MockSampler {
    min_filter: FilterMode,
    mag_filter: FilterMode,
    address_u: AddressMode,
    address_v: AddressMode,
}

struct MockMaterial {
    buffer: Vec<u8>,
    textures: Vec<Option<RenderTextureHandle>>,
}

/// Records every create/update/destroy/render call against in-memory
/// tables a test can inspect afterward.
pub struct MockBackend {
    next_geometry_id: u32,
    next_texture_id: u32,
    next_sampler_id: u32,
    next_material_id: u32,
    geometries: FxHashMap<u32, MockGeometry>,
    textures: FxHashMap<u32, MockTexture>,
    samplers: FxHashMap<u32, MockSampler>,
    materials: FxHashMap<u32, MockMaterial>,
    destroyed_geometries: Vec<RenderGeometryHandle>,
    destroyed_textures: Vec<RenderTextureHandle>,
    destroyed_samplers: Vec<RenderSamplerHandle>,
    destroyed_materials: Vec<RenderMaterialHandle>,
    render_calls: usize,
    swap_calls: usize,
    context_initialized: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            next_geometry_id: 0,
            next_texture_id: 0,
            next_sampler_id: 0,
            next_material_id: 0,
            geometries: FxHashMap::default(),
            textures: FxHashMap::default(),
            samplers: FxHashMap::default(),
            materials: FxHashMap::default(),
            destroyed_geometries: Vec::new(),
            destroyed_textures: Vec::new(),
            destroyed_samplers: Vec::new(),
            destroyed_materials: Vec::new(),
            render_calls: 0,
            swap_calls: 0,
            context_initialized: false,
        }
    }

    pub fn render_geometry_vertex_count(&self, handle: RenderGeometryHandle) -> usize {
        self.geometries.get(&handle.0).map_or(0, |g| g.vertex_count)
    }

    pub fn render_geometry_aabb(&self, handle: RenderGeometryHandle) -> Option<AABB> {
        self.geometries.get(&handle.0).map(|g| g.aabb)
    }

    pub fn is_render_geometry_destroyed(&self, handle: RenderGeometryHandle) -> bool {
        self.destroyed_geometries.contains(&handle)
    }

    pub fn render_texture_size(&self, handle: RenderTextureHandle) -> (u32, u32) {
        self.textures.get(&handle.0).map_or((0, 0), |t| (t.width, t.height))
    }

    pub fn is_render_texture_destroyed(&self, handle: RenderTextureHandle) -> bool {
        self.destroyed_textures.contains(&handle)
    }

    pub fn is_render_sampler_destroyed(&self, handle: RenderSamplerHandle) -> bool {
        self.destroyed_samplers.contains(&handle)
    }

    pub fn render_material_buffer(&self, handle: RenderMaterialHandle) -> Option<&[u8]> {
        self.materials.get(&handle.0).map(|m| m.buffer.as_slice())
    }

    pub fn is_render_material_destroyed(&self, handle: RenderMaterialHandle) -> bool {
        self.destroyed_materials.contains(&handle)
    }

    pub fn render_call_count(&self) -> usize {
        self.render_calls
    }

    pub fn swap_buffer_count(&self) -> usize {
        self.swap_calls
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for MockBackend {
    fn initialize_context(&mut self) {
        self.context_initialized = true;
    }

    fn destroy_context(&mut self) {
        self.context_initialized = false;
    }

    fn create_render_geometry(&mut self, layout: LayoutKey, n_vertices: usize, n_indices: usize) -> RenderGeometryHandle {
        let id = self.next_geometry_id;
        self.next_geometry_id += 1;
        self.geometries.insert(id, MockGeometry {
            layout,
            vertex_count: n_vertices,
            index_count: n_indices,
            vertices: Vec::new(),
            indices: Vec::new(),
            aabb: AABB::EMPTY,
        });
        RenderGeometryHandle(id)
    }

    fn update_render_geometry_vertices(&mut self, handle: RenderGeometryHandle, data: &[u8]) {
        if let Some(geometry) = self.geometries.get_mut(&handle.0) {
            geometry.vertices = data.to_vec();
        }
    }

    fn update_render_geometry_indices(&mut self, handle: RenderGeometryHandle, data: &[u8]) {
        if let Some(geometry) = self.geometries.get_mut(&handle.0) {
            geometry.indices = data.to_vec();
        }
    }

    fn update_render_geometry_aabb(&mut self, handle: RenderGeometryHandle, aabb: AABB) {
        if let Some(geometry) = self.geometries.get_mut(&handle.0) {
            geometry.aabb = aabb;
        }
    }

    fn destroy_render_geometry(&mut self, handle: RenderGeometryHandle) {
        self.geometries.remove(&handle.0);
        self.destroyed_geometries.push(handle);
    }

    fn create_render_texture(&mut self, format: TextureFormat, data_type: DataType, width: u32, height: u32) -> RenderTextureHandle {
        let id = self.next_texture_id;
        self.next_texture_id += 1;
        self.textures.insert(id, MockTexture { format, data_type, width, height, data: Vec::new(), sampler: None });
        RenderTextureHandle(id)
    }

    fn update_render_texture_data(&mut self, handle: RenderTextureHandle, data: &[u8]) {
        if let Some(texture) = self.textures.get_mut(&handle.0) {
            texture.data = data.to_vec();
        }
    }

    fn destroy_render_texture(&mut self, handle: RenderTextureHandle) {
        self.textures.remove(&handle.0);
        self.destroyed_textures.push(handle);
    }

    fn bind_render_texture_sampler(&mut self, handle: RenderTextureHandle, sampler: Option<RenderSamplerHandle>) {
        if let Some(texture) = self.textures.get_mut(&handle.0) {
            texture.sampler = sampler;
        }
    }

    fn create_render_sampler(&mut self, min_filter: FilterMode, mag_filter: FilterMode, address_u: AddressMode, address_v: AddressMode) -> RenderSamplerHandle {
        let id = self.next_sampler_id;
        self.next_sampler_id += 1;
        self.samplers.insert(id, MockSampler { min_filter, mag_filter, address_u, address_v });
        RenderSamplerHandle(id)
    }

    fn destroy_render_sampler(&mut self, handle: RenderSamplerHandle) {
        self.samplers.remove(&handle.0);
        self.destroyed_samplers.push(handle);
    }

    fn create_render_material(&mut self, buffer_size: usize) -> RenderMaterialHandle {
        let id = self.next_material_id;
        self.next_material_id += 1;
        self.materials.insert(id, MockMaterial { buffer: vec![0u8; buffer_size], textures: Vec::new() });
        RenderMaterialHandle(id)
    }

    fn update_render_material(&mut self, handle: RenderMaterialHandle, uniform_buffer: &[u8], textures: &[Option<RenderTextureHandle>]) {
        if let Some(material) = self.materials.get_mut(&handle.0) {
            material.buffer = uniform_buffer.to_vec();
            material.textures = textures.to_vec();
        }
    }

    fn destroy_render_material(&mut self, handle: RenderMaterialHandle) {
        self.materials.remove(&handle.0);
        self.destroyed_materials.push(handle);
    }

    fn render(&mut self, _camera: &RenderCamera, _bundles: &RenderBundleMap) {
        self.render_calls += 1;
    }

    fn swap_buffers(&mut self) {
        self.swap_calls += 1;
    }
}

#[cfg(test)]
#[path = "mock_backend_tests.rs"]
mod tests;
