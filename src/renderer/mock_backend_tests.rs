use glam::{Mat4, Vec4};
use crate::resource::{AddressMode, DataType, FilterMode, LayoutKey, TextureFormat, AABB};
use crate::render_scene::RenderBundleMap;
use super::*;

#[test]
fn create_and_destroy_geometry_round_trips() {
    let mut backend = MockBackend::new();
    let handle = backend.create_render_geometry(LayoutKey::POSITION, 3, 0);
    backend.update_render_geometry_vertices(handle, &[1, 2, 3]);
    assert_eq!(backend.render_geometry_vertex_count(handle), 3);
    backend.destroy_render_geometry(handle);
    assert!(backend.is_render_geometry_destroyed(handle));
}

#[test]
fn texture_and_sampler_binding_round_trips() {
    let mut backend = MockBackend::new();
    let sampler = backend.create_render_sampler(FilterMode::Linear, FilterMode::Linear, AddressMode::Repeat, AddressMode::Repeat);
    let texture = backend.create_render_texture(TextureFormat::Rgba8, DataType::U8, 4, 4);
    backend.bind_render_texture_sampler(texture, Some(sampler));
    assert_eq!(backend.render_texture_size(texture), (4, 4));
}

#[test]
fn material_buffer_updates_are_visible() {
    let mut backend = MockBackend::new();
    let handle = backend.create_render_material(8);
    backend.update_render_material(handle, &[1, 2, 3, 4, 5, 6, 7, 8], &[]);
    assert_eq!(backend.render_material_buffer(handle), Some(&[1, 2, 3, 4, 5, 6, 7, 8][..]));
}

#[test]
fn render_and_swap_buffers_count_calls() {
    let mut backend = MockBackend::new();
    let camera = RenderCamera { projection: Mat4::IDENTITY, view: Mat4::IDENTITY, frustum_planes: [Vec4::ZERO; 6] };
    let bundles: RenderBundleMap = RenderBundleMap::default();
    backend.render(&camera, &bundles);
    backend.swap_buffers();
    assert_eq!(backend.render_call_count(), 1);
    assert_eq!(backend.swap_buffer_count(), 1);
}
