use std::sync::{Arc, Mutex};
use crate::glsl::VariableList;
use crate::resource::{BufferLayoutKind, ColorSpace, DataType, Material, MaterialShader, Texture, TextureFormat};
use crate::cache::texture_cache::TextureCache;
use crate::renderer::MockBackend;
use super::*;

fn unlit_shader() -> Arc<MaterialShader> {
    let mut variables = VariableList::new();
    variables.add::<f32>("opacity");
    Arc::new(MaterialShader::new(BufferLayoutKind::Std140, &variables, vec!["albedo".to_string()]))
}

fn checker() -> Arc<Texture> {
    Arc::new(Texture::new_2d(TextureFormat::Rgba8, DataType::U8, ColorSpace::Srgb, 1, 1, vec![255, 255, 255, 255], None))
}

#[test]
fn acquiring_material_acquires_its_bound_textures() {
    let texture_cache = Arc::new(Mutex::new(TextureCache::new()));
    let material_cache = Arc::new(Mutex::new(MaterialCache::new(texture_cache.clone())));

    let mut material = Material::new(unlit_shader());
    let texture = checker();
    material.set_texture("albedo", texture.clone());
    let material = Arc::new(material);

    MaterialCache::acquire(&material_cache, &material);
    assert!(texture_cache.lock().unwrap().render_texture_table_lookup(Arc::as_ptr(&texture) as usize).is_none());

    TextureCache::queue_tasks_for_render_thread(&texture_cache);
    let mut backend = MockBackend::new();
    TextureCache::process_queued(&texture_cache, &mut backend);
    assert!(texture_cache.lock().unwrap().render_texture_table_lookup(Arc::as_ptr(&texture) as usize).is_some());
}

#[test]
fn upload_and_lookup_round_trips() {
    let texture_cache = Arc::new(Mutex::new(TextureCache::new()));
    let material_cache = Arc::new(Mutex::new(MaterialCache::new(texture_cache.clone())));

    let material = Arc::new(Material::new(unlit_shader()));
    MaterialCache::acquire(&material_cache, &material);
    MaterialCache::queue_tasks_for_render_thread(&material_cache);

    let mut backend = MockBackend::new();
    MaterialCache::process_queued(&material_cache, &mut backend, &texture_cache);

    let handle = MaterialCache::cached_render_material(&material_cache, &material);
    assert!(backend.render_material_buffer(handle).is_some());
}
