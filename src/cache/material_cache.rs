//! Material GPU-upload cache (§4.3). Owns no texture state directly:
//! acquiring a material acquires each of its bound textures into the
//! [`TextureCache`] it was constructed with, and releasing mirrors
//! that. Uploads the material's parameter buffer and resolved texture
//! handles whenever the material's own version changes.

use std::sync::{Arc, Mutex, Weak};
use rustc_hash::{FxHashMap, FxHashSet};
use crate::engine_bail;
use crate::cache::texture_cache::TextureCache;
use crate::resource::{Material, Resource};
use crate::renderer::{RenderBackend, RenderMaterialHandle};

struct MaterialState {
    resource: Weak<Material>,
    uploaded: bool,
    current_version: u64,
    ref_count: usize,
}

struct UploadTask {
    key: usize,
    buffer_size: usize,
    uniform_buffer: Vec<u8>,
    texture_keys: Vec<Option<usize>>,
}

struct DeleteTask {
    key: usize,
}

/// Keyed by a material's `Arc` pointer identity.
pub struct MaterialCache {
    state_table: FxHashMap<usize, MaterialState>,
    used_set: FxHashSet<usize>,
    render_material_table: FxHashMap<usize, RenderMaterialHandle>,
    upload_tasks: Vec<UploadTask>,
    delete_tasks: [Vec<DeleteTask>; 2],
    texture_cache: Arc<Mutex<TextureCache>>,
}

impl MaterialCache {
    pub fn new(texture_cache: Arc<Mutex<TextureCache>>) -> Self {
        Self {
            state_table: FxHashMap::default(),
            used_set: FxHashSet::default(),
            render_material_table: FxHashMap::default(),
            upload_tasks: Vec::new(),
            delete_tasks: [Vec::new(), Vec::new()],
            texture_cache,
        }
    }

    pub fn texture_cache(&self) -> &Arc<Mutex<TextureCache>> {
        &self.texture_cache
    }

    pub fn acquire(cache: &Arc<Mutex<MaterialCache>>, material: &Arc<Material>) {
        let key = Arc::as_ptr(material) as usize;
        let (is_new, became_used) = {
            let mut guard = cache.lock().unwrap();
            let is_new = !guard.state_table.contains_key(&key);
            let state = guard.state_table.entry(key).or_insert_with(|| MaterialState {
                resource: Arc::downgrade(material),
                uploaded: false,
                current_version: 0,
                ref_count: 0,
            });
            state.ref_count += 1;
            let became_used = state.ref_count == 1;
            if became_used {
                guard.used_set.insert(key);
            }
            (is_new, became_used)
        };
        if became_used {
            let texture_cache = cache.lock().unwrap().texture_cache.clone();
            for texture in material.textures().iter().flatten() {
                TextureCache::acquire(&texture_cache, texture);
            }
        }
        if is_new {
            let weak = Arc::downgrade(cache);
            material.on_before_destruct(Box::new(move || {
                if let Some(cache) = weak.upgrade() {
                    let mut guard = cache.lock().unwrap();
                    guard.delete_tasks[1].push(DeleteTask { key });
                    guard.state_table.remove(&key);
                }
            }));
        }
    }

    pub fn release(cache: &Arc<Mutex<MaterialCache>>, material: &Arc<Material>) {
        let key = Arc::as_ptr(material) as usize;
        let (became_unused, texture_cache) = {
            let mut guard = cache.lock().unwrap();
            let state = match guard.state_table.get_mut(&key) {
                Some(state) => state,
                None => engine_bail!("ember::cache::MaterialCache", "release() called without a matching acquire()"),
            };
            state.ref_count = match state.ref_count.checked_sub(1) {
                Some(count) => count,
                None => engine_bail!("ember::cache::MaterialCache", "ref_count underflow"),
            };
            let became_unused = state.ref_count == 0;
            if became_unused {
                guard.used_set.remove(&key);
            }
            (became_unused, guard.texture_cache.clone())
        };
        if became_unused {
            for texture in material.textures().iter().flatten() {
                TextureCache::release(&texture_cache, texture);
            }
        }
    }

    pub fn queue_tasks_for_render_thread(cache: &Arc<Mutex<MaterialCache>>) {
        let mut guard = cache.lock().unwrap();
        let keys: Vec<usize> = guard.used_set.iter().copied().collect();

        for key in keys {
            let (resource, uploaded, current_version) = {
                let state = guard.state_table.get(&key).unwrap();
                (state.resource.clone(), state.uploaded, state.current_version)
            };
            let Some(material) = resource.upgrade() else { continue };
            let version = material.current_version();

            if !uploaded || current_version != version {
                let texture_keys = material.textures().iter()
                    .map(|slot| slot.as_ref().map(|t| Arc::as_ptr(t) as usize))
                    .collect();
                guard.upload_tasks.push(UploadTask {
                    key,
                    buffer_size: material.shader().buffer_size(),
                    uniform_buffer: material.uniform_buffer().to_vec(),
                    texture_keys,
                });
                let state = guard.state_table.get_mut(&key).unwrap();
                state.uploaded = true;
                state.current_version = version;
            }
        }

        guard.delete_tasks.swap(0, 1);
    }

    pub fn process_queued(cache: &Arc<Mutex<MaterialCache>>, backend: &mut dyn RenderBackend, texture_cache: &Arc<Mutex<TextureCache>>) {
        let mut guard = cache.lock().unwrap();

        let delete_tasks = std::mem::take(&mut guard.delete_tasks[0]);
        for task in delete_tasks {
            if let Some(handle) = guard.render_material_table.remove(&task.key) {
                backend.destroy_render_material(handle);
            }
        }

        let upload_tasks = std::mem::take(&mut guard.upload_tasks);
        for task in upload_tasks {
            let handle = *guard.render_material_table.entry(task.key)
                .or_insert_with(|| backend.create_render_material(task.buffer_size));

            let texture_handles: Vec<Option<_>> = task.texture_keys.iter()
                .map(|key| key.and_then(|k| texture_cache.lock().unwrap().render_texture_table_lookup(k)))
                .collect();
            backend.update_render_material(handle, &task.uniform_buffer, &texture_handles);
        }
    }

    pub fn cached_render_material(cache: &Arc<Mutex<MaterialCache>>, material: &Arc<Material>) -> RenderMaterialHandle {
        let key = Arc::as_ptr(material) as usize;
        let guard = cache.lock().unwrap();
        match guard.render_material_table.get(&key) {
            Some(handle) => *handle,
            None => engine_bail!("ember::cache::MaterialCache", "bad attempt to retrieve cached render material of an uncached material"),
        }
    }
}

#[cfg(test)]
#[path = "material_cache_tests.rs"]
mod tests;
