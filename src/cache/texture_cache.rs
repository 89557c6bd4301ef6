//! Texture GPU-upload cache (§4.3). Owns a [`SamplerCache`]: a
//! texture's attached sampler is acquired/released alongside the
//! texture itself and resolved to a render handle during upload.

use std::sync::{Arc, Mutex, Weak};
use rustc_hash::{FxHashMap, FxHashSet};
use crate::engine_bail;
use crate::cache::sampler_cache::SamplerCache;
use crate::resource::{DataType, Resource, Texture, TextureFormat, TextureKind};
use crate::renderer::{RenderBackend, RenderTextureHandle};

struct TextureState {
    resource: Weak<Texture>,
    uploaded: bool,
    current_version: u64,
    ref_count: usize,
}

struct UploadTask {
    key: usize,
    format: TextureFormat,
    data_type: DataType,
    width: u32,
    height: u32,
    data: Vec<u8>,
    sampler: Option<Arc<crate::resource::Sampler>>,
}

struct DeleteTask {
    key: usize,
}

/// Keyed by a texture's `Arc` pointer identity.
pub struct TextureCache {
    state_table: FxHashMap<usize, TextureState>,
    used_set: FxHashSet<usize>,
    render_texture_table: FxHashMap<usize, (RenderTextureHandle, u32, u32)>,
    upload_tasks: Vec<UploadTask>,
    delete_tasks: [Vec<DeleteTask>; 2],
    sampler_cache: Arc<Mutex<SamplerCache>>,
}

/// Cube faces aren't part of the render-backend contract (§4.6 is
/// silent on cube upload); only the 2D case uploads for now.
fn texture_2d_bytes(kind: &TextureKind) -> Option<(u32, u32, &[u8])> {
    match kind {
        TextureKind::Texture2D { width, height, data } => Some((*width, *height, data)),
        TextureKind::Cube { .. } => None,
    }
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            state_table: FxHashMap::default(),
            used_set: FxHashSet::default(),
            render_texture_table: FxHashMap::default(),
            upload_tasks: Vec::new(),
            delete_tasks: [Vec::new(), Vec::new()],
            sampler_cache: Arc::new(Mutex::new(SamplerCache::new())),
        }
    }

    pub fn sampler_cache(&self) -> &Arc<Mutex<SamplerCache>> {
        &self.sampler_cache
    }

    pub fn acquire(cache: &Arc<Mutex<TextureCache>>, texture: &Arc<Texture>) {
        let key = Arc::as_ptr(texture) as usize;
        let is_new;
        {
            let mut guard = cache.lock().unwrap();
            is_new = !guard.state_table.contains_key(&key);
            let state = guard.state_table.entry(key).or_insert_with(|| TextureState {
                resource: Arc::downgrade(texture),
                uploaded: false,
                current_version: 0,
                ref_count: 0,
            });
            state.ref_count += 1;
            if state.ref_count == 1 {
                guard.used_set.insert(key);
            }
        }
        if let Some(sampler) = texture.sampler() {
            let sampler_cache = cache.lock().unwrap().sampler_cache.clone();
            SamplerCache::acquire(&sampler_cache, sampler);
        }
        if is_new {
            let weak = Arc::downgrade(cache);
            texture.on_before_destruct(Box::new(move || {
                if let Some(cache) = weak.upgrade() {
                    let mut guard = cache.lock().unwrap();
                    guard.delete_tasks[1].push(DeleteTask { key });
                    guard.state_table.remove(&key);
                }
            }));
        }
    }

    pub fn release(cache: &Arc<Mutex<TextureCache>>, texture: &Arc<Texture>) {
        let key = Arc::as_ptr(texture) as usize;
        let sampler_cache = {
            let mut guard = cache.lock().unwrap();
            let state = match guard.state_table.get_mut(&key) {
                Some(state) => state,
                None => engine_bail!("ember::cache::TextureCache", "release() called without a matching acquire()"),
            };
            state.ref_count = match state.ref_count.checked_sub(1) {
                Some(count) => count,
                None => engine_bail!("ember::cache::TextureCache", "ref_count underflow"),
            };
            if state.ref_count == 0 {
                guard.used_set.remove(&key);
            }
            guard.sampler_cache.clone()
        };
        if let Some(sampler) = texture.sampler() {
            SamplerCache::release(&sampler_cache, sampler);
        }
    }

    pub fn queue_tasks_for_render_thread(cache: &Arc<Mutex<TextureCache>>) {
        let sampler_cache = cache.lock().unwrap().sampler_cache.clone();
        SamplerCache::queue_tasks_for_render_thread(&sampler_cache);

        let mut guard = cache.lock().unwrap();
        let keys: Vec<usize> = guard.used_set.iter().copied().collect();

        for key in keys {
            let (resource, uploaded, current_version) = {
                let state = guard.state_table.get(&key).unwrap();
                (state.resource.clone(), state.uploaded, state.current_version)
            };
            let Some(texture) = resource.upgrade() else { continue };
            let version = texture.current_version();

            if !uploaded || current_version != version {
                let Some((width, height, data)) = texture_2d_bytes(texture.kind()) else { continue };
                guard.upload_tasks.push(UploadTask {
                    key,
                    format: texture.format(),
                    data_type: texture.data_type(),
                    width,
                    height,
                    data: data.to_vec(),
                    sampler: texture.sampler().cloned(),
                });
                let state = guard.state_table.get_mut(&key).unwrap();
                state.uploaded = true;
                state.current_version = version;
            }
        }

        guard.delete_tasks.swap(0, 1);
    }

    pub fn process_queued(cache: &Arc<Mutex<TextureCache>>, backend: &mut dyn RenderBackend) {
        let sampler_cache = cache.lock().unwrap().sampler_cache.clone();
        SamplerCache::process_queued(&sampler_cache, backend);

        let mut guard = cache.lock().unwrap();

        let delete_tasks = std::mem::take(&mut guard.delete_tasks[0]);
        for task in delete_tasks {
            if let Some((handle, _, _)) = guard.render_texture_table.remove(&task.key) {
                backend.destroy_render_texture(handle);
            }
        }

        let upload_tasks = std::mem::take(&mut guard.upload_tasks);
        for task in upload_tasks {
            let existing = guard.render_texture_table.get(&task.key).copied();
            let needs_recreate = !matches!(existing, Some((_, w, h)) if w == task.width && h == task.height);

            let handle = if needs_recreate {
                if let Some((old_handle, _, _)) = existing {
                    backend.destroy_render_texture(old_handle);
                }
                let handle = backend.create_render_texture(task.format, task.data_type, task.width, task.height);
                guard.render_texture_table.insert(task.key, (handle, task.width, task.height));
                handle
            } else {
                existing.unwrap().0
            };

            backend.update_render_texture_data(handle, &task.data);

            let sampler_handle = task.sampler.as_ref().and_then(|s| SamplerCache::cached_render_sampler(&sampler_cache, s));
            backend.bind_render_texture_sampler(handle, sampler_handle);
        }
    }

    /// Look up an already-uploaded render texture by its cache key
    /// (an `Arc<Texture>` pointer address), without requiring the
    /// caller to still hold the `Arc` itself. Returns `None` rather
    /// than panicking if the texture hasn't uploaded yet.
    pub fn render_texture_table_lookup(&self, key: usize) -> Option<RenderTextureHandle> {
        self.render_texture_table.get(&key).map(|(handle, _, _)| *handle)
    }

    pub fn cached_render_texture(cache: &Arc<Mutex<TextureCache>>, texture: &Arc<Texture>) -> RenderTextureHandle {
        let key = Arc::as_ptr(texture) as usize;
        let guard = cache.lock().unwrap();
        match guard.render_texture_table.get(&key) {
            Some((handle, _, _)) => *handle,
            None => engine_bail!("ember::cache::TextureCache", "bad attempt to retrieve cached render texture of an uncached texture"),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "texture_cache_tests.rs"]
mod tests;
