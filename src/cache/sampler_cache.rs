//! Sampler GPU-upload cache (§4.3). Identical contract to
//! [`crate::cache::GeometryCache`], sized down: a sampler's only
//! payload is its four filter/address parameters, so "snapshot" and
//! "upload" collapse into one render-thread call.

use std::sync::{Arc, Mutex, Weak};
use rustc_hash::{FxHashMap, FxHashSet};
use crate::engine_bail;
use crate::resource::{AddressMode, FilterMode, Resource, Sampler};
use crate::renderer::{RenderBackend, RenderSamplerHandle};

struct SamplerState {
    resource: Weak<Sampler>,
    current_version: u64,
    ref_count: usize,
}

struct UploadTask {
    key: usize,
    min_filter: FilterMode,
    mag_filter: FilterMode,
    address_u: AddressMode,
    address_v: AddressMode,
}

struct DeleteTask {
    key: usize,
}

/// Keyed by a sampler's `Arc` pointer identity, producing GPU sampler
/// handles the texture cache resolves when a texture declares one.
pub struct SamplerCache {
    state_table: FxHashMap<usize, SamplerState>,
    used_set: FxHashSet<usize>,
    render_sampler_table: FxHashMap<usize, RenderSamplerHandle>,
    upload_tasks: Vec<UploadTask>,
    delete_tasks: [Vec<DeleteTask>; 2],
}

impl SamplerCache {
    pub fn new() -> Self {
        Self {
            state_table: FxHashMap::default(),
            used_set: FxHashSet::default(),
            render_sampler_table: FxHashMap::default(),
            upload_tasks: Vec::new(),
            delete_tasks: [Vec::new(), Vec::new()],
        }
    }

    pub fn acquire(cache: &Arc<Mutex<SamplerCache>>, sampler: &Arc<Sampler>) {
        let key = Arc::as_ptr(sampler) as usize;
        let is_new;
        {
            let mut guard = cache.lock().unwrap();
            is_new = !guard.state_table.contains_key(&key);
            let state = guard.state_table.entry(key).or_insert_with(|| SamplerState {
                resource: Arc::downgrade(sampler),
                current_version: 0,
                ref_count: 0,
            });
            state.ref_count += 1;
            if state.ref_count == 1 {
                guard.used_set.insert(key);
            }
        }
        if is_new {
            let weak = Arc::downgrade(cache);
            sampler.on_before_destruct(Box::new(move || {
                if let Some(cache) = weak.upgrade() {
                    let mut guard = cache.lock().unwrap();
                    guard.delete_tasks[1].push(DeleteTask { key });
                    guard.state_table.remove(&key);
                }
            }));
        }
    }

    pub fn release(cache: &Arc<Mutex<SamplerCache>>, sampler: &Arc<Sampler>) {
        let key = Arc::as_ptr(sampler) as usize;
        let mut guard = cache.lock().unwrap();
        let state = match guard.state_table.get_mut(&key) {
            Some(state) => state,
            None => engine_bail!("ember::cache::SamplerCache", "release() called without a matching acquire()"),
        };
        state.ref_count = match state.ref_count.checked_sub(1) {
            Some(count) => count,
            None => engine_bail!("ember::cache::SamplerCache", "ref_count underflow"),
        };
        if state.ref_count == 0 {
            guard.used_set.remove(&key);
        }
    }

    pub fn queue_tasks_for_render_thread(cache: &Arc<Mutex<SamplerCache>>) {
        let mut guard = cache.lock().unwrap();
        let keys: Vec<usize> = guard.used_set.iter().copied().collect();

        for key in keys {
            let (resource, current_version) = {
                let state = guard.state_table.get(&key).unwrap();
                (state.resource.clone(), state.current_version)
            };
            let Some(sampler) = resource.upgrade() else { continue };
            let version = sampler.current_version();
            let already_uploaded = guard.render_sampler_table.contains_key(&key);

            if !already_uploaded || current_version != version {
                guard.upload_tasks.push(UploadTask {
                    key,
                    min_filter: sampler.min_filter(),
                    mag_filter: sampler.mag_filter(),
                    address_u: sampler.address_u(),
                    address_v: sampler.address_v(),
                });
                guard.state_table.get_mut(&key).unwrap().current_version = version;
            }
        }

        guard.delete_tasks.swap(0, 1);
    }

    pub fn process_queued(cache: &Arc<Mutex<SamplerCache>>, backend: &mut dyn RenderBackend) {
        let mut guard = cache.lock().unwrap();

        let delete_tasks = std::mem::take(&mut guard.delete_tasks[0]);
        for task in delete_tasks {
            if let Some(handle) = guard.render_sampler_table.remove(&task.key) {
                backend.destroy_render_sampler(handle);
            }
        }

        let upload_tasks = std::mem::take(&mut guard.upload_tasks);
        for task in upload_tasks {
            if let Some(old_handle) = guard.render_sampler_table.remove(&task.key) {
                backend.destroy_render_sampler(old_handle);
            }
            let handle = backend.create_render_sampler(task.min_filter, task.mag_filter, task.address_u, task.address_v);
            guard.render_sampler_table.insert(task.key, handle);
        }
    }

    pub fn cached_render_sampler(cache: &Arc<Mutex<SamplerCache>>, sampler: &Arc<Sampler>) -> Option<RenderSamplerHandle> {
        let key = Arc::as_ptr(sampler) as usize;
        cache.lock().unwrap().render_sampler_table.get(&key).copied()
    }
}

impl Default for SamplerCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "sampler_cache_tests.rs"]
mod tests;
