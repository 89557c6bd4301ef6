//! Geometry GPU-upload cache (§4.3): tracks which geometries are used
//! this frame, snapshots dirty ones for the render thread, and evicts
//! GPU state two frames after the CPU resource is destroyed.

use std::sync::{Arc, Mutex, Weak};
use rustc_hash::{FxHashMap, FxHashSet};
use crate::engine_bail;
use crate::resource::{Geometry, LayoutKey, Resource, AABB};
use crate::renderer::{RenderBackend, RenderGeometryHandle};

#[derive(Debug)]
struct GeometryState {
    resource: Weak<Geometry>,
    uploaded: bool,
    current_version: u64,
    ref_count: usize,
}

#[derive(Debug)]
struct UploadTask {
    key: usize,
    vertex_bytes: Vec<u8>,
    index_bytes: Vec<u32>,
    layout: LayoutKey,
    vertex_count: usize,
    index_count: usize,
    aabb: AABB,
}

#[derive(Debug)]
struct DeleteTask {
    key: usize,
}

/// Keyed by a geometry's `Arc` pointer identity. Construct one behind
/// an `Arc<Mutex<_>>`: the pre-destruct subscription taken out on
/// first [`Self::acquire`] needs a weak handle back into the cache.
#[derive(Debug)]
pub struct GeometryCache {
    state_table: FxHashMap<usize, GeometryState>,
    used_set: FxHashSet<usize>,
    render_geometry_table: FxHashMap<usize, (RenderGeometryHandle, usize, usize)>,
    upload_tasks: Vec<UploadTask>,
    delete_tasks: [Vec<DeleteTask>; 2],
}

impl GeometryCache {
    pub fn new() -> Self {
        Self {
            state_table: FxHashMap::default(),
            used_set: FxHashSet::default(),
            render_geometry_table: FxHashMap::default(),
            upload_tasks: Vec::new(),
            delete_tasks: [Vec::new(), Vec::new()],
        }
    }

    /// `0 -> 1` ref-count transition inserts into the used set and
    /// subscribes to the geometry's pre-destruct notification.
    pub fn acquire(cache: &Arc<Mutex<GeometryCache>>, geometry: &Arc<Geometry>) {
        let key = Arc::as_ptr(geometry) as usize;
        let is_new;
        {
            let mut guard = cache.lock().unwrap();
            is_new = !guard.state_table.contains_key(&key);
            let state = guard.state_table.entry(key).or_insert_with(|| GeometryState {
                resource: Arc::downgrade(geometry),
                uploaded: false,
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
            geometry.on_before_destruct(Box::new(move || {
                if let Some(cache) = weak.upgrade() {
                    let mut guard = cache.lock().unwrap();
                    guard.delete_tasks[1].push(DeleteTask { key });
                    guard.state_table.remove(&key);
                }
            }));
        }
    }

    /// `1 -> 0` ref-count transition removes from the used set. Fatal
    /// (§7) on an unmatched release or a ref-count underflow.
    pub fn release(cache: &Arc<Mutex<GeometryCache>>, geometry: &Arc<Geometry>) {
        let key = Arc::as_ptr(geometry) as usize;
        let mut guard = cache.lock().unwrap();
        let state = match guard.state_table.get_mut(&key) {
            Some(state) => state,
            None => engine_bail!("ember::cache::GeometryCache", "release() called without a matching acquire()"),
        };
        state.ref_count = match state.ref_count.checked_sub(1) {
            Some(count) => count,
            None => engine_bail!("ember::cache::GeometryCache", "ref_count underflow"),
        };
        if state.ref_count == 0 {
            guard.used_set.remove(&key);
        }
    }

    /// Game thread, end of Stage 1: snapshot dirty used geometries
    /// into upload tasks, then rotate the two-frame delete-task list.
    pub fn queue_tasks_for_render_thread(cache: &Arc<Mutex<GeometryCache>>) {
        let mut guard = cache.lock().unwrap();
        let keys: Vec<usize> = guard.used_set.iter().copied().collect();

        for key in keys {
            let (resource, uploaded, current_version) = {
                let state = guard.state_table.get(&key).unwrap();
                (state.resource.clone(), state.uploaded, state.current_version)
            };
            let Some(geometry) = resource.upgrade() else { continue };
            let version = geometry.current_version();

            if !uploaded || current_version != version {
                guard.upload_tasks.push(UploadTask {
                    key,
                    vertex_bytes: geometry.vertex_bytes().to_vec(),
                    index_bytes: geometry.index_bytes().map(<[u32]>::to_vec).unwrap_or_default(),
                    layout: geometry.layout(),
                    vertex_count: geometry.vertex_count() as usize,
                    index_count: geometry.index_count() as usize,
                    aabb: geometry.aabb(),
                });
                let state = guard.state_table.get_mut(&key).unwrap();
                state.uploaded = true;
                state.current_version = version;
            }
        }

        guard.delete_tasks.swap(0, 1);
    }

    /// Render thread, Stage 2: process deletes, then uploads.
    pub fn process_queued(cache: &Arc<Mutex<GeometryCache>>, backend: &mut dyn RenderBackend) {
        let mut guard = cache.lock().unwrap();

        let delete_tasks = std::mem::take(&mut guard.delete_tasks[0]);
        for task in delete_tasks {
            if let Some((handle, _, _)) = guard.render_geometry_table.remove(&task.key) {
                backend.destroy_render_geometry(handle);
            }
        }

        let upload_tasks = std::mem::take(&mut guard.upload_tasks);
        for task in upload_tasks {
            let existing = guard.render_geometry_table.get(&task.key).copied();
            let needs_recreate = !matches!(existing, Some((_, vc, ic)) if vc == task.vertex_count && ic == task.index_count);

            let handle = if needs_recreate {
                if let Some((old_handle, _, _)) = existing {
                    backend.destroy_render_geometry(old_handle);
                }
                let handle = backend.create_render_geometry(task.layout, task.vertex_count, task.index_count);
                guard.render_geometry_table.insert(task.key, (handle, task.vertex_count, task.index_count));
                handle
            } else {
                existing.unwrap().0
            };

            backend.update_render_geometry_vertices(handle, &task.vertex_bytes);
            if task.index_count > 0 {
                backend.update_render_geometry_indices(handle, bytemuck::cast_slice(&task.index_bytes));
            }
            backend.update_render_geometry_aabb(handle, task.aabb);
        }
    }

    /// Fatal (§7) if `geometry` has no uploaded GPU counterpart yet.
    pub fn cached_render_geometry(cache: &Arc<Mutex<GeometryCache>>, geometry: &Arc<Geometry>) -> RenderGeometryHandle {
        let key = Arc::as_ptr(geometry) as usize;
        let guard = cache.lock().unwrap();
        match guard.render_geometry_table.get(&key) {
            Some((handle, _, _)) => *handle,
            None => engine_bail!("ember::cache::GeometryCache", "bad attempt to retrieve cached render geometry of an uncached geometry"),
        }
    }
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "geometry_cache_tests.rs"]
mod tests;
