//! The render scene (§3.7/§4.4): projects a [`SceneGraph`] into a
//! dense entity table and a map of render bundles, driving the three
//! GPU-upload caches along the way.

use std::any::TypeId;
use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::engine_panic;
use crate::cache::{GeometryCache, MaterialCache, TextureCache};
use crate::renderer::{RenderBackend, RenderCamera};
use crate::render_scene::bundle::{RenderBundleItem, RenderBundleKey};
use crate::render_scene::entity::{ComponentFlags, EntityCamera, EntityId, EntityMesh, EntityTable};
use crate::render_scene::RenderBundleMap;
use crate::scene::{CameraComponent, MeshComponent, NodeId, ScenePatch, SceneGraph};

/// Internal bookkeeping queued by the mount/unmount pass during Stage
/// 1, applied to the render bundle map at the start of Stage 2.
#[derive(Debug, Clone, Copy)]
enum RenderScenePatch {
    MeshMounted(EntityId),
    MeshRemoved(EntityId),
    TransformChanged(EntityId),
}

/// Projects one scene graph's world-visible subtree into a render
/// bundle map, owning its own GPU-upload caches (§4.3).
pub struct RenderScene {
    entities: EntityTable,
    node_to_entity: FxHashMap<NodeId, EntityId>,
    render_bundles: RenderBundleMap,
    entity_location: FxHashMap<EntityId, (RenderBundleKey, usize)>,
    render_scene_patches: Vec<RenderScenePatch>,
    geometry_cache: Arc<Mutex<GeometryCache>>,
    texture_cache: Arc<Mutex<TextureCache>>,
    material_cache: Arc<Mutex<MaterialCache>>,
    last_graph_identity: Option<usize>,
}

impl RenderScene {
    pub fn new() -> Self {
        let texture_cache = Arc::new(Mutex::new(TextureCache::new()));
        let material_cache = Arc::new(Mutex::new(MaterialCache::new(texture_cache.clone())));
        Self {
            entities: EntityTable::new(),
            node_to_entity: FxHashMap::default(),
            render_bundles: FxHashMap::default(),
            entity_location: FxHashMap::default(),
            render_scene_patches: Vec::new(),
            geometry_cache: Arc::new(Mutex::new(GeometryCache::new())),
            texture_cache,
            material_cache,
            last_graph_identity: None,
        }
    }

    /// Game thread, Stage 1: rebuild (if `graph` is a different
    /// instance than last frame) or patch (otherwise) the entity
    /// projection, then snapshot dirty resources for the render
    /// thread.
    pub fn update_stage1(&mut self, graph: &mut SceneGraph) {
        let identity = graph as *const SceneGraph as usize;
        if self.last_graph_identity != Some(identity) {
            self.last_graph_identity = Some(identity);
            graph.drain_patches();
            self.rebuild(graph);
        } else {
            let patches = graph.drain_patches();
            for patch in patches {
                self.apply_scene_patch(graph, patch);
            }
        }

        GeometryCache::queue_tasks_for_render_thread(&self.geometry_cache);
        TextureCache::queue_tasks_for_render_thread(&self.texture_cache);
        MaterialCache::queue_tasks_for_render_thread(&self.material_cache);
    }

    /// Render thread, Stage 2: process every cache's queued GPU work,
    /// then apply the mount/unmount/transform patches accumulated
    /// during Stage 1 to the render bundle map.
    pub fn update_stage2(&mut self, backend: &mut dyn RenderBackend) {
        GeometryCache::process_queued(&self.geometry_cache, backend);
        TextureCache::process_queued(&self.texture_cache, backend);
        MaterialCache::process_queued(&self.material_cache, backend, &self.texture_cache);
        self.apply_render_scene_patches();
    }

    /// The view camera's render-ready projection/view/frustum. Fatal
    /// (§7) if no node currently carries a mounted camera component.
    pub fn render_camera(&self) -> RenderCamera {
        let Some(&entity) = self.entities.view_camera.first() else {
            engine_panic!("ember::render_scene::RenderScene", "no camera is currently mounted in the scene");
        };
        let camera = self.entities.cameras[entity].as_ref().unwrap();
        let world = self.entities.transforms[entity];
        RenderCamera {
            projection: camera.projection,
            view: world.inverse(),
            frustum_planes: camera.frustum.planes,
        }
    }

    pub fn render_bundles(&self) -> &RenderBundleMap {
        &self.render_bundles
    }

    fn get_or_create_entity(&mut self, node: NodeId) -> EntityId {
        if let Some(&entity) = self.node_to_entity.get(&node) {
            return entity;
        }
        let entity = self.entities.create_entity();
        self.node_to_entity.insert(node, entity);
        entity
    }

    fn rebuild(&mut self, graph: &SceneGraph) {
        for entity in std::mem::take(&mut self.entities.view_mesh) {
            self.release_mesh_refs(entity);
        }
        self.entities.clear();
        self.node_to_entity.clear();
        self.render_bundles.clear();
        self.entity_location.clear();
        self.render_scene_patches.clear();
        self.mount_subtree(graph, graph.root());
    }

    fn mount_subtree(&mut self, graph: &SceneGraph, node: NodeId) {
        if !graph.is_world_visible(node) {
            return;
        }
        self.mount_node(graph, node);
        for &child in graph.children(node) {
            self.mount_subtree(graph, child);
        }
    }

    fn mount_node(&mut self, graph: &SceneGraph, node: NodeId) {
        if let Some(mesh) = graph.component::<MeshComponent>(node) {
            let entity = self.get_or_create_entity(node);
            self.mount_mesh(entity, mesh);
        }
        if let Some(camera) = graph.component::<CameraComponent>(node) {
            let entity = self.get_or_create_entity(node);
            self.mount_camera(entity, camera);
        }
        self.copy_world_transform(graph, node);
    }

    /// Mirrors `NodeTransformChanged`: a no-op unless `node` already
    /// has an entity, which only happens once a Mesh or Camera
    /// component has mounted it.
    fn copy_world_transform(&mut self, graph: &SceneGraph, node: NodeId) {
        let Some(&entity) = self.node_to_entity.get(&node) else { return };
        self.entities.transforms[entity] = graph.transform(node).world();
        if self.entities.flags[entity].contains(ComponentFlags::MESH) {
            self.render_scene_patches.push(RenderScenePatch::TransformChanged(entity));
        }
    }

    fn unmount_node(&mut self, node: NodeId) {
        let Some(entity) = self.node_to_entity.remove(&node) else { return };
        if self.entities.flags[entity].contains(ComponentFlags::MESH) {
            self.unmount_mesh(entity);
        }
        if self.entities.flags[entity].contains(ComponentFlags::CAMERA) {
            self.unmount_camera(entity);
        }
        self.entities.destroy_entity(entity);
    }

    fn apply_scene_patch(&mut self, graph: &SceneGraph, patch: ScenePatch) {
        match patch {
            ScenePatch::NodeMounted(node) => self.mount_node(graph, node),
            ScenePatch::NodeRemoved(node) => self.unmount_node(node),
            ScenePatch::ComponentMounted(node, type_id) => {
                let entity = self.get_or_create_entity(node);
                if type_id == TypeId::of::<MeshComponent>() {
                    if let Some(mesh) = graph.component::<MeshComponent>(node) {
                        self.mount_mesh(entity, mesh);
                    }
                } else if type_id == TypeId::of::<CameraComponent>() {
                    if let Some(camera) = graph.component::<CameraComponent>(node) {
                        self.mount_camera(entity, camera);
                    }
                }
            }
            ScenePatch::ComponentRemoved(node, type_id) => {
                let Some(&entity) = self.node_to_entity.get(&node) else { return };
                if type_id == TypeId::of::<MeshComponent>() {
                    self.unmount_mesh(entity);
                } else if type_id == TypeId::of::<CameraComponent>() {
                    self.unmount_camera(entity);
                }
                if self.entities.flags[entity].is_empty() {
                    self.node_to_entity.remove(&node);
                    self.entities.destroy_entity(entity);
                }
            }
            ScenePatch::NodeTransformChanged(node) => self.copy_world_transform(graph, node),
        }
    }

    fn mount_mesh(&mut self, entity: EntityId, mesh: &MeshComponent) {
        GeometryCache::acquire(&self.geometry_cache, &mesh.geometry);
        MaterialCache::acquire(&self.material_cache, &mesh.material);
        self.entities.meshes[entity] = EntityMesh { geometry: Some(mesh.geometry.clone()), material: Some(mesh.material.clone()) };
        self.entities.flags[entity].insert(ComponentFlags::MESH);
        self.entities.view_mesh.push(entity);
        self.render_scene_patches.push(RenderScenePatch::MeshMounted(entity));
    }

    fn unmount_mesh(&mut self, entity: EntityId) {
        self.release_mesh_refs(entity);
        self.entities.flags[entity].remove(ComponentFlags::MESH);
        self.entities.view_mesh.retain(|&e| e != entity);
        self.render_scene_patches.push(RenderScenePatch::MeshRemoved(entity));
    }

    fn release_mesh_refs(&mut self, entity: EntityId) {
        let mesh = std::mem::take(&mut self.entities.meshes[entity]);
        if let Some(geometry) = &mesh.geometry {
            GeometryCache::release(&self.geometry_cache, geometry);
        }
        if let Some(material) = &mesh.material {
            MaterialCache::release(&self.material_cache, material);
        }
    }

    fn mount_camera(&mut self, entity: EntityId, camera: &CameraComponent) {
        self.entities.cameras[entity] = Some(EntityCamera { projection: camera.projection, frustum: camera.frustum });
        self.entities.flags[entity].insert(ComponentFlags::CAMERA);
        self.entities.view_camera.push(entity);
    }

    fn unmount_camera(&mut self, entity: EntityId) {
        self.entities.cameras[entity] = None;
        self.entities.flags[entity].remove(ComponentFlags::CAMERA);
        self.entities.view_camera.retain(|&e| e != entity);
    }

    fn apply_render_scene_patches(&mut self) {
        let patches = std::mem::take(&mut self.render_scene_patches);
        for patch in patches {
            match patch {
                RenderScenePatch::MeshMounted(entity) => self.bundle_insert(entity),
                RenderScenePatch::MeshRemoved(entity) => self.bundle_remove(entity),
                RenderScenePatch::TransformChanged(entity) => self.bundle_update_transform(entity),
            }
        }
    }

    fn bundle_insert(&mut self, entity: EntityId) {
        let mesh = self.entities.meshes[entity].clone();
        let (Some(geometry), Some(material)) = (mesh.geometry, mesh.material) else { return };
        let geometry_handle = GeometryCache::cached_render_geometry(&self.geometry_cache, &geometry);
        let material_handle = MaterialCache::cached_render_material(&self.material_cache, &material);

        let key = RenderBundleKey { uses_ibo: geometry.is_indexed(), geometry_layout_key: geometry.layout().bits() as u32 };
        let item = RenderBundleItem {
            local_to_world: self.entities.transforms[entity],
            geometry_id: geometry_handle.0,
            material_id: material_handle.0,
            entity_id: entity,
        };

        let list = self.render_bundles.entry(key).or_default();
        let index = list.len();
        list.push(item);
        self.entity_location.insert(entity, (key, index));
    }

    fn bundle_remove(&mut self, entity: EntityId) {
        let Some((key, index)) = self.entity_location.remove(&entity) else { return };
        let Some(list) = self.render_bundles.get_mut(&key) else { return };
        list.swap_remove(index);
        if index < list.len() {
            let moved_entity = list[index].entity_id;
            self.entity_location.insert(moved_entity, (key, index));
        }
        if list.is_empty() {
            self.render_bundles.remove(&key);
        }
    }

    fn bundle_update_transform(&mut self, entity: EntityId) {
        let Some(&(key, index)) = self.entity_location.get(&entity) else { return };
        if let Some(list) = self.render_bundles.get_mut(&key) {
            list[index].local_to_world = self.entities.transforms[entity];
        }
    }
}

impl Default for RenderScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "render_scene_tests.rs"]
mod tests;
