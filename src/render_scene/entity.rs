//! The entity projection's column storage (§3.7): a dense
//! table-of-arrays keyed by [`EntityId`], with a freelist for holes.

use std::sync::Arc;
use bitflags::bitflags;
use glam::Mat4;
use crate::camera::Frustum;
use crate::resource::{Geometry, Material};

/// Dense integer identifying one row across every component column.
pub type EntityId = usize;

bitflags! {
    /// Which component columns a row currently populates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ComponentFlags: u32 {
        const MESH = 1 << 0;
        const CAMERA = 1 << 1;
    }
}

/// The mesh column's row: a non-owning reference to the geometry and
/// material a node's `MeshComponent` currently binds.
#[derive(Default, Clone)]
pub(crate) struct EntityMesh {
    pub geometry: Option<Arc<Geometry>>,
    pub material: Option<Arc<Material>>,
}

/// The camera column's row.
#[derive(Clone)]
pub(crate) struct EntityCamera {
    pub projection: Mat4,
    pub frustum: Frustum,
}

/// Parallel component columns, each row live or on the free list.
///
/// There's no separate slot allocator: the columns' length already *is*
/// the high-water mark, so a fresh row just grows every column by one,
/// and a freed row is remembered in `free_rows` for the next
/// [`EntityTable::create_entity`] to reclaim before growing anything.
pub(crate) struct EntityTable {
    free_rows: Vec<EntityId>,
    live_count: usize,
    pub(crate) flags: Vec<ComponentFlags>,
    pub(crate) transforms: Vec<Mat4>,
    pub(crate) meshes: Vec<EntityMesh>,
    pub(crate) cameras: Vec<Option<EntityCamera>>,
    pub(crate) view_mesh: Vec<EntityId>,
    pub(crate) view_camera: Vec<EntityId>,
}

impl EntityTable {
    pub(crate) fn new() -> Self {
        Self {
            free_rows: Vec::new(),
            live_count: 0,
            flags: Vec::new(),
            transforms: Vec::new(),
            meshes: Vec::new(),
            cameras: Vec::new(),
            view_mesh: Vec::new(),
            view_camera: Vec::new(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.free_rows.clear();
        self.live_count = 0;
        self.flags.clear();
        self.transforms.clear();
        self.meshes.clear();
        self.cameras.clear();
        self.view_mesh.clear();
        self.view_camera.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.live_count
    }

    pub(crate) fn create_entity(&mut self) -> EntityId {
        self.live_count += 1;
        match self.free_rows.pop() {
            Some(id) => {
                self.reset_row(id);
                id
            }
            None => {
                let id = self.flags.len();
                self.flags.push(ComponentFlags::empty());
                self.transforms.push(Mat4::IDENTITY);
                self.meshes.push(EntityMesh::default());
                self.cameras.push(None);
                id
            }
        }
    }

    pub(crate) fn destroy_entity(&mut self, id: EntityId) {
        debug_assert!(id < self.flags.len(), "destroying an entity row that was never allocated: {id}");
        self.live_count -= 1;
        self.free_rows.push(id);
    }

    fn reset_row(&mut self, id: EntityId) {
        self.flags[id] = ComponentFlags::empty();
        self.transforms[id] = Mat4::IDENTITY;
        self.meshes[id] = EntityMesh::default();
        self.cameras[id] = None;
    }
}
