//! Render bundles (§3.7/§3.8): the minimum state that forces a
//! pipeline or vertex-array switch, and the items drawn under it.

use glam::Mat4;
use crate::render_scene::entity::EntityId;

/// The minimum state that forces a pipeline or vertex-array switch.
/// Two geometries with different layouts, or one indexed and one not,
/// can never share a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderBundleKey {
    pub uses_ibo: bool,
    pub geometry_layout_key: u32,
}

/// One drawable instance within a bundle. Items within one key form
/// the input to one indirect multi-draw.
#[derive(Debug, Clone, Copy)]
pub struct RenderBundleItem {
    pub local_to_world: Mat4,
    pub geometry_id: u32,
    pub material_id: u32,
    pub entity_id: EntityId,
}
