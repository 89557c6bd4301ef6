//! The scene graph (§3.5/§4.2): a tree of [`NodeId`]s with cached
//! world-visibility and world-transform, and a patch log downstream
//! consumers (§4.4) drain once per frame.

use std::any::TypeId;
use glam::Vec3;
use slotmap::SlotMap;
use crate::engine_bail;
use crate::scene::component::Component;
use crate::scene::node::{Node, NodeId};
use crate::scene::patch::ScenePatch;
use crate::scene::transform::Transform;

pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    patches: Vec<ScenePatch>,
    dirty_transforms: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("root"));
        let mut graph = Self { nodes, root, patches: Vec::new(), dirty_transforms: Vec::new() };
        graph.nodes[root].world_visible = true;
        graph.patches.push(ScenePatch::NodeMounted(root));
        graph.mark_transform_dirty(root);
        graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached node (no parent, not world-visible until
    /// [`Self::attach`]ed under a visible ancestor).
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(name))
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node].name
    }

    pub fn set_name(&mut self, node: NodeId, name: impl Into<String>) {
        self.nodes[node].name = name.into();
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    pub fn is_locally_visible(&self, node: NodeId) -> bool {
        self.nodes[node].local_visible
    }

    pub fn is_world_visible(&self, node: NodeId) -> bool {
        self.nodes[node].world_visible
    }

    pub fn transform(&self, node: NodeId) -> &Transform {
        &self.nodes[node].transform
    }

    pub fn set_local_position(&mut self, node: NodeId, position: Vec3) {
        self.nodes[node].transform.set_position(position);
        self.mark_transform_dirty(node);
    }

    pub fn set_local_rotation(&mut self, node: NodeId, rotation: glam::Quat) {
        self.nodes[node].transform.set_rotation(rotation);
        self.mark_transform_dirty(node);
    }

    pub fn set_local_scale(&mut self, node: NodeId, scale: Vec3) {
        self.nodes[node].transform.set_scale(scale);
        self.mark_transform_dirty(node);
    }

    /// Detach `child` from any prior parent, then attach it under
    /// `parent`. Emits `NodeMounted` in pre-order for every
    /// world-visible descendant, bounded by `parent`'s own world
    /// visibility (§4.2).
    pub fn attach(&mut self, child: NodeId, parent: NodeId) {
        self.detach_link(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.mark_transform_dirty(child);
        let locally_visible = self.nodes[child].local_visible;
        self.propagate_visibility(child, locally_visible);
    }

    /// Detach `node` from its parent. Emits `NodeRemoved` per
    /// world-visible descendant before unlinking, and drops the
    /// subtree's entries from the dirty-transform set.
    pub fn detach(&mut self, node: NodeId) {
        self.propagate_visibility(node, false);
        let mut subtree = Vec::new();
        self.collect_subtree(node, &mut subtree);
        self.dirty_transforms.retain(|id| !subtree.contains(id));
        self.detach_link(node);
    }

    /// Detach `node` and drop it and its entire subtree from the
    /// graph's storage.
    pub fn destroy(&mut self, node: NodeId) {
        self.detach(node);
        let mut subtree = Vec::new();
        self.collect_subtree(node, &mut subtree);
        for id in subtree {
            self.nodes.remove(id);
        }
    }

    fn detach_link(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        }
    }

    /// Set `node`'s local visibility flag, cascading `NodeMounted` /
    /// `NodeRemoved` bounded by the parent's world visibility (§4.2).
    pub fn set_visible(&mut self, node: NodeId, visible: bool) {
        if self.nodes[node].local_visible == visible {
            return;
        }
        self.nodes[node].local_visible = visible;
        self.propagate_visibility(node, visible);
    }

    fn propagate_visibility(&mut self, node: NodeId, visible: bool) {
        if visible {
            let parent_visible = match self.nodes[node].parent {
                Some(parent) => self.nodes[parent].world_visible,
                None => true,
            };
            if !parent_visible {
                return;
            }
            self.traverse_preorder(node, &mut |graph, id| {
                if graph.nodes[id].local_visible {
                    graph.nodes[id].world_visible = true;
                    graph.patches.push(ScenePatch::NodeMounted(id));
                    true
                } else {
                    false
                }
            });
        } else if self.nodes[node].world_visible {
            self.traverse_preorder(node, &mut |graph, id| {
                if graph.nodes[id].world_visible {
                    graph.nodes[id].world_visible = false;
                    graph.patches.push(ScenePatch::NodeRemoved(id));
                    true
                } else {
                    false
                }
            });
        }
    }

    /// Pre-order walk starting at `node`. `visit` returning `false`
    /// stops descent into that node's children without affecting
    /// sibling branches.
    fn traverse_preorder(&mut self, node: NodeId, visit: &mut impl FnMut(&mut Self, NodeId) -> bool) {
        if !visit(self, node) {
            return;
        }
        let children = self.nodes[node].children.clone();
        for child in children {
            self.traverse_preorder(child, visit);
        }
    }

    fn collect_subtree(&self, node: NodeId, out: &mut Vec<NodeId>) {
        out.push(node);
        for &child in &self.nodes[node].children {
            self.collect_subtree(child, out);
        }
    }

    /// Queue `node` for local/world matrix recomputation on the next
    /// [`Self::update_transforms`] call.
    pub fn mark_transform_dirty(&mut self, node: NodeId) {
        if !self.dirty_transforms.contains(&node) {
            self.dirty_transforms.push(node);
        }
    }

    /// Recompute `local = TRS` and `world = parent_world * local` for
    /// every queued node and its descendants, in tree order, emitting
    /// `NodeTransformChanged` for each world-visible node touched.
    pub fn update_transforms(&mut self) {
        let dirty = std::mem::take(&mut self.dirty_transforms);
        for node in dirty {
            self.recompute_subtree(node);
        }
    }

    fn recompute_subtree(&mut self, node: NodeId) {
        let parent_world = self.nodes[node].parent.map(|p| self.nodes[p].transform.world());
        self.nodes[node].transform.update_local();
        self.nodes[node].transform.update_world(parent_world);
        if self.nodes[node].world_visible {
            self.patches.push(ScenePatch::NodeTransformChanged(node));
        }
        let children = self.nodes[node].children.clone();
        for child in children {
            self.recompute_subtree(child);
        }
    }

    /// Mount `component` on `node`. Fatal (§7, Invariant) if the node
    /// already carries a component of type `T`.
    pub fn add_component<T: Component>(&mut self, node: NodeId, component: T) {
        let type_id = TypeId::of::<T>();
        if self.nodes[node].components.contains_key(&type_id) {
            engine_bail!("ember::scene::SceneGraph", "node already has a component of this type");
        }
        self.nodes[node].components.insert(type_id, Box::new(component));
        if self.nodes[node].world_visible {
            self.patches.push(ScenePatch::ComponentMounted(node, type_id));
        }
    }

    /// Remove the `T` component from `node`. Fatal if it has none.
    pub fn remove_component<T: Component>(&mut self, node: NodeId) {
        let type_id = TypeId::of::<T>();
        if self.nodes[node].components.remove(&type_id).is_none() {
            engine_bail!("ember::scene::SceneGraph", "node has no component of this type to remove");
        }
        if self.nodes[node].world_visible {
            self.patches.push(ScenePatch::ComponentRemoved(node, type_id));
        }
    }

    pub fn has_component<T: Component>(&self, node: NodeId) -> bool {
        self.nodes[node].components.contains_key(&TypeId::of::<T>())
    }

    pub fn component<T: Component>(&self, node: NodeId) -> Option<&T> {
        self.nodes[node].components.get(&TypeId::of::<T>())?.as_any().downcast_ref::<T>()
    }

    pub fn component_mut<T: Component>(&mut self, node: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(node)?.components.get_mut(&TypeId::of::<T>())?.as_any_mut().downcast_mut::<T>()
    }

    /// Drain and return every patch accumulated since the last call.
    pub fn drain_patches(&mut self) -> Vec<ScenePatch> {
        std::mem::take(&mut self.patches)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
