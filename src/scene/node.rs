//! A scene node: parent/children links, a name, local visibility, a
//! transform, and a type-indexed component bag (§3.5).

use std::any::TypeId;
use rustc_hash::FxHashMap;
use slotmap::new_key_type;
use crate::scene::component::Component;
use crate::scene::transform::Transform;

new_key_type! {
    /// Stable key for a node within one [`crate::scene::SceneGraph`].
    pub struct NodeId;
}

pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) local_visible: bool,
    pub(crate) world_visible: bool,
    pub(crate) transform: Transform,
    pub(crate) components: FxHashMap<TypeId, Box<dyn Component>>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_visible: true,
            world_visible: false,
            transform: Transform::default(),
            components: FxHashMap::default(),
        }
    }
}
