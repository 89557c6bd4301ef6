//! Scene patches (§3.6): the discriminated log of mutations a scene
//! graph emits to keep downstream entity projections (§4.4) in sync.

use std::any::TypeId;
use crate::scene::node::NodeId;

/// One mutation to a world-visible part of the tree. Only mutations
/// that affect a world-visible subtree are emitted; see §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePatch {
    NodeMounted(NodeId),
    NodeRemoved(NodeId),
    ComponentMounted(NodeId, TypeId),
    ComponentRemoved(NodeId, TypeId),
    NodeTransformChanged(NodeId),
}
