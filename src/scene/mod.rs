//! The scene graph (§3.5): nodes with transforms, visibility, and
//! components, plus the patch log that drives the render scene
//! projection (see [`crate::render_scene`]).

pub mod component;
pub mod graph;
pub mod node;
pub mod patch;
pub mod transform;

pub use component::{CameraComponent, Component, MeshComponent};
pub use graph::SceneGraph;
pub use node::NodeId;
pub use patch::ScenePatch;
pub use transform::Transform;
