//! The render scene (§3.7/§3.8/§4.4): the entity projection and render
//! bundle map a [`SceneGraph`](crate::scene::SceneGraph) is turned
//! into every frame, ready for a [`RenderBackend`](crate::renderer::RenderBackend) to draw.

pub mod bundle;
pub mod entity;
pub mod render_scene;

use rustc_hash::FxHashMap;

pub use bundle::{RenderBundleItem, RenderBundleKey};
pub use entity::EntityId;
pub use render_scene::RenderScene;

/// A frame's drawable state, keyed by the minimum state that forces a
/// pipeline or vertex-array switch.
pub type RenderBundleMap = FxHashMap<RenderBundleKey, Vec<RenderBundleItem>>;
