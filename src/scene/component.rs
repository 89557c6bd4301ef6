//! Component types a scene node can carry (§3.5), at most one per
//! type. The render scene (§3.7) reads these to build its entity
//! projection.

use std::any::Any;
use std::sync::Arc;
use glam::Mat4;
use crate::camera::Frustum;
use crate::resource::{Geometry, Material};

/// Marker for types that can be mounted on a scene node via
/// [`crate::scene::SceneGraph::add_component`].
pub trait Component: Any + Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Send> Component for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Binds a node to a drawable mesh: a geometry and the material it's
/// drawn with.
#[derive(Clone)]
pub struct MeshComponent {
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
}

/// Binds a node to a camera: the projection matrix and the frustum
/// derived from it, for the render scene's camera column (§3.7).
#[derive(Clone)]
pub struct CameraComponent {
    pub projection: Mat4,
    pub frustum: Frustum,
}
