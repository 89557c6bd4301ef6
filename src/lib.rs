/*!
# Ember

A multi-threaded, real-time 3D rendering engine core.

A game thread mutates a [`scene::SceneGraph`]; a dedicated render
thread drains it into a [`render_scene::RenderScene`] and drives an
abstract [`renderer::RenderBackend`]. The two sides rendezvous once
per frame through [`render_engine::RenderEngine`]'s double-semaphore
handoff (§4.5).

## Modules

- [`resource`] - CPU-side geometry, texture, sampler, material types
- [`cache`] - per-resource GPU-upload caches with two-frame deferred eviction
- [`scene`] - the scene graph and its component/transform/patch machinery
- [`render_scene`] - entity projection and render bundle map
- [`renderer`] - the abstract render-backend contract and a `MockBackend`
- [`render_engine`] - the game-thread/render-thread handoff
- [`gpu_array`] - a growable, range-allocated GPU buffer pool
- [`glsl`] - std140/std430 uniform buffer layout computation
- [`camera`] - camera and frustum math
- [`engine`] - the process-wide cache/logger singleton manager
- [`log`] - the logging facade and its `engine_*!` macros
- [`error`] - recoverable error types
*/

pub mod log;
pub mod error;
pub mod camera;
pub mod glsl;
pub mod gpu_array;
pub mod resource;
pub mod cache;
pub mod scene;
pub mod render_scene;
pub mod renderer;
pub mod render_engine;

pub mod engine;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use render_engine::RenderEngine;

pub use glam;
