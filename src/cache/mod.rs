//! GPU-upload caches (§4.3): one per CPU-side resource type, each
//! tracking which resources are in use this frame, snapshotting dirty
//! ones for the render thread, and evicting GPU state two frames
//! after the CPU resource's pre-destruct notification fires.

pub mod geometry_cache;
pub mod texture_cache;
pub mod sampler_cache;
pub mod material_cache;

pub use geometry_cache::GeometryCache;
pub use texture_cache::TextureCache;
pub use sampler_cache::SamplerCache;
pub use material_cache::MaterialCache;
