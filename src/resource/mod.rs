//! CPU-side resource types: geometry, texture, sampler, material (§3.1-3.4).
//!
//! Every concrete type here implements [`resource::Resource`], embedding
//! a [`resource::ResourceState`] for version tracking and pre-destruct
//! notification. Caches (see [`crate::cache`]) are the only consumers of
//! that contract.

pub mod resource;
pub mod geometry;
pub mod texture;
pub mod sampler;
pub mod material;

pub use resource::{Resource, ResourceState, SubId};
pub use geometry::{Geometry, LayoutKey, AABB, AttributeView};
pub use texture::{ColorSpace, CubeFace, DataType, Texture, TextureFormat, TextureKind};
pub use sampler::{AddressMode, FilterMode, Sampler};
pub use material::{BufferLayoutKind, Material, MaterialParamSlot, MaterialShader};
