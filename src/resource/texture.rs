//! CPU-side texture resource: 2D and cube variants.

use std::sync::Arc;
use crate::resource::resource::{Resource, ResourceState, SubId};
use crate::resource::sampler::Sampler;
use crate::engine_bail;

/// Pixel format. `Rgba8` is the only format this engine's backend
/// contract guarantees; others are accepted at the resource level but a
/// backend may reject the triple at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8,
    Rgb8,
    R8,
}

/// Per-channel data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    U8,
    F32,
}

/// Color space the data is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Linear,
    Srgb,
}

/// The six faces of a cube texture, in the mandated packing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ORDER: [CubeFace; 6] = [
        CubeFace::PositiveX, CubeFace::NegativeX,
        CubeFace::PositiveY, CubeFace::NegativeY,
        CubeFace::PositiveZ, CubeFace::NegativeZ,
    ];
}

/// Shape-specific texture data.
pub enum TextureKind {
    Texture2D { width: u32, height: u32, data: Vec<u8> },
    Cube { face_size: u32, faces: [Vec<u8>; 6] },
}

/// A CPU-side texture: format/type/color-space metadata, pixel data,
/// and an optional attached sampler.
pub struct Texture {
    format: TextureFormat,
    data_type: DataType,
    color_space: ColorSpace,
    kind: TextureKind,
    sampler: Option<Arc<Sampler>>,
    state: ResourceState,
}

impl Texture {
    pub fn new_2d(
        format: TextureFormat,
        data_type: DataType,
        color_space: ColorSpace,
        width: u32,
        height: u32,
        data: Vec<u8>,
        sampler: Option<Arc<Sampler>>,
    ) -> Self {
        Self {
            format,
            data_type,
            color_space,
            kind: TextureKind::Texture2D { width, height, data },
            sampler,
            state: ResourceState::new(),
        }
    }

    pub fn new_cube(
        format: TextureFormat,
        data_type: DataType,
        color_space: ColorSpace,
        face_size: u32,
        faces: [Vec<u8>; 6],
        sampler: Option<Arc<Sampler>>,
    ) -> Self {
        Self {
            format,
            data_type,
            color_space,
            kind: TextureKind::Cube { face_size, faces },
            sampler,
            state: ResourceState::new(),
        }
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn kind(&self) -> &TextureKind {
        &self.kind
    }

    pub fn sampler(&self) -> Option<&Arc<Sampler>> {
        self.sampler.as_ref()
    }

    pub fn is_cube(&self) -> bool {
        matches!(self.kind, TextureKind::Cube { .. })
    }

    /// Validate that (format, data_type, color_space) is a triple a
    /// backend could plausibly map to a concrete GPU format. The
    /// backend itself makes the final mapping decision; this only
    /// rejects combinations the data model cannot represent.
    pub fn validate_format_triple(&self) -> Result<(), String> {
        if self.format == TextureFormat::R8 && self.color_space == ColorSpace::Srgb {
            return Err(format!(
                "unknown (format, data_type, color_space) triple: ({:?}, {:?}, {:?})",
                self.format, self.data_type, self.color_space
            ));
        }
        Ok(())
    }

    /// Panic (fatal, §7 Invariant) if the format triple is unrepresentable.
    pub fn assert_format_triple(&self) {
        if let Err(message) = self.validate_format_triple() {
            engine_bail!("ember::resource::Texture", "{}", message);
        }
    }
}

impl Resource for Texture {
    fn current_version(&self) -> u64 {
        self.state.current_version()
    }

    fn mark_dirty(&self) {
        self.state.mark_dirty()
    }

    fn on_before_destruct(&self, callback: Box<dyn FnMut() + Send>) -> SubId {
        self.state.on_before_destruct(callback)
    }

    fn unsubscribe(&self, id: SubId) {
        self.state.unsubscribe(id)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.state.fire_before_destruct();
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
