//! CPU-side geometry resource.
//!
//! A geometry owns one tightly packed, interleaved vertex region and an
//! optional 32-bit index array. Its layout key is a bitset over which
//! attributes are present; attribute order within the interleaved
//! stride is always position -> normal -> uv -> color.

use bitflags::bitflags;
use glam::Vec3;
use crate::resource::resource::{Resource, ResourceState, SubId};
use crate::engine_bail;
use crate::engine_panic;
use crate::error::EngineResult;

bitflags! {
    /// Which vertex attributes a geometry carries. Determines both the
    /// interleaved stride and the render bundle key (§3.7/§3.8): two
    /// geometries with different layout keys can never share a bundle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayoutKey: u8 {
        const POSITION = 0b0001;
        const NORMAL   = 0b0010;
        const UV       = 0b0100;
        const COLOR    = 0b1000;
    }
}

impl LayoutKey {
    /// Number of `f32` components this attribute contributes to the
    /// interleaved stride, in packing order.
    const POSITION_COMPONENTS: usize = 3;
    const NORMAL_COMPONENTS: usize = 3;
    const UV_COMPONENTS: usize = 2;
    const COLOR_COMPONENTS: usize = 4;

    /// Byte offset of `attr` within one interleaved vertex, or `None` if
    /// `attr` is not part of this layout.
    pub fn attribute_offset(&self, attr: LayoutKey) -> Option<usize> {
        if !self.contains(attr) {
            return None;
        }
        let mut offset = 0usize;
        for (flag, components) in [
            (LayoutKey::POSITION, Self::POSITION_COMPONENTS),
            (LayoutKey::NORMAL, Self::NORMAL_COMPONENTS),
            (LayoutKey::UV, Self::UV_COMPONENTS),
            (LayoutKey::COLOR, Self::COLOR_COMPONENTS),
        ] {
            if flag == attr {
                return Some(offset);
            }
            if self.contains(flag) {
                offset += components * std::mem::size_of::<f32>();
            }
        }
        None
    }

    /// Total interleaved vertex stride in bytes for this layout.
    pub fn stride(&self) -> usize {
        let mut stride = 0usize;
        for (flag, components) in [
            (LayoutKey::POSITION, Self::POSITION_COMPONENTS),
            (LayoutKey::NORMAL, Self::NORMAL_COMPONENTS),
            (LayoutKey::UV, Self::UV_COMPONENTS),
            (LayoutKey::COLOR, Self::COLOR_COMPONENTS),
        ] {
            if self.contains(flag) {
                stride += components * std::mem::size_of::<f32>();
            }
        }
        stride
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub const EMPTY: AABB = AABB { min: Vec3::splat(f32::MAX), max: Vec3::splat(f32::MIN) };

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        aabb
    }
}

/// A typed, read-only view over one attribute's values across every
/// vertex. Valid only until the geometry is next resized: resizing may
/// reallocate the backing buffer and change the stride.
pub struct AttributeView<'a> {
    data: &'a [u8],
    offset: usize,
    stride: usize,
    components: usize,
    len: usize,
}

impl<'a> AttributeView<'a> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<&'a [f32]> {
        if index >= self.len {
            return None;
        }
        let start = index * self.stride + self.offset;
        let bytes = &self.data[start..start + self.components * std::mem::size_of::<f32>()];
        Some(bytemuck::cast_slice(bytes))
    }
}

/// CPU-side geometry: one interleaved vertex region, an optional index
/// array, and the AABB caches derive bundle/culling data from.
pub struct Geometry {
    layout: LayoutKey,
    vertex_data: Vec<u8>,
    vertex_count: u32,
    index_data: Option<Vec<u32>>,
    aabb: AABB,
    state: ResourceState,
}

impl Geometry {
    /// Build a geometry from raw interleaved vertex bytes (already
    /// packed per `layout`'s attribute order) and an optional index
    /// array.
    pub fn new(layout: LayoutKey, vertex_data: Vec<u8>, index_data: Option<Vec<u32>>, aabb: AABB) -> EngineResult<Self> {
        let stride = layout.stride();
        if stride == 0 {
            engine_bail!("ember::resource::Geometry", "layout key {:?} has no attributes", layout);
        }
        if vertex_data.len() % stride != 0 {
            engine_bail!("ember::resource::Geometry",
                "vertex data size {} is not a multiple of stride {}", vertex_data.len(), stride);
        }
        let vertex_count = (vertex_data.len() / stride) as u32;
        Ok(Self {
            layout,
            vertex_data,
            vertex_count,
            index_data,
            aabb,
            state: ResourceState::new(),
        })
    }

    pub fn layout(&self) -> LayoutKey {
        self.layout
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_data.as_ref().map_or(0, |d| d.len() as u32)
    }

    pub fn is_indexed(&self) -> bool {
        self.index_data.is_some()
    }

    pub fn aabb(&self) -> AABB {
        self.aabb
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertex_data
    }

    pub fn index_bytes(&self) -> Option<&[u32]> {
        self.index_data.as_deref()
    }

    /// A typed view over `attr`'s values. `None` if `attr` is not part
    /// of this geometry's layout. Fatal if `attr` is requested but
    /// missing from the layout and the caller relies on the value being
    /// present (§7, ContractViolation) — callers that can tolerate a
    /// missing attribute should check `layout().contains(attr)` first.
    pub fn attribute(&self, attr: LayoutKey) -> Option<AttributeView<'_>> {
        let offset = self.layout.attribute_offset(attr)?;
        let components = match attr {
            LayoutKey::POSITION => LayoutKey::POSITION_COMPONENTS,
            LayoutKey::NORMAL => LayoutKey::NORMAL_COMPONENTS,
            LayoutKey::UV => LayoutKey::UV_COMPONENTS,
            LayoutKey::COLOR => LayoutKey::COLOR_COMPONENTS,
            _ => engine_panic!("ember::resource::Geometry", "attribute() expects a single attribute flag, got {:?}", attr),
        };
        Some(AttributeView {
            data: &self.vertex_data,
            offset,
            stride: self.layout.stride(),
            components,
            len: self.vertex_count as usize,
        })
    }

    /// Require `attr` to be present, panicking (ContractViolation, §7)
    /// if the layout doesn't declare it.
    pub fn require_attribute(&self, attr: LayoutKey) -> AttributeView<'_> {
        match self.attribute(attr) {
            Some(view) => view,
            None => engine_panic!("ember::resource::Geometry",
                "attribute {:?} requested but not present in layout {:?}", attr, self.layout),
        }
    }

    /// Replace the vertex/index data and AABB. Invalidates any
    /// previously issued [`AttributeView`] (the backing buffer may be
    /// reallocated and the layout's stride may differ from before).
    pub fn resize(&mut self, vertex_data: Vec<u8>, index_data: Option<Vec<u32>>, aabb: AABB) -> EngineResult<()> {
        let stride = self.layout.stride();
        if vertex_data.len() % stride != 0 {
            engine_bail!("ember::resource::Geometry",
                "vertex data size {} is not a multiple of stride {}", vertex_data.len(), stride);
        }
        self.vertex_count = (vertex_data.len() / stride) as u32;
        self.vertex_data = vertex_data;
        self.index_data = index_data;
        self.aabb = aabb;
        self.mark_dirty();
        Ok(())
    }
}

impl Resource for Geometry {
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

impl Drop for Geometry {
    fn drop(&mut self) {
        self.state.fire_before_destruct();
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
