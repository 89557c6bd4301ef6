//! CPU-side sampler resource: filtering and addressing parameters for a
//! texture lookup. Cached identically to geometry/texture/material (§4.3),
//! keyed by pointer identity, producing a GPU sampler handle consumed by
//! the texture cache when a texture declares an attached sampler.

use crate::resource::resource::{Resource, ResourceState, SubId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

pub struct Sampler {
    min_filter: FilterMode,
    mag_filter: FilterMode,
    address_u: AddressMode,
    address_v: AddressMode,
    state: ResourceState,
}

impl Sampler {
    pub fn new(min_filter: FilterMode, mag_filter: FilterMode, address_u: AddressMode, address_v: AddressMode) -> Self {
        Self { min_filter, mag_filter, address_u, address_v, state: ResourceState::new() }
    }

    pub fn min_filter(&self) -> FilterMode {
        self.min_filter
    }

    pub fn mag_filter(&self) -> FilterMode {
        self.mag_filter
    }

    pub fn address_u(&self) -> AddressMode {
        self.address_u
    }

    pub fn address_v(&self) -> AddressMode {
        self.address_v
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(FilterMode::Linear, FilterMode::Linear, AddressMode::Repeat, AddressMode::Repeat)
    }
}

impl Resource for Sampler {
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

impl Drop for Sampler {
    fn drop(&mut self) {
        self.state.fire_before_destruct();
    }
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
