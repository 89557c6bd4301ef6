//! CPU-side material resource (§3.4).
//!
//! A [`MaterialShader`] is the shared, immutable description: a
//! std140/std430-laid-out parameter block plus a named texture-slot
//! list. A [`Material`] binds one shader, owns a byte buffer matching
//! the block, and owns one texture reference per slot. Parameter
//! get/set is name- and type-checked against the shader's layout;
//! mismatches are fatal (§7, ContractViolation).

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::resource::resource::{Resource, ResourceState, SubId};
use crate::resource::texture::Texture;
use crate::glsl::{FromRustType, Std140BufferLayout, Std430BufferLayout, Type, VariableList};
use crate::engine_bail;

/// Which buffer layout algorithm a material shader's parameter block uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferLayoutKind {
    Std140,
    Std430,
}

/// One parameter's location within a material's uniform buffer.
#[derive(Debug, Clone)]
pub struct MaterialParamSlot {
    pub name: String,
    pub ty: Type,
    pub array_size: usize,
    pub offset: usize,
    pub size: usize,
}

/// The shared, immutable shape of a material: its parameter block
/// layout and its texture slot names. Typically one shader is shared
/// by many [`Material`] instances.
pub struct MaterialShader {
    kind: BufferLayoutKind,
    params: Vec<MaterialParamSlot>,
    param_names: FxHashMap<String, usize>,
    buffer_size: usize,
    texture_slot_names: Vec<String>,
    texture_slot_index: FxHashMap<String, usize>,
}

impl MaterialShader {
    pub fn new(kind: BufferLayoutKind, variables: &VariableList, texture_slot_names: Vec<String>) -> Self {
        let (params, buffer_size) = match kind {
            BufferLayoutKind::Std430 => {
                let layout = Std430BufferLayout::build(variables);
                let params: Vec<MaterialParamSlot> = layout.variables().iter().map(|v| MaterialParamSlot {
                    name: v.name.clone(),
                    ty: v.ty,
                    array_size: v.array_size,
                    offset: v.buffer_offset,
                    size: v.data_size,
                }).collect();
                (params, layout.size())
            }
            BufferLayoutKind::Std140 => {
                let layout = Std140BufferLayout::build(variables);
                let params = layout.variables().iter().map(|v| MaterialParamSlot {
                    name: v.name.clone(),
                    ty: v.ty,
                    array_size: v.array_size,
                    offset: v.buffer_offset,
                    size: v.data_size,
                }).collect();
                (params, layout.size())
            }
        };

        let mut param_names = FxHashMap::default();
        for (i, param) in params.iter().enumerate() {
            param_names.insert(param.name.clone(), i);
        }

        let mut texture_slot_index = FxHashMap::default();
        for (i, name) in texture_slot_names.iter().enumerate() {
            if texture_slot_index.insert(name.clone(), i).is_some() {
                engine_bail!("ember::resource::MaterialShader", "duplicate texture slot name '{}'", name);
            }
        }

        Self { kind, params, param_names, buffer_size, texture_slot_names, texture_slot_index }
    }

    pub fn kind(&self) -> BufferLayoutKind {
        self.kind
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn param(&self, name: &str) -> Option<&MaterialParamSlot> {
        let idx = self.param_names.get(name)?;
        self.params.get(*idx)
    }

    pub fn params(&self) -> &[MaterialParamSlot] {
        &self.params
    }

    pub fn texture_slot_names(&self) -> &[String] {
        &self.texture_slot_names
    }

    pub fn texture_slot_index(&self, name: &str) -> Option<usize> {
        self.texture_slot_index.get(name).copied()
    }

    pub fn texture_slot_count(&self) -> usize {
        self.texture_slot_names.len()
    }
}

/// A bound material: one shader plus a concrete parameter buffer and
/// texture set.
pub struct Material {
    shader: Arc<MaterialShader>,
    uniform_buffer: Vec<u8>,
    textures: Vec<Option<Arc<Texture>>>,
    state: ResourceState,
}

impl Material {
    pub fn new(shader: Arc<MaterialShader>) -> Self {
        let uniform_buffer = vec![0u8; shader.buffer_size()];
        let textures = vec![None; shader.texture_slot_count()];
        Self { shader, uniform_buffer, textures, state: ResourceState::new() }
    }

    pub fn shader(&self) -> &Arc<MaterialShader> {
        &self.shader
    }

    pub fn uniform_buffer(&self) -> &[u8] {
        &self.uniform_buffer
    }

    /// Set a non-array parameter by name. Fatal (§7, ContractViolation)
    /// if `name` isn't declared by the shader, if it names an array
    /// parameter, or if `T`'s GLSL type doesn't match the declared one.
    /// Marks the material dirty so caches re-upload the buffer.
    pub fn set_param<T: FromRustType>(&mut self, name: &str, value: T) {
        let slot = match self.shader.param(name) {
            Some(slot) => slot,
            None => engine_bail!("ember::resource::Material", "no parameter named '{}' in material shader", name),
        };
        if slot.array_size != 0 {
            engine_bail!("ember::resource::Material", "parameter '{}' is an array; set_param only writes scalar/vector/matrix parameters", name);
        }
        if slot.ty != T::glsl_type() {
            engine_bail!("ember::resource::Material",
                "parameter '{}' type mismatch: shader declares {:?}, set_param called with {:?}",
                name, slot.ty, T::glsl_type());
        }
        let bytes = value.to_bytes();
        let offset = slot.offset;
        self.uniform_buffer[offset..offset + bytes.len()].copy_from_slice(&bytes);
        self.mark_dirty();
    }

    /// Raw bytes currently stored for `name`, or `None` if unknown.
    pub fn param_bytes(&self, name: &str) -> Option<&[u8]> {
        let slot = self.shader.param(name)?;
        Some(&self.uniform_buffer[slot.offset..slot.offset + slot.size])
    }

    /// Bind `texture` to `slot_name`. Fatal if the shader declares no
    /// such slot.
    pub fn set_texture(&mut self, slot_name: &str, texture: Arc<Texture>) {
        let idx = match self.shader.texture_slot_index(slot_name) {
            Some(idx) => idx,
            None => engine_bail!("ember::resource::Material", "no texture slot named '{}' in material shader", slot_name),
        };
        self.textures[idx] = Some(texture);
    }

    pub fn texture(&self, slot_name: &str) -> Option<&Arc<Texture>> {
        let idx = self.shader.texture_slot_index(slot_name)?;
        self.textures[idx].as_ref()
    }

    pub fn textures(&self) -> &[Option<Arc<Texture>>] {
        &self.textures
    }
}

impl Resource for Material {
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

impl Drop for Material {
    fn drop(&mut self) {
        self.state.fire_before_destruct();
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
