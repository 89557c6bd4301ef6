//! std430 uniform/storage buffer layout builder (§4.7).
//!
//! Assignment order is descending alignment (a deterministic packing
//! heuristic, not the declaration order); each field is then rounded up
//! to its own alignment. Vec3 arrays pack each element to 12 bytes
//! (tightly, unlike std140's vec4-rounded elements).

use rustc_hash::FxHashMap;
use crate::glsl::types::{Grade, ScalarType, Type};
use crate::glsl::variable_list::VariableList;
use crate::engine_bail;

#[derive(Debug, Clone)]
pub struct LaidOutVariable {
    pub name: String,
    pub ty: Type,
    pub array_size: usize,
    pub buffer_offset: usize,
    pub data_size: usize,
    pub data_alignment: usize,
}

pub struct Std430BufferLayout {
    variables: Vec<LaidOutVariable>,
    by_name: FxHashMap<String, usize>,
    size: usize,
}

fn scalar_size_bytes(scalar: ScalarType) -> usize {
    if scalar == ScalarType::F64 { 8 } else { 4 }
}

/// Number of components the *value itself* occupies. Vec3 is always
/// tight (3 components) regardless of array membership.
fn size_components_from_grade(grade: Grade) -> usize {
    match grade {
        Grade::Scalar => 1,
        Grade::Vec2 => 2,
        Grade::Vec3 => 3,
        Grade::Vec4 => 4,
        Grade::Mat4 => 16,
    }
}

/// Number of components used to derive *alignment*. A bare (non-array)
/// vec3 aligns as if it were a vec4; a vec3 array element aligns tight
/// at 3 components so consecutive elements pack with no padding.
fn alignment_components_from_grade(grade: Grade, is_inside_array: bool) -> usize {
    match grade {
        Grade::Vec3 => if is_inside_array { 3 } else { 4 },
        other => size_components_from_grade(other),
    }
}

fn vectors_from_grade(grade: Grade) -> usize {
    match grade {
        Grade::Mat4 => 4,
        _ => 1,
    }
}

fn type_size(ty: Type) -> usize {
    size_components_from_grade(ty.grade()) * scalar_size_bytes(ty.scalar_type())
}

fn type_alignment(ty: Type, is_inside_array: bool) -> usize {
    alignment_components_from_grade(ty.grade(), is_inside_array) * scalar_size_bytes(ty.scalar_type())
        / vectors_from_grade(ty.grade())
}

impl Std430BufferLayout {
    pub fn build(variable_list: &VariableList) -> Self {
        let mut variables: Vec<LaidOutVariable> = variable_list.variables().iter().map(|v| {
            let is_array = v.array_size != 0;
            let alignment = type_alignment(v.ty, is_array);
            let mut size = type_size(v.ty);
            if is_array {
                size *= v.array_size;
            }
            LaidOutVariable {
                name: v.name.clone(),
                ty: v.ty,
                array_size: v.array_size,
                buffer_offset: 0,
                data_size: size,
                data_alignment: alignment,
            }
        }).collect();

        variables.sort_by(|a, b| {
            b.data_alignment.cmp(&a.data_alignment).then(b.data_size.cmp(&a.data_size))
        });

        let mut offset = 0usize;
        for variable in &mut variables {
            let remainder = offset % variable.data_alignment;
            if remainder != 0 {
                offset += variable.data_alignment - remainder;
            }
            variable.buffer_offset = offset;
            offset += variable.data_size;
        }

        let by_name = variables.iter().enumerate().map(|(i, v)| (v.name.clone(), i)).collect();

        Self { variables, by_name, size: offset }
    }

    pub fn variables(&self) -> &[LaidOutVariable] {
        &self.variables
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn variable(&self, name: &str) -> &LaidOutVariable {
        match self.by_name.get(name) {
            Some(&idx) => &self.variables[idx],
            None => engine_bail!("ember::glsl::Std430BufferLayout", "no variable named '{}' found in std430 buffer layout", name),
        }
    }
}

#[cfg(test)]
#[path = "std430_tests.rs"]
mod tests;
