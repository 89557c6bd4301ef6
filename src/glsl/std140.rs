//! std140 uniform buffer layout builder (§4.7).
//!
//! Identical packing strategy to [`crate::glsl::std430::Std430BufferLayout`]
//! except every array element is rounded up to a multiple of vec4 (16
//! bytes), and an array element's alignment is its (rounded) size
//! divided by its row count.

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

pub struct Std140BufferLayout {
    variables: Vec<LaidOutVariable>,
    by_name: FxHashMap<String, usize>,
    size: usize,
}

const VEC4_SIZE: usize = 16;

fn scalar_size_bytes(scalar: ScalarType) -> usize {
    if scalar == ScalarType::F64 { 8 } else { 4 }
}

fn components_from_grade(grade: Grade) -> usize {
    match grade {
        Grade::Scalar => 1,
        Grade::Vec2 => 2,
        Grade::Vec3 => 4,
        Grade::Vec4 => 4,
        Grade::Mat4 => 16,
    }
}

fn vectors_from_grade(grade: Grade) -> usize {
    match grade {
        Grade::Mat4 => 4,
        _ => 1,
    }
}

fn type_size(ty: Type) -> usize {
    components_from_grade(ty.grade()) * scalar_size_bytes(ty.scalar_type())
}

fn type_alignment(ty: Type) -> usize {
    type_size(ty) / vectors_from_grade(ty.grade())
}

impl Std140BufferLayout {
    pub fn build(variable_list: &VariableList) -> Self {
        let mut variables: Vec<LaidOutVariable> = variable_list.variables().iter().map(|v| {
            let is_array = v.array_size != 0;
            let (size, alignment) = if is_array {
                let mut rounded = type_size(v.ty);
                let remainder = rounded % VEC4_SIZE;
                if remainder != 0 {
                    rounded += VEC4_SIZE - remainder;
                }
                let alignment = rounded / vectors_from_grade(v.ty.grade());
                (rounded * v.array_size, alignment)
            } else {
                (type_size(v.ty), type_alignment(v.ty))
            };

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
            None => engine_bail!("ember::glsl::Std140BufferLayout", "no variable named '{}' found in std140 buffer layout", name),
        }
    }
}

#[cfg(test)]
#[path = "std140_tests.rs"]
mod tests;
