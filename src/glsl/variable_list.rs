//! An ordered list of named, GLSL-typed variables — the input to the
//! std140/std430 layout builders.

use rustc_hash::FxHashSet;
use crate::glsl::types::{FromRustType, Type};
use crate::engine_bail;

#[derive(Debug, Clone)]
pub struct Variable {
    pub ty: Type,
    pub name: String,
    /// 0 means "not an array".
    pub array_size: usize,
}

#[derive(Debug, Clone, Default)]
pub struct VariableList {
    variables: Vec<Variable>,
    names: FxHashSet<String>,
}

impl VariableList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Add a non-array variable. Fatal (duplicate name, §7 Invariant) if
    /// `name` was already added.
    pub fn add<T: FromRustType>(&mut self, name: impl Into<String>) {
        self.add_array::<T>(name, 0);
    }

    /// Add an array variable with `array_size` elements (`array_size`
    /// must be nonzero).
    pub fn add_array<T: FromRustType>(&mut self, name: impl Into<String>, array_size: usize) {
        let name = name.into();
        if !self.names.insert(name.clone()) {
            engine_bail!("ember::glsl::VariableList", "duplicate variable name '{}'", name);
        }
        self.variables.push(Variable { ty: T::glsl_type(), name, array_size });
    }
}

#[cfg(test)]
#[path = "variable_list_tests.rs"]
mod tests;
