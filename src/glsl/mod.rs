//! GLSL type tagging and uniform/storage buffer layout computation (§4.7).
//!
//! [`VariableList`] describes a struct's members in declaration order;
//! [`std430::Std430BufferLayout`] and [`std140::Std140BufferLayout`]
//! independently compute where each member lands in a packed buffer.

pub mod types;
pub mod variable_list;
pub mod std140;
pub mod std430;

pub use types::{FromRustType, Grade, ScalarType, Type};
pub use variable_list::{Variable, VariableList};
pub use std140::Std140BufferLayout;
pub use std430::Std430BufferLayout;
