//! GLSL scalar/vector/matrix type tags used to describe a uniform
//! buffer's member list before computing its std140/std430 layout.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    I32,
    U32,
    F32,
    F64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type {
    scalar_type: ScalarType,
    grade: Grade,
}

impl Type {
    pub const fn new(scalar_type: ScalarType, grade: Grade) -> Self {
        Self { scalar_type, grade }
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }
}

/// Maps a Rust value type to its GLSL [`Type`] tag, and to the raw
/// bytes a material's uniform buffer stores for it. Mirrors the
/// lineage's `FromCPPType<T>()` template dispatch.
pub trait FromRustType {
    fn glsl_type() -> Type;

    /// Little-endian GPU-buffer bytes for `self`, sized to match
    /// [`Self::glsl_type`]'s (scalar, grade) pair.
    fn to_bytes(&self) -> Vec<u8>;
}

macro_rules! impl_scalar_from_rust_type {
    ($ty:ty, $scalar:expr) => {
        impl FromRustType for $ty {
            fn glsl_type() -> Type {
                Type::new($scalar, Grade::Scalar)
            }

            fn to_bytes(&self) -> Vec<u8> {
                self.to_ne_bytes().to_vec()
            }
        }
    };
}

macro_rules! impl_glam_from_rust_type {
    ($ty:ty, $grade:expr) => {
        impl FromRustType for $ty {
            fn glsl_type() -> Type {
                Type::new(ScalarType::F32, $grade)
            }

            fn to_bytes(&self) -> Vec<u8> {
                bytemuck::bytes_of(self).to_vec()
            }
        }
    };
}

impl FromRustType for bool {
    fn glsl_type() -> Type {
        Type::new(ScalarType::Bool, Grade::Scalar)
    }

    fn to_bytes(&self) -> Vec<u8> {
        (*self as u32).to_ne_bytes().to_vec()
    }
}

impl_scalar_from_rust_type!(i32, ScalarType::I32);
impl_scalar_from_rust_type!(u32, ScalarType::U32);
impl_scalar_from_rust_type!(f32, ScalarType::F32);
impl_scalar_from_rust_type!(f64, ScalarType::F64);
impl_glam_from_rust_type!(glam::Vec2, Grade::Vec2);
impl_glam_from_rust_type!(glam::Vec3, Grade::Vec3);
impl_glam_from_rust_type!(glam::Vec4, Grade::Vec4);
impl_glam_from_rust_type!(glam::Mat4, Grade::Mat4);

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
