use super::*;
use crate::glsl::variable_list::VariableList;

#[test]
fn test_scalar_only_struct_packs_sequentially() {
    let mut vars = VariableList::new();
    vars.add::<f32>("a");
    vars.add::<f32>("b");
    let layout = Std140BufferLayout::build(&vars);
    assert_eq!(layout.variable("a").buffer_offset, 0);
    assert_eq!(layout.variable("b").buffer_offset, 4);
    assert_eq!(layout.size(), 8);
}

#[test]
fn test_bare_vec3_always_rounds_to_vec4_width() {
    let mut vars = VariableList::new();
    vars.add::<f32>("a");
    vars.add::<glam::Vec3>("b");
    vars.add::<f32>("c");
    vars.add::<glam::Mat4>("m");
    let layout = Std140BufferLayout::build(&vars);

    assert_eq!(layout.variable("m").buffer_offset, 0);
    assert_eq!(layout.variable("b").buffer_offset, 64);
    assert_eq!(layout.variable("b").data_size, 16);
    assert_eq!(layout.variable("a").buffer_offset, 80);
    assert_eq!(layout.variable("c").buffer_offset, 84);
    assert_eq!(layout.size(), 88);
}

#[test]
fn test_vec3_array_stride_is_16_bytes() {
    let mut vars = VariableList::new();
    vars.add_array::<glam::Vec3>("positions", 4);
    let layout = Std140BufferLayout::build(&vars);
    let v = layout.variable("positions");
    assert_eq!(v.data_alignment, 16);
    assert_eq!(v.data_size, 64);
}

#[test]
fn test_unknown_variable_name_panics() {
    let vars = VariableList::new();
    let layout = Std140BufferLayout::build(&vars);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        layout.variable("missing");
    }));
    assert!(result.is_err());
}
