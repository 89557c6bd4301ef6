use super::*;

#[test]
fn test_default_is_identity() {
    let t = Transform::default();
    assert_eq!(t.local(), Mat4::IDENTITY);
    assert_eq!(t.world(), Mat4::IDENTITY);
}

#[test]
fn test_update_local_applies_trs() {
    let mut t = Transform::default();
    t.set_position(Vec3::new(1.0, 2.0, 3.0));
    t.update_local();
    let (_, _, translation) = t.local().to_scale_rotation_translation();
    assert_eq!(translation, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_update_world_without_parent_equals_local() {
    let mut t = Transform::default();
    t.set_scale(Vec3::splat(2.0));
    t.update_local();
    t.update_world(None);
    assert_eq!(t.world(), t.local());
}

#[test]
fn test_update_world_with_parent_composes() {
    let mut parent = Transform::default();
    parent.set_position(Vec3::new(10.0, 0.0, 0.0));
    parent.update_local();
    parent.update_world(None);

    let mut child = Transform::default();
    child.set_position(Vec3::new(0.0, 5.0, 0.0));
    child.update_local();
    child.update_world(Some(parent.world()));

    let (_, _, translation) = child.world().to_scale_rotation_translation();
    assert_eq!(translation, Vec3::new(10.0, 5.0, 0.0));
}
