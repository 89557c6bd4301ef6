use super::*;

fn triangle_vertices() -> Vec<u8> {
    let positions: [[f32; 3]; 3] = [[0.0, 1.0, 0.0], [-1.0, -1.0, 0.0], [1.0, -1.0, 0.0]];
    positions.iter().flat_map(|p| p.iter().flat_map(|f| f.to_ne_bytes())).collect()
}

#[test]
fn test_layout_key_stride() {
    assert_eq!(LayoutKey::POSITION.stride(), 12);
    assert_eq!((LayoutKey::POSITION | LayoutKey::UV).stride(), 20);
    assert_eq!((LayoutKey::POSITION | LayoutKey::NORMAL | LayoutKey::UV | LayoutKey::COLOR).stride(), 48);
}

#[test]
fn test_layout_key_attribute_offset_order() {
    let layout = LayoutKey::POSITION | LayoutKey::NORMAL | LayoutKey::UV | LayoutKey::COLOR;
    assert_eq!(layout.attribute_offset(LayoutKey::POSITION), Some(0));
    assert_eq!(layout.attribute_offset(LayoutKey::NORMAL), Some(12));
    assert_eq!(layout.attribute_offset(LayoutKey::UV), Some(24));
    assert_eq!(layout.attribute_offset(LayoutKey::COLOR), Some(32));
}

#[test]
fn test_layout_key_attribute_offset_missing() {
    let layout = LayoutKey::POSITION;
    assert_eq!(layout.attribute_offset(LayoutKey::UV), None);
}

#[test]
fn test_geometry_new_computes_vertex_count() {
    let geometry = Geometry::new(LayoutKey::POSITION, triangle_vertices(), None, AABB::EMPTY).unwrap();
    assert_eq!(geometry.vertex_count(), 3);
    assert_eq!(geometry.index_count(), 0);
    assert!(!geometry.is_indexed());
}

#[test]
fn test_geometry_new_rejects_misaligned_data() {
    let bad_data = vec![0u8; 13];
    let result = Geometry::new(LayoutKey::POSITION, bad_data, None, AABB::EMPTY);
    assert!(result.is_err());
}

#[test]
fn test_geometry_attribute_view_reads_values() {
    let geometry = Geometry::new(LayoutKey::POSITION, triangle_vertices(), None, AABB::EMPTY).unwrap();
    let positions = geometry.attribute(LayoutKey::POSITION).unwrap();
    assert_eq!(positions.len(), 3);
    assert_eq!(positions.get(0).unwrap(), &[0.0, 1.0, 0.0]);
    assert_eq!(positions.get(2).unwrap(), &[1.0, -1.0, 0.0]);
    assert!(positions.get(3).is_none());
}

#[test]
fn test_geometry_attribute_missing_returns_none() {
    let geometry = Geometry::new(LayoutKey::POSITION, triangle_vertices(), None, AABB::EMPTY).unwrap();
    assert!(geometry.attribute(LayoutKey::NORMAL).is_none());
}

#[test]
#[should_panic(expected = "not present in layout")]
fn test_geometry_require_attribute_panics_when_missing() {
    let geometry = Geometry::new(LayoutKey::POSITION, triangle_vertices(), None, AABB::EMPTY).unwrap();
    geometry.require_attribute(LayoutKey::NORMAL);
}

#[test]
fn test_geometry_resize_updates_counts_and_marks_dirty() {
    let mut geometry = Geometry::new(LayoutKey::POSITION, triangle_vertices(), None, AABB::EMPTY).unwrap();
    assert_eq!(geometry.current_version(), 0);

    let mut doubled = triangle_vertices();
    doubled.extend(triangle_vertices());
    geometry.resize(doubled, None, AABB::EMPTY).unwrap();

    assert_eq!(geometry.vertex_count(), 6);
    assert_eq!(geometry.current_version(), 1);
}

#[test]
fn test_aabb_from_points() {
    let aabb = AABB::from_points([
        glam::Vec3::new(-1.0, -1.0, -1.0),
        glam::Vec3::new(1.0, 2.0, 3.0),
    ]);
    assert_eq!(aabb.min, glam::Vec3::new(-1.0, -1.0, -1.0));
    assert_eq!(aabb.max, glam::Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_geometry_indexed() {
    let indices = vec![0u32, 1, 2];
    let geometry = Geometry::new(LayoutKey::POSITION, triangle_vertices(), Some(indices), AABB::EMPTY).unwrap();
    assert!(geometry.is_indexed());
    assert_eq!(geometry.index_count(), 3);
}
