use std::sync::Arc;
use glam::{Mat4, Vec3};
use crate::camera::Frustum;
use crate::glsl::VariableList;
use crate::renderer::MockBackend;
use crate::resource::{BufferLayoutKind, Geometry, LayoutKey, Material, MaterialShader, AABB};
use crate::scene::{CameraComponent, MeshComponent, SceneGraph};
use super::*;

fn triangle_mesh() -> MeshComponent {
    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
    let mut bytes = Vec::new();
    for p in positions {
        bytes.extend_from_slice(bytemuck::bytes_of(&p));
    }
    let geometry = Arc::new(Geometry::new(LayoutKey::POSITION, bytes, None, AABB::from_points(positions)).unwrap());
    let mut variables = VariableList::new();
    variables.add::<f32>("opacity");
    let shader = Arc::new(MaterialShader::new(BufferLayoutKind::Std140, &variables, Vec::new()));
    let material = Arc::new(Material::new(shader));
    MeshComponent { geometry, material }
}

#[test]
fn mounting_a_mesh_node_produces_one_bundle_item() {
    let mut graph = SceneGraph::new();
    let node = graph.create_node("triangle");
    graph.attach(node, graph.root());
    graph.add_component(node, triangle_mesh());

    let mut scene = RenderScene::new();
    let mut backend = MockBackend::new();
    scene.update_stage1(&mut graph);
    scene.update_stage2(&mut backend);

    let total_items: usize = scene.render_bundles().values().map(Vec::len).sum();
    assert_eq!(total_items, 1);
}

#[test]
fn destroying_a_mesh_node_removes_its_bundle_item() {
    let mut graph = SceneGraph::new();
    let node = graph.create_node("triangle");
    graph.attach(node, graph.root());
    graph.add_component(node, triangle_mesh());

    let mut scene = RenderScene::new();
    let mut backend = MockBackend::new();
    scene.update_stage1(&mut graph);
    scene.update_stage2(&mut backend);

    graph.destroy(node);
    scene.update_stage1(&mut graph);
    scene.update_stage2(&mut backend);

    let total_items: usize = scene.render_bundles().values().map(Vec::len).sum();
    assert_eq!(total_items, 0);
}

#[test]
fn moving_a_mounted_mesh_updates_its_bundle_item_transform() {
    let mut graph = SceneGraph::new();
    let node = graph.create_node("triangle");
    graph.attach(node, graph.root());
    graph.add_component(node, triangle_mesh());

    let mut scene = RenderScene::new();
    let mut backend = MockBackend::new();
    scene.update_stage1(&mut graph);
    scene.update_stage2(&mut backend);

    graph.set_local_position(node, Vec3::new(3.0, 0.0, 0.0));
    graph.update_transforms();
    scene.update_stage1(&mut graph);
    scene.update_stage2(&mut backend);

    let item = scene.render_bundles().values().flatten().next().unwrap();
    assert_eq!(item.local_to_world.transform_point3(Vec3::ZERO), Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn render_camera_reflects_the_mounted_camera_component() {
    let mut graph = SceneGraph::new();
    let node = graph.create_node("camera");
    graph.attach(node, graph.root());
    graph.set_local_position(node, Vec3::new(0.0, 0.0, 5.0));
    graph.update_transforms();

    let projection = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
    graph.add_component(node, CameraComponent { projection, frustum: Frustum::from_view_projection(&projection) });

    let mut scene = RenderScene::new();
    let mut backend = MockBackend::new();
    scene.update_stage1(&mut graph);
    scene.update_stage2(&mut backend);

    let camera = scene.render_camera();
    assert_eq!(camera.projection, projection);
    assert_eq!(camera.view.transform_point3(Vec3::new(0.0, 0.0, 5.0)), Vec3::ZERO);
}

#[test]
#[should_panic(expected = "no camera")]
fn render_camera_without_a_mounted_camera_is_fatal() {
    let mut graph = SceneGraph::new();
    let mut scene = RenderScene::new();
    let mut backend = MockBackend::new();
    scene.update_stage1(&mut graph);
    scene.update_stage2(&mut backend);
    scene.render_camera();
}
