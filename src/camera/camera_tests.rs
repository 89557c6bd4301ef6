use glam::{Mat4, Vec3};
use super::*;

fn create_test_frustum() -> Frustum {
    let vp = Mat4::perspective_rh(
        std::f32::consts::FRAC_PI_4,
        16.0 / 9.0,
        0.1,
        100.0,
    );
    Frustum::from_view_projection(&vp)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_camera_new() {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    let frustum = create_test_frustum();

    let camera = Camera::new(view, proj, frustum);

    assert_eq!(*camera.view_matrix(), view);
    assert_eq!(*camera.projection_matrix(), proj);
}

#[test]
fn test_camera_from_view_projection() {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);

    let camera = Camera::from_view_projection(view, proj);

    let expected = Frustum::from_view_projection(&(proj * view));
    assert_eq!(camera.frustum().planes, expected.planes);
}

// ============================================================================
// view_projection_matrix
// ============================================================================

#[test]
fn test_view_projection_matrix() {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    let frustum = create_test_frustum();

    let camera = Camera::new(view, proj, frustum);

    let expected = proj * view;
    assert_eq!(camera.view_projection_matrix(), expected);
}

// ============================================================================
// Setters
// ============================================================================

#[test]
fn test_set_view() {
    let frustum = create_test_frustum();
    let mut camera = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY, frustum);

    let new_view = Mat4::look_at_rh(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
    camera.set_view(new_view);

    assert_eq!(*camera.view_matrix(), new_view);
}

#[test]
fn test_set_projection() {
    let frustum = create_test_frustum();
    let mut camera = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY, frustum);

    let new_proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.5, 500.0);
    camera.set_projection(new_proj);

    assert_eq!(*camera.projection_matrix(), new_proj);
}

#[test]
fn test_set_frustum() {
    let frustum = create_test_frustum();
    let mut camera = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY, frustum);

    let new_frustum = Frustum::from_view_projection(&Mat4::IDENTITY);
    camera.set_frustum(new_frustum);

    assert_eq!(camera.frustum().planes[0], new_frustum.planes[0]);
}

#[test]
fn test_refresh_frustum() {
    let frustum = create_test_frustum();
    let mut camera = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY, frustum);

    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    camera.set_view(view);
    camera.set_projection(proj);
    camera.refresh_frustum();

    let expected = Frustum::from_view_projection(&(proj * view));
    assert_eq!(camera.frustum().planes, expected.planes);
}

// ============================================================================
// Clone
// ============================================================================

#[test]
fn test_camera_clone() {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    let frustum = create_test_frustum();

    let camera = Camera::new(view, proj, frustum);
    let cloned = camera.clone();

    assert_eq!(*cloned.view_matrix(), view);
    assert_eq!(*cloned.projection_matrix(), proj);
}
