use bumpmap_demo::{
    config::DemoConfig,
    transform::{PersProjInfo, Pipeline},
};
use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

use crate::common::test_utils::{approx_vec, is_finite, transform_point};

mod common;

#[test]
fn world_position_moves_the_origin() {
    let mut pipeline = Pipeline::new();
    pipeline.world_pos(0.0, 0.0, 3.0);
    let origin = transform_point(&pipeline.world_trans(), Vector3::new(0.0, 0.0, 0.0));
    assert!(approx_vec(origin, Vector3::new(0.0, 0.0, 3.0)));
}

#[test]
fn rotation_is_in_degrees_around_y() {
    let mut pipeline = Pipeline::new();
    pipeline.rotate(0.0, 90.0, 0.0).world_pos(0.0, 0.0, 3.0);
    let p = transform_point(&pipeline.world_trans(), Vector3::new(1.0, 0.0, 0.0));
    assert!(approx_vec(p, Vector3::new(0.0, 0.0, 2.0)), "{p:?}");
}

#[test]
fn scale_is_applied_before_rotation() {
    let mut pipeline = Pipeline::new();
    pipeline.scale(2.0, 1.0, 1.0).rotate(0.0, 90.0, 0.0);
    let p = transform_point(&pipeline.world_trans(), Vector3::new(1.0, 0.0, 0.0));
    assert!(approx_vec(p, Vector3::new(0.0, 0.0, -2.0)), "{p:?}");
}

#[test]
fn unset_view_and_projection_are_identity() {
    let pipeline = Pipeline::new();
    assert_eq!(pipeline.view_trans(), Matrix4::identity());
    assert_eq!(pipeline.proj_trans(), Matrix4::identity());
    assert_eq!(pipeline.wvp_trans(), Matrix4::identity());
}

#[test]
fn demo_object_lands_inside_the_clip_volume() {
    let config = DemoConfig::default();
    let camera = config.camera;
    let mut pipeline = Pipeline::new();
    pipeline
        .rotate(0.0, 0.01, 0.0)
        .world_pos(0.0, 0.0, 3.0)
        .set_camera(camera.position, camera.target, camera.up)
        .set_perspective_proj(config.projection);
    let wvp = pipeline.wvp_trans();
    assert!(is_finite(&wvp));

    let clip = wvp * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
    assert!(clip.w > 0.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
    assert!((0.0..=1.0).contains(&ndc.z), "depth {}", ndc.z);
}

#[test]
fn zero_height_does_not_produce_nan() {
    let info = PersProjInfo {
        fov: Deg(60.0),
        width: 800.0,
        height: 0.0,
        z_near: 1.0,
        z_far: 100.0,
    };
    assert_eq!(info.aspect(), 1.0);
    assert!(is_finite(&info.matrix()));
}

#[test]
fn resize_updates_the_aspect() {
    let mut info = DemoConfig::default().projection;
    info.resize(1000, 500);
    assert_eq!(info.aspect(), 2.0);
}
