use std::path::PathBuf;

use bumpmap_demo::config::{DemoConfig, WINDOW_HEIGHT, WINDOW_WIDTH};

const NO_ARGS: [&str; 0] = [];

#[test]
fn no_arguments_keep_the_defaults() {
    let config = DemoConfig::from_args(NO_ARGS);
    assert_eq!(config.title, "Tutorial 26");
    assert_eq!((config.width, config.height), (WINDOW_WIDTH, WINDOW_HEIGHT));
    assert_eq!(config.assets.mesh_path(), PathBuf::from("./assets/box.obj"));
    assert_eq!(config.texture_units.color, 0);
    assert_eq!(config.texture_units.normal_map, 2);
    assert_eq!(config.backends, wgpu::Backends::PRIMARY);
}

#[test]
fn overrides_are_applied() {
    let config = DemoConfig::from_args([
        "--assets=/tmp/demo",
        "--mesh=sphere.glb",
        "--size=800x600",
        "--gpu-backend=vulkan",
    ]);
    assert_eq!(config.assets.mesh_path(), PathBuf::from("/tmp/demo/sphere.glb"));
    assert_eq!(config.assets.resolve("bricks.png"), PathBuf::from("/tmp/demo/bricks.png"));
    assert_eq!((config.width, config.height), (800, 600));
    assert_eq!((config.projection.width, config.projection.height), (800.0, 600.0));
    assert_eq!(config.backends, wgpu::Backends::VULKAN);
}

#[test]
fn width_and_height_can_be_set_separately() {
    let config = DemoConfig::from_args(["--width=640", "--height=480"]);
    assert_eq!((config.width, config.height), (640, 480));
    let config = DemoConfig::from_args(["--height=480"]);
    assert_eq!((config.width, config.height), (WINDOW_WIDTH, 480));
}

#[test]
fn malformed_values_are_ignored() {
    let config = DemoConfig::from_args(["--size=big", "--width=-3", "--gpu-backend=glide", "--unknown"]);
    assert_eq!((config.width, config.height), (WINDOW_WIDTH, WINDOW_HEIGHT));
    assert_eq!(config.backends, wgpu::Backends::PRIMARY);
}

#[test]
fn zero_size_is_clamped() {
    let config = DemoConfig::from_args(["--size=0x0"]);
    assert_eq!((config.width, config.height), (1, 1));
}
