use std::path::PathBuf;

use bumpmap_demo::{
    config::AssetPaths,
    data_structures::texture::FLAT_NORMAL_TEXEL,
    resources::{load_binary, load_mesh_data},
};

fn shipped_assets() -> AssetPaths {
    AssetPaths {
        root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"),
        ..Default::default()
    }
}

#[tokio::test]
async fn shipped_box_is_a_closed_cube() {
    let assets = shipped_assets();
    let meshes = load_mesh_data(assets.mesh_path()).await.unwrap();
    let triangles: usize = meshes.iter().map(|m| m.triangle_count()).sum();
    assert_eq!(triangles, 12);
    for v in meshes.iter().flat_map(|m| m.vertices.iter()) {
        assert!(v.position.iter().all(|c| c.abs() <= 0.5));
        assert!(v.tangent.iter().all(|c| c.is_finite()));
    }
}

#[tokio::test]
async fn shipped_textures_decode() {
    let assets = shipped_assets();
    for name in [&assets.color_texture, &assets.normal_map, &assets.trivial_normal_map] {
        let bytes = load_binary(assets.resolve(name)).await.unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert!(img.width() > 0 && img.height() > 0, "{name}");
    }
}

#[tokio::test]
async fn trivial_normal_map_is_flat() {
    let assets = shipped_assets();
    let bytes = load_binary(assets.resolve(&assets.trivial_normal_map)).await.unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert!(img.pixels().all(|p| p.0 == FLAT_NORMAL_TEXEL));
}

#[tokio::test]
async fn missing_files_name_the_path() {
    let err = load_mesh_data("/definitely/not/here/box.obj").await.unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here/box.obj"));
}

#[tokio::test]
async fn unknown_mesh_formats_are_rejected() {
    let err = load_mesh_data("model.fbx").await.unwrap_err();
    assert!(format!("{err}").contains("fbx"));
}
