//! Loading meshes and textures from the asset directory.

use std::path::Path;

use anyhow::{Context, bail};

use crate::data_structures::model::{MeshData, Model};

pub mod mesh;
pub mod texture;

pub async fn load_string(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let path = path.as_ref();
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))
}

pub async fn load_binary(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    tokio::fs::read(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))
}

/// Read a mesh file into CPU meshes, choosing the parser by file extension.
pub async fn load_mesh_data(path: impl AsRef<Path>) -> anyhow::Result<Vec<MeshData>> {
    let path = path.as_ref();
    let file_name = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "obj" => {
            let text = load_string(path).await?;
            mesh::parse_obj(&text, &file_name)
        }
        "gltf" | "glb" => {
            let bytes = load_binary(path).await?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            // external buffers are few and small, read them synchronously
            mesh::parse_gltf(&bytes, &file_name, |uri| {
                let buffer_path = base.join(uri);
                std::fs::read(&buffer_path).with_context(|| format!("could not read {}", buffer_path.display()))
            })
        }
        other => bail!("unsupported mesh format '{other}' for {file_name}"),
    }
}

/// Load a mesh file and upload it.
pub async fn load_mesh(path: impl AsRef<Path>, device: &wgpu::Device) -> anyhow::Result<Model> {
    let path = path.as_ref();
    let data = load_mesh_data(path).await?;
    let triangles: usize = data.iter().map(MeshData::triangle_count).sum();
    log::info!(
        "Loaded {} ({} meshes, {} triangles)",
        path.display(),
        data.len(),
        triangles
    );
    Ok(Model::from_data(device, &path.display().to_string(), &data))
}
