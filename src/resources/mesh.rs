use std::io::{BufReader, Cursor};

use anyhow::{Context, bail};
use cgmath::{InnerSpace, Vector2, Vector3};

use crate::data_structures::model::{MeshData, ModelVertex};

/**
 * Parse an OBJ file into CPU meshes.
 *
 * Faces are triangulated and re-indexed so positions, texture coordinates
 * and normals share one index. Materials are ignored, the demo binds its own
 * textures.
 */
pub fn parse_obj(obj_text: &str, file_name: &str) -> anyhow::Result<Vec<MeshData>> {
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));
    let (models, _materials) = tobj::load_obj_buf(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )
    .with_context(|| format!("could not parse OBJ {file_name}"))?;

    let meshes: Vec<MeshData> = models
        .iter()
        .map(|m| {
            let vertices = (0..m.mesh.positions.len() / 3)
                .map(|i| ModelVertex {
                    position: [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ],
                    // OBJ has v pointing up, wgpu samples with v pointing down
                    tex_coords: [
                        m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                    normal: [
                        m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                    tangent: [0.0; 3],
                    bitangent: [0.0; 3],
                })
                .collect::<Vec<_>>();
            let name = if m.name.is_empty() {
                file_name.to_string()
            } else {
                format!("{file_name}:{}", m.name)
            };
            let mut data = MeshData {
                name,
                vertices,
                indices: m.mesh.indices.clone(),
            };
            compute_tangents(&mut data);
            data
        })
        .filter(|data| {
            if data.is_empty() {
                log::warn!("Skipping empty mesh {} in {}", data.name, file_name);
            }
            !data.is_empty()
        })
        .collect();

    if meshes.is_empty() {
        bail!("{file_name} contains no triangles");
    }
    Ok(meshes)
}

/**
 * Parse a glTF document (either `.gltf` JSON or `.glb`) into CPU meshes.
 *
 * `load_buffer` resolves external buffer URIs. Tangents are taken from the
 * file when present and computed otherwise.
 */
pub fn parse_gltf<F>(bytes: &[u8], file_name: &str, mut load_buffer: F) -> anyhow::Result<Vec<MeshData>>
where
    F: FnMut(&str) -> anyhow::Result<Vec<u8>>,
{
    let gltf = gltf::Gltf::from_slice(bytes).with_context(|| format!("could not parse glTF {file_name}"))?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_deref() {
                Some(blob) => buffer_data.push(blob.into()),
                None => bail!("{file_name} references a binary chunk it does not contain"),
            },
            gltf::buffer::Source::Uri(uri) => buffer_data.push(load_buffer(uri)?),
        }
    }

    let mut meshes = Vec::new();
    for mesh in gltf.meshes() {
        for (primitive_idx, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping non-triangle primitive {} of mesh {} in {}",
                    primitive_idx,
                    mesh.index(),
                    file_name
                );
                continue;
            }
            let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));

            let mut vertices: Vec<ModelVertex> = match reader.read_positions() {
                Some(positions) => positions
                    .map(|position| ModelVertex {
                        position,
                        ..Default::default()
                    })
                    .collect(),
                None => continue,
            };
            if let Some(normals) = reader.read_normals() {
                vertices.iter_mut().zip(normals).for_each(|(v, n)| v.normal = n);
            }
            if let Some(tex_coords) = reader.read_tex_coords(0) {
                vertices
                    .iter_mut()
                    .zip(tex_coords.into_f32())
                    .for_each(|(v, uv)| v.tex_coords = uv);
            }
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };

            let mut data = MeshData {
                name: format!("{}:{}:{}", file_name, mesh.name().unwrap_or("mesh"), primitive_idx),
                vertices,
                indices,
            };
            if data.indices.iter().any(|&i| i as usize >= data.vertices.len()) {
                bail!("{} has indices past the end of its vertices", data.name);
            }

            match reader.read_tangents() {
                Some(tangents) => {
                    // glTF stores the bitangent sign in w
                    data.vertices.iter_mut().zip(tangents).for_each(|(v, t)| {
                        let tangent = Vector3::new(t[0], t[1], t[2]);
                        let normal = Vector3::from(v.normal);
                        v.tangent = tangent.into();
                        v.bitangent = (normal.cross(tangent) * t[3]).into();
                    });
                }
                None => compute_tangents(&mut data),
            }

            if data.is_empty() {
                log::warn!("Skipping empty primitive {}", data.name);
            } else {
                meshes.push(data);
            }
        }
    }

    if meshes.is_empty() {
        bail!("{file_name} contains no triangles");
    }
    Ok(meshes)
}

/**
 * Fill in per-vertex tangents and bitangents from positions and texture
 * coordinates.
 *
 * Every triangle contributes its tangent/bitangent to its three corners and
 * the sums are averaged. Triangles whose texture coordinates are degenerate
 * contribute nothing, and vertices no usable triangle touches keep zero
 * vectors; the shader falls back to the plain normal for those.
 */
pub fn compute_tangents(data: &mut MeshData) {
    let vertices = &mut data.vertices;
    for v in vertices.iter_mut() {
        v.tangent = [0.0; 3];
        v.bitangent = [0.0; 3];
    }
    let mut triangles_included = vec![0u32; vertices.len()];

    for c in data.indices.chunks_exact(3) {
        let (i0, i1, i2) = (c[0] as usize, c[1] as usize, c[2] as usize);
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }
        let (v0, v1, v2) = (vertices[i0], vertices[i1], vertices[i2]);

        let pos0 = Vector3::from(v0.position);
        let pos1 = Vector3::from(v1.position);
        let pos2 = Vector3::from(v2.position);

        let uv0 = Vector2::from(v0.tex_coords);
        let uv1 = Vector2::from(v1.tex_coords);
        let uv2 = Vector2::from(v2.tex_coords);

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // Solve
        //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // flipped for right-handed normal maps in wgpu's texture space
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for i in [i0, i1, i2] {
            vertices[i].tangent = (tangent + Vector3::from(vertices[i].tangent)).into();
            vertices[i].bitangent = (bitangent + Vector3::from(vertices[i].bitangent)).into();
            triangles_included[i] += 1;
        }
    }

    for (v, n) in vertices.iter_mut().zip(triangles_included) {
        if n == 0 {
            continue;
        }
        let tangent = Vector3::from(v.tangent);
        let bitangent = Vector3::from(v.bitangent);
        v.tangent = normalize_or_zero(tangent).into();
        v.bitangent = normalize_or_zero(bitangent).into();
    }
}

fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    if v.magnitude2() > f32::EPSILON * f32::EPSILON {
        v.normalize()
    } else {
        Vector3::new(0.0, 0.0, 0.0)
    }
}
