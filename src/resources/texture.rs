use std::path::Path;

use anyhow::Context;

use crate::{
    data_structures::texture::{Texture, TextureRole},
    pipelines::lighting::TextureUnits,
    resources::load_binary,
};

pub async fn load_texture(
    path: impl AsRef<Path>,
    role: TextureRole,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let path = path.as_ref();
    let data = load_binary(path).await?;
    let texture = Texture::from_bytes(device, queue, &data, &path.display().to_string(), role)
        .with_context(|| format!("could not load texture {}", path.display()))?;
    log::debug!(
        "Loaded {:?} texture {} ({}x{})",
        role,
        path.display(),
        texture.size.0,
        texture.size.1
    );
    Ok(texture)
}

/// A color texture paired with a normal map, bound at the technique's units.
#[derive(Debug)]
pub struct TextureBindings {
    pub bind_group: wgpu::BindGroup,
}

impl TextureBindings {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        units: TextureUnits,
        color: &Texture,
        normal_map: &Texture,
    ) -> Self {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: units.color,
                    resource: wgpu::BindingResource::TextureView(&color.view),
                },
                wgpu::BindGroupEntry {
                    binding: units.color + 1,
                    resource: wgpu::BindingResource::Sampler(&color.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: units.normal_map,
                    resource: wgpu::BindingResource::TextureView(&normal_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: units.normal_map + 1,
                    resource: wgpu::BindingResource::Sampler(&normal_map.sampler),
                },
            ],
            label: Some(label),
        });
        Self { bind_group }
    }
}
