//! The lighting technique: one directional light plus normal mapping.
//!
//! A [`LightingTechnique`] owns the render pipeline, the transform and light
//! uniform buffers and the layout the material textures are bound with. The
//! setters only touch the CPU copies of the uniforms; [`LightingTechnique::upload`]
//! pushes them to the GPU before a draw.

use anyhow::{Context, bail};
use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::{mk_render_pipeline, mk_uniform_bind_group, mk_uniform_layout},
};

const SHADER_TEMPLATE: &str = include_str!("lighting.wgsl");

pub const TEXTURE_GROUP: u32 = 0;
pub const TRANSFORM_GROUP: u32 = 1;
pub const LIGHT_GROUP: u32 = 2;

/// Binding slots of the two material textures. Each texture occupies `unit`
/// and its sampler `unit + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureUnits {
    pub color: u32,
    pub normal_map: u32,
}

impl Default for TextureUnits {
    fn default() -> Self {
        Self {
            color: 0,
            normal_map: 2,
        }
    }
}

impl TextureUnits {
    pub fn validate(&self) -> anyhow::Result<()> {
        let color = self.color..self.color + 2;
        let normal = self.normal_map..self.normal_map + 2;
        if color.start < normal.end && normal.start < color.end {
            bail!(
                "texture units overlap: color uses {:?}, normal map uses {:?}",
                color,
                normal
            );
        }
        Ok(())
    }

    /// Fill the binding placeholders of a shader template.
    pub fn apply_to(&self, template: &str) -> String {
        template
            .replace("{{COLOR_TEXTURE_UNIT}}", &self.color.to_string())
            .replace("{{COLOR_SAMPLER_UNIT}}", &(self.color + 1).to_string())
            .replace("{{NORMAL_TEXTURE_UNIT}}", &self.normal_map.to_string())
            .replace("{{NORMAL_SAMPLER_UNIT}}", &(self.normal_map + 1).to_string())
    }

    /// Bind group layout for a color texture and a normal map at these units.
    pub fn layout(&self, device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                texture_entry(self.color),
                sampler_entry(self.color + 1),
                texture_entry(self.normal_map),
                sampler_entry(self.normal_map + 1),
            ],
            label: Some("color_normal_bind_group_layout"),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Vector3<f32>,
    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
    pub direction: Vector3<f32>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniform {
    pub color: [f32; 3],
    pub ambient_intensity: f32,
    pub direction: [f32; 3],
    pub diffuse_intensity: f32,
}

impl From<&DirectionalLight> for DirectionalLightUniform {
    fn from(light: &DirectionalLight) -> Self {
        let direction = if light.direction.magnitude2() > 0.0 {
            light.direction.normalize()
        } else {
            log::warn!("Directional light without a direction, pointing it down -Y");
            -Vector3::unit_y()
        };
        Self {
            color: light.color.into(),
            ambient_intensity: light.ambient_intensity,
            direction: direction.into(),
            diffuse_intensity: light.diffuse_intensity,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub wvp: [[f32; 4]; 4],
    pub world: [[f32; 4]; 4],
}

impl Default for TransformUniform {
    fn default() -> Self {
        Self {
            wvp: Matrix4::identity().into(),
            world: Matrix4::identity().into(),
        }
    }
}

#[derive(Debug)]
struct GpuResources {
    render_pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    transform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
}

#[derive(Debug, Default)]
pub struct LightingTechnique {
    units: TextureUnits,
    transform: TransformUniform,
    light: Option<DirectionalLightUniform>,
    gpu: Option<GpuResources>,
}

impl LightingTechnique {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the shader, layouts, buffers and pipeline for `color_format`.
    ///
    /// Texture units have to be set before this call, the shader bindings are
    /// generated from them.
    pub fn init(&mut self, device: &wgpu::Device, color_format: wgpu::TextureFormat) -> anyhow::Result<()> {
        self.units.validate().context("invalid texture units")?;

        let source = self.units.apply_to(SHADER_TEMPLATE);
        let shader = wgpu::ShaderModuleDescriptor {
            label: Some("Lighting Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        };

        let texture_layout = self.units.layout(device);
        let transform_layout = mk_uniform_layout(device, "transform_bind_group_layout");
        let light_layout = mk_uniform_layout(device, "light_bind_group_layout");

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Buffer"),
            contents: bytemuck::cast_slice(&[self.transform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_uniform = self.light.unwrap_or_else(bytemuck::Zeroable::zeroed);
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[light_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let transform_bind_group =
            mk_uniform_bind_group(device, "transform_bind_group", &transform_layout, &transform_buffer);
        let light_bind_group = mk_uniform_bind_group(device, "light_bind_group", &light_layout, &light_buffer);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lighting Pipeline Layout"),
            // order has to match TEXTURE_GROUP, TRANSFORM_GROUP, LIGHT_GROUP
            bind_group_layouts: &[&texture_layout, &transform_layout, &light_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = mk_render_pipeline(
            device,
            "Lighting Pipeline",
            &layout,
            color_format,
            Some(wgpu::BlendState::REPLACE),
            Some(Texture::DEPTH_FORMAT),
            &[ModelVertex::desc()],
            shader,
        );

        log::info!(
            "Lighting technique ready (color unit {}, normal map unit {})",
            self.units.color,
            self.units.normal_map
        );
        self.gpu = Some(GpuResources {
            render_pipeline,
            texture_layout,
            transform_buffer,
            transform_bind_group,
            light_buffer,
            light_bind_group,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    /// Set the pipeline and the per-frame bind groups on `render_pass`.
    pub fn enable(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        match &self.gpu {
            Some(gpu) => {
                render_pass.set_pipeline(&gpu.render_pipeline);
                render_pass.set_bind_group(TRANSFORM_GROUP, &gpu.transform_bind_group, &[]);
                render_pass.set_bind_group(LIGHT_GROUP, &gpu.light_bind_group, &[]);
            }
            None => log::warn!("Lighting technique enabled before init, nothing will be drawn"),
        }
    }

    pub fn set_directional_light(&mut self, light: &DirectionalLight) {
        self.light = Some(light.into());
    }

    pub fn set_wvp(&mut self, wvp: Matrix4<f32>) {
        self.transform.wvp = wvp.into();
    }

    pub fn set_world_matrix(&mut self, world: Matrix4<f32>) {
        self.transform.world = world.into();
    }

    /// Takes effect on the next [`init`](Self::init).
    pub fn set_color_texture_unit(&mut self, unit: u32) {
        self.units.color = unit;
    }

    /// Takes effect on the next [`init`](Self::init).
    pub fn set_normal_map_texture_unit(&mut self, unit: u32) {
        self.units.normal_map = unit;
    }

    pub fn texture_units(&self) -> TextureUnits {
        self.units
    }

    pub fn transform(&self) -> &TransformUniform {
        &self.transform
    }

    pub fn light(&self) -> Option<&DirectionalLightUniform> {
        self.light.as_ref()
    }

    /// Layout the material bind groups must be created with.
    pub fn texture_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.gpu.as_ref().map(|gpu| &gpu.texture_layout)
    }

    /// Write the CPU side uniforms to their buffers.
    pub fn upload(&self, queue: &wgpu::Queue) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        queue.write_buffer(&gpu.transform_buffer, 0, bytemuck::cast_slice(&[self.transform]));
        if let Some(light) = &self.light {
            queue.write_buffer(&gpu.light_buffer, 0, bytemuck::cast_slice(&[*light]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_placeholders_are_all_replaced() {
        let source = TextureUnits::default().apply_to(SHADER_TEMPLATE);
        assert!(!source.contains("{{"));
        assert!(source.contains("@group(0) @binding(2)\nvar t_normal"));
    }

    #[test]
    fn uniform_sizes_match_the_shader() {
        assert_eq!(std::mem::size_of::<DirectionalLightUniform>(), 32);
        assert_eq!(std::mem::size_of::<TransformUniform>(), 128);
    }
}
