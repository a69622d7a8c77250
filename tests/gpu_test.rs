#![cfg(feature = "integration-tests")]

use std::iter;

use bumpmap_demo::{
    data_structures::{
        model::{DrawModel, Model},
        texture::Texture,
    },
    pipelines::lighting::{DirectionalLight, LightingTechnique, TEXTURE_GROUP},
    resources::{mesh::parse_obj, texture::TextureBindings},
    transform::Pipeline,
};
use cgmath::Vector3;

use crate::common::test_utils::CUBE_OBJ;

mod common;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const SIZE: u32 = 64;

fn headless_device() -> (wgpu::Device, wgpu::Queue) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .expect("no adapter for the integration tests");
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .expect("no device for the integration tests")
    })
}

#[test]
fn overlapping_units_fail_init() {
    let (device, _) = headless_device();
    let mut technique = LightingTechnique::new();
    technique.set_color_texture_unit(0);
    technique.set_normal_map_texture_unit(1);
    assert!(technique.init(&device, FORMAT).is_err());
    assert!(!technique.is_initialized());
}

#[test]
fn cube_renders_offscreen() {
    let (device, queue) = headless_device();

    let mut technique = LightingTechnique::new();
    technique.init(&device, FORMAT).unwrap();
    technique.set_directional_light(&DirectionalLight {
        color: Vector3::new(1.0, 1.0, 1.0),
        ambient_intensity: 0.2,
        diffuse_intensity: 0.8,
        direction: Vector3::new(1.0, 0.0, 0.0),
    });

    let meshes = parse_obj(CUBE_OBJ, "cube.obj").unwrap();
    let model = Model::from_data(&device, "cube", &meshes);
    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.meshes[0].num_elements, 36);

    let color = Texture::create_default_normal_map(4, 4, &device, &queue);
    let normal = Texture::create_default_normal_map(2, 2, &device, &queue);
    let bindings = TextureBindings::new(
        &device,
        "test",
        technique.texture_layout().unwrap(),
        technique.texture_units(),
        &color,
        &normal,
    );

    let mut pipeline = Pipeline::new();
    pipeline.world_pos(0.0, 0.0, 3.0);
    technique.set_world_matrix(pipeline.world_trans());
    technique.set_wvp(pipeline.wvp_trans());
    technique.upload(&queue);

    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen"),
        size: wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    let depth = Texture::create_depth_texture(&device, [SIZE, SIZE], "depth");

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        technique.enable(&mut render_pass);
        render_pass.set_bind_group(TEXTURE_GROUP, &bindings.bind_group, &[]);
        render_pass.draw_model(&model);
    }
    queue.submit(iter::once(encoder.finish()));
    let error = futures::executor::block_on(device.pop_error_scope());
    assert!(error.is_none(), "{error:?}");
}
