//! The bump mapping demo.
//!
//! [`BumpMapDemo`] owns the camera, the lighting technique, the mesh and its
//! textures. The windowing loop in [`crate::flow`] drives it through
//! [`BumpMapDemo::init`], [`BumpMapDemo::render_scene`] and the input
//! callbacks.

use std::iter;

use anyhow::Context as _;
use futures::future::try_join3;
use winit::keyboard::KeyCode;

use crate::{
    camera::Camera,
    config::DemoConfig,
    context::Context,
    data_structures::{
        model::{DrawModel, Model},
        texture::{Texture, TextureRole},
    },
    pipelines::lighting::{DirectionalLight, LightingTechnique, TEXTURE_GROUP},
    resources::{
        load_mesh,
        texture::{TextureBindings, load_texture},
    },
    transform::{PersProjInfo, Pipeline},
};

/// What a character key asks the application to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Exit,
    ToggleBumpMap,
    None,
}

impl KeyAction {
    pub fn from_key(key: &str) -> Self {
        match key {
            "q" => KeyAction::Exit,
            "b" => KeyAction::ToggleBumpMap,
            _ => KeyAction::None,
        }
    }
}

/// The part of the demo that changes from frame to frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneState {
    /// Rotation of the object around Y, in degrees.
    pub scale: f32,
    pub bump_map_enabled: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            scale: 0.0,
            bump_map_enabled: true,
        }
    }
}

impl SceneState {
    pub fn tick(&mut self, step: f32) {
        self.scale += step;
    }

    pub fn toggle_bump_map(&mut self) -> bool {
        self.bump_map_enabled = !self.bump_map_enabled;
        self.bump_map_enabled
    }
}

/// GPU side of the scene, alive between a successful `init` and drop.
#[derive(Debug)]
struct SceneResources {
    model: Model,
    #[allow(unused)]
    color_texture: Texture,
    #[allow(unused)]
    normal_map: Texture,
    #[allow(unused)]
    trivial_normal_map: Texture,
    bumped: TextureBindings,
    flat: TextureBindings,
}

#[derive(Debug)]
pub struct BumpMapDemo {
    config: DemoConfig,
    state: SceneState,
    dir_light: DirectionalLight,
    pers_proj_info: PersProjInfo,
    camera: Option<Camera>,
    technique: LightingTechnique,
    resources: Option<SceneResources>,
}

impl BumpMapDemo {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            dir_light: config.light,
            pers_proj_info: config.projection,
            state: SceneState::default(),
            camera: None,
            technique: LightingTechnique::new(),
            resources: None,
            config,
        }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn projection(&self) -> PersProjInfo {
        self.pers_proj_info
    }

    pub fn is_initialized(&self) -> bool {
        self.resources.is_some()
    }

    /// Create the camera, the lighting technique, the mesh and the textures.
    ///
    /// Failures are logged before they are returned.
    pub async fn init(&mut self, ctx: &Context) -> anyhow::Result<()> {
        let result = self.try_init(ctx).await;
        if let Err(e) = &result {
            log::error!("{e:#}");
        }
        result
    }

    async fn try_init(&mut self, ctx: &Context) -> anyhow::Result<()> {
        let (width, height) = ctx.size();
        self.pers_proj_info.resize(width, height);

        let start = self.config.camera;
        self.camera = Some(Camera::new(width, height, start.position, start.target, start.up));

        let units = self.config.texture_units;
        self.technique.set_color_texture_unit(units.color);
        self.technique.set_normal_map_texture_unit(units.normal_map);
        if let Err(e) = self.technique.init(&ctx.device, ctx.config.format) {
            println!("Error initializing the lighting technique");
            return Err(e.context("Error initializing the lighting technique"));
        }
        self.technique.set_directional_light(&self.dir_light);

        let assets = &self.config.assets;
        let model = load_mesh(assets.mesh_path(), &ctx.device).await?;

        let (color_texture, normal_map, trivial_normal_map) = try_join3(
            load_texture(assets.resolve(&assets.color_texture), TextureRole::Color, &ctx.device, &ctx.queue),
            load_texture(assets.resolve(&assets.normal_map), TextureRole::NormalMap, &ctx.device, &ctx.queue),
            load_texture(
                assets.resolve(&assets.trivial_normal_map),
                TextureRole::NormalMap,
                &ctx.device,
                &ctx.queue,
            ),
        )
        .await?;

        let layout = self
            .technique
            .texture_layout()
            .context("lighting technique has no texture layout")?;
        let units = self.technique.texture_units();
        let bumped = TextureBindings::new(&ctx.device, "bumped", layout, units, &color_texture, &normal_map);
        let flat = TextureBindings::new(&ctx.device, "flat", layout, units, &color_texture, &trivial_normal_map);

        log::info!("Scene ready, bump mapping {}", on_off(self.state.bump_map_enabled));
        self.resources = Some(SceneResources {
            model,
            color_texture,
            normal_map,
            trivial_normal_map,
            bumped,
            flat,
        });
        Ok(())
    }

    /// Acquire the frame's target, then advance the camera and the rotation.
    ///
    /// Nothing moves when `acquire` fails.
    pub(crate) fn begin_frame<T>(
        &mut self,
        acquire: impl FnOnce() -> Result<T, wgpu::SurfaceError>,
    ) -> Result<T, wgpu::SurfaceError> {
        let target = acquire()?;
        if let Some(camera) = self.camera.as_mut() {
            camera.on_render();
        }
        self.state.tick(self.config.rotation_step);
        Ok(target)
    }

    /// Advance one frame and draw it.
    pub fn render_scene(&mut self, ctx: &Context) -> Result<(), wgpu::SurfaceError> {
        if self.camera.is_none() || self.resources.is_none() {
            return Ok(());
        }
        let output = self.begin_frame(|| ctx.surface.get_current_texture())?;
        let (Some(camera), Some(resources)) = (self.camera.as_ref(), self.resources.as_ref()) else {
            return Ok(());
        };

        let position = self.config.object_position;
        let mut pipeline = Pipeline::new();
        pipeline
            .rotate(0.0, self.state.scale, 0.0)
            .world_pos(position.x, position.y, position.z)
            .set_camera(camera.pos(), camera.target(), camera.up())
            .set_perspective_proj(self.pers_proj_info);
        self.technique.set_wvp(pipeline.wvp_trans());
        self.technique.set_world_matrix(pipeline.world_trans());
        self.technique.upload(&ctx.queue);

        let textures = if self.state.bump_map_enabled {
            &resources.bumped
        } else {
            &resources.flat
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.technique.enable(&mut render_pass);
            render_pass.set_bind_group(TEXTURE_GROUP, &textures.bind_group, &[]);
            render_pass.draw_model(&resources.model);
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Arrow keys move the camera.
    pub fn special_keyboard(&mut self, key: KeyCode) -> bool {
        match self.camera.as_mut() {
            Some(camera) => camera.on_keyboard(key),
            None => false,
        }
    }

    /// Character keys. The caller leaves the main loop on [`KeyAction::Exit`].
    pub fn keyboard(&mut self, key: &str) -> KeyAction {
        let action = KeyAction::from_key(key);
        if action == KeyAction::ToggleBumpMap {
            let enabled = self.state.toggle_bump_map();
            log::debug!("Bump mapping {}", on_off(enabled));
        }
        action
    }

    pub fn passive_mouse(&mut self, x: f64, y: f64) {
        if let Some(camera) = self.camera.as_mut() {
            camera.on_mouse(x, y);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.pers_proj_info.resize(width, height);
        if let Some(camera) = self.camera.as_mut() {
            camera.resize(width, height);
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
