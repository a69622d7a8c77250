//! World, view and projection math.
//!
//! [`Pipeline`] collects the per-object transform (scale, rotation, world
//! position), the camera and the perspective projection, and turns them into
//! the world and world-view-projection matrices the lighting technique uploads.

use cgmath::{Deg, Matrix4, Point3, Vector3};

/// cgmath produces OpenGL clip space (z in -1..1), wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective projection parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PersProjInfo {
    pub fov: Deg<f32>,
    pub width: f32,
    pub height: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl PersProjInfo {
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
    }

    /// Projection matrix in wgpu clip space.
    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fov, self.aspect(), self.z_near, self.z_far)
    }
}

#[derive(Clone, Copy, Debug)]
struct CameraInfo {
    pos: Point3<f32>,
    target: Vector3<f32>,
    up: Vector3<f32>,
}

/// Builder for the transforms of a single draw.
#[derive(Clone, Debug)]
pub struct Pipeline {
    scale: Vector3<f32>,
    world_pos: Vector3<f32>,
    // degrees around x, y, z
    rotate_info: Vector3<f32>,
    camera: Option<CameraInfo>,
    pers_proj_info: Option<PersProjInfo>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            world_pos: Vector3::new(0.0, 0.0, 0.0),
            rotate_info: Vector3::new(0.0, 0.0, 0.0),
            camera: None,
            pers_proj_info: None,
        }
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn world_pos(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.world_pos = Vector3::new(x, y, z);
        self
    }

    /// Rotation angles are in degrees.
    pub fn rotate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotate_info = Vector3::new(x, y, z);
        self
    }

    /// `target` is the viewing direction, not a point.
    pub fn set_camera(
        &mut self,
        pos: Point3<f32>,
        target: Vector3<f32>,
        up: Vector3<f32>,
    ) -> &mut Self {
        self.camera = Some(CameraInfo { pos, target, up });
        self
    }

    pub fn set_perspective_proj(&mut self, info: PersProjInfo) -> &mut Self {
        self.pers_proj_info = Some(info);
        self
    }

    /// Translation * Rz * Ry * Rx * Scale.
    pub fn world_trans(&self) -> Matrix4<f32> {
        let scale = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        let rotation = Matrix4::from_angle_z(Deg(self.rotate_info.z))
            * Matrix4::from_angle_y(Deg(self.rotate_info.y))
            * Matrix4::from_angle_x(Deg(self.rotate_info.x));
        let translation = Matrix4::from_translation(self.world_pos);
        translation * rotation * scale
    }

    /// Identity when no camera was set.
    pub fn view_trans(&self) -> Matrix4<f32> {
        match self.camera {
            Some(camera) => Matrix4::look_to_rh(camera.pos, camera.target, camera.up),
            None => Matrix4::from_scale(1.0),
        }
    }

    /// Identity when no projection was set.
    pub fn proj_trans(&self) -> Matrix4<f32> {
        match self.pers_proj_info {
            Some(info) => info.matrix(),
            None => Matrix4::from_scale(1.0),
        }
    }

    pub fn wvp_trans(&self) -> Matrix4<f32> {
        self.proj_trans() * self.view_trans() * self.world_trans()
    }
}
