//! First-person camera driven by the arrow keys and the mouse.
//!
//! The camera keeps its orientation as yaw/pitch angles and derives the view
//! direction and up vector from them. Moving the cursor turns the camera, and
//! leaving the cursor resting near a window edge keeps turning it every frame
//! (see [`Camera::on_render`]).

use cgmath::{Deg, InnerSpace, Point3, Vector3};
use winit::keyboard::KeyCode;

/// Distance moved per arrow key event.
pub const STEP_SCALE: f32 = 0.1;
/// Degrees turned per frame while the cursor rests on an edge.
pub const EDGE_STEP: f32 = 0.1;
/// Edge band in pixels.
pub const MARGIN: f64 = 10.0;
/// Pixels of cursor travel per degree of rotation.
pub const MOUSE_DIVISOR: f64 = 20.0;

const MAX_PITCH: f32 = 89.9;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Edges {
    left: bool,
    right: bool,
    upper: bool,
    lower: bool,
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<f32>,
    target: Vector3<f32>,
    up: Vector3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    window_width: u32,
    window_height: u32,
    // None until the first cursor event, which only sets the baseline.
    mouse_pos: Option<(f64, f64)>,
    edges: Edges,
}

impl Camera {
    /// `target` is a viewing direction and does not need to be normalised.
    pub fn new(
        window_width: u32,
        window_height: u32,
        position: Point3<f32>,
        target: Vector3<f32>,
        up: Vector3<f32>,
    ) -> Self {
        let target = if target.magnitude2() > 0.0 {
            target.normalize()
        } else {
            Vector3::unit_z()
        };
        let yaw = Deg::from(cgmath::Rad(target.z.atan2(target.x)));
        let pitch = Deg::from(cgmath::Rad(target.y.clamp(-1.0, 1.0).asin()));

        let mut camera = Self {
            position,
            target,
            up: up.normalize(),
            yaw,
            pitch,
            window_width,
            window_height,
            mouse_pos: None,
            edges: Edges::default(),
        };
        camera.update();
        camera
    }

    pub fn pos(&self) -> Point3<f32> {
        self.position
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Move with the arrow keys. Returns `false` for keys the camera ignores.
    pub fn on_keyboard(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::ArrowUp => {
                self.position += self.target * STEP_SCALE;
                true
            }
            KeyCode::ArrowDown => {
                self.position -= self.target * STEP_SCALE;
                true
            }
            KeyCode::ArrowLeft => {
                let left = self.up.cross(self.target).normalize();
                self.position += left * STEP_SCALE;
                true
            }
            KeyCode::ArrowRight => {
                let right = self.target.cross(self.up).normalize();
                self.position += right * STEP_SCALE;
                true
            }
            _ => false,
        }
    }

    /// Turn the camera by the cursor delta and arm edge scrolling.
    ///
    /// The first event after creation only records where the cursor is.
    pub fn on_mouse(&mut self, x: f64, y: f64) {
        let Some((last_x, last_y)) = self.mouse_pos.replace((x, y)) else {
            return;
        };
        let delta_x = x - last_x;
        let delta_y = y - last_y;

        self.yaw += Deg((delta_x / MOUSE_DIVISOR) as f32);
        self.pitch -= Deg((delta_y / MOUSE_DIVISOR) as f32);

        if delta_x == 0.0 {
            if x <= MARGIN {
                self.edges.left = true;
            } else if x >= self.window_width as f64 - MARGIN {
                self.edges.right = true;
            }
        } else {
            self.edges.left = false;
            self.edges.right = false;
        }

        if delta_y == 0.0 {
            if y <= MARGIN {
                self.edges.upper = true;
            } else if y >= self.window_height as f64 - MARGIN {
                self.edges.lower = true;
            }
        } else {
            self.edges.upper = false;
            self.edges.lower = false;
        }

        self.update();
    }

    /// Per-frame edge scrolling.
    pub fn on_render(&mut self) {
        let mut should_update = false;

        if self.edges.left {
            self.yaw -= Deg(EDGE_STEP);
            should_update = true;
        } else if self.edges.right {
            self.yaw += Deg(EDGE_STEP);
            should_update = true;
        }

        if self.edges.upper {
            if self.pitch.0 < MAX_PITCH {
                self.pitch += Deg(EDGE_STEP);
                should_update = true;
            }
        } else if self.edges.lower && self.pitch.0 > -MAX_PITCH {
            self.pitch -= Deg(EDGE_STEP);
            should_update = true;
        }

        if should_update {
            self.update();
        }
    }

    fn update(&mut self) {
        self.pitch = Deg(self.pitch.0.clamp(-MAX_PITCH, MAX_PITCH));
        let (sin_yaw, cos_yaw) = cgmath::Rad::from(self.yaw).0.sin_cos();
        let (sin_pitch, cos_pitch) = cgmath::Rad::from(self.pitch).0.sin_cos();

        self.target = Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize();
        let horizontal = self.target.cross(Vector3::unit_y()).normalize();
        self.up = horizontal.cross(self.target).normalize();
    }
}
