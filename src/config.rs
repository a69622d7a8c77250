//! Demo configuration.
//!
//! Every constant the demo needs lives in [`DemoConfig`]. The defaults
//! reproduce the classic bump-mapping scene. A handful of them can be
//! overridden from the command line with [`DemoConfig::from_args`].

use std::path::{Path, PathBuf};

use cgmath::{Deg, Point3, Vector3};

use crate::{
    pipelines::lighting::{DirectionalLight, TextureUnits},
    transform::PersProjInfo,
};

pub const WINDOW_WIDTH: u32 = 1920;
pub const WINDOW_HEIGHT: u32 = 1200;

/// Where the camera starts and which way it looks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraStart {
    pub position: Point3<f32>,
    /// A direction, not a point to look at.
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Default for CameraStart {
    fn default() -> Self {
        Self {
            position: Point3::new(0.5, 1.025, 0.25),
            target: Vector3::new(0.0, -0.5, 1.0),
            up: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Asset locations, resolved against `root`.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub mesh: String,
    pub color_texture: String,
    pub normal_map: String,
    pub trivial_normal_map: String,
}

impl AssetPaths {
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn mesh_path(&self) -> PathBuf {
        self.resolve(&self.mesh)
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            root: Path::new("./").join("assets"),
            mesh: "box.obj".to_string(),
            color_texture: "bricks.png".to_string(),
            normal_map: "normal_map.png".to_string(),
            trivial_normal_map: "normal_up.png".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub backends: wgpu::Backends,
    pub assets: AssetPaths,
    pub camera: CameraStart,
    pub light: DirectionalLight,
    pub projection: PersProjInfo,
    /// Added to the rotation scalar once per rendered frame (degrees).
    pub rotation_step: f32,
    /// Where the rotating object sits in world space.
    pub object_position: Vector3<f32>,
    pub texture_units: TextureUnits,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Tutorial 26".to_string(),
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            backends: wgpu::Backends::PRIMARY,
            assets: AssetPaths::default(),
            camera: CameraStart::default(),
            light: DirectionalLight {
                color: Vector3::new(1.0, 1.0, 1.0),
                ambient_intensity: 0.2,
                diffuse_intensity: 0.8,
                direction: Vector3::new(1.0, 0.0, 0.0),
            },
            projection: PersProjInfo {
                fov: Deg(60.0),
                width: WINDOW_WIDTH as f32,
                height: WINDOW_HEIGHT as f32,
                z_near: 1.0,
                z_far: 100.0,
            },
            rotation_step: 0.01,
            object_position: Vector3::new(0.0, 0.0, 3.0),
            texture_units: TextureUnits::default(),
        }
    }
}

impl DemoConfig {
    /// Apply command line overrides on top of the defaults.
    ///
    /// Accepted flags:
    /// `--assets=DIR`, `--mesh=FILE`, `--size=WxH`, `--width=W`, `--height=H`
    /// and `--gpu-backend=auto|vulkan|dx12|metal|gl`.
    /// Malformed values are logged and ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut width: Option<u32> = None;
        let mut height: Option<u32> = None;

        for arg in args {
            let arg = arg.as_ref();
            if let Some(dir) = arg.strip_prefix("--assets=") {
                config.assets.root = PathBuf::from(dir);
            } else if let Some(file) = arg.strip_prefix("--mesh=") {
                config.assets.mesh = file.to_string();
            } else if let Some(v) = arg.strip_prefix("--size=") {
                match parse_size(v) {
                    Some((w, h)) => {
                        width = Some(w);
                        height = Some(h);
                    }
                    None => log::warn!("Ignoring malformed window size '{v}'"),
                }
            } else if let Some(v) = arg.strip_prefix("--width=") {
                match v.parse::<u32>() {
                    Ok(w) => width = Some(w),
                    Err(_) => log::warn!("Ignoring malformed width '{v}'"),
                }
            } else if let Some(v) = arg.strip_prefix("--height=") {
                match v.parse::<u32>() {
                    Ok(h) => height = Some(h),
                    Err(_) => log::warn!("Ignoring malformed height '{v}'"),
                }
            } else if let Some(v) = arg.strip_prefix("--gpu-backend=") {
                config.backends = parse_backends(v);
            }
        }

        config.width = width.unwrap_or(config.width).max(1);
        config.height = height.unwrap_or(config.height).max(1);
        config.projection.width = config.width as f32;
        config.projection.height = config.height as f32;
        config
    }
}

fn parse_size(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once('x').or_else(|| value.split_once('X'))?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

fn parse_backends(value: &str) -> wgpu::Backends {
    match value.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::PRIMARY,
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{other}', falling back to auto.");
            wgpu::Backends::PRIMARY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_accepts_either_separator() {
        assert_eq!(parse_size("800x600"), Some((800, 600)));
        assert_eq!(parse_size("800X600"), Some((800, 600)));
        assert_eq!(parse_size("800*600"), None);
        assert_eq!(parse_size("x600"), None);
    }

    #[test]
    fn unknown_backend_falls_back_to_auto() {
        assert_eq!(parse_backends("glide"), wgpu::Backends::PRIMARY);
        assert_eq!(parse_backends("Vulkan"), wgpu::Backends::VULKAN);
    }
}
