//! Demo data structures: meshes and textures.
//!
//! - `model` contains the vertex format, CPU mesh data and GPU meshes
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod model;
pub mod texture;
