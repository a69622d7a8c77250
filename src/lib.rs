//! bumpmap-demo
//!
//! A small wgpu demo that renders a rotating box with a color texture and a
//! normal map, lit by one directional light. Pressing `b` swaps the normal map
//! for a flat one so the difference bump mapping makes can be compared live.
//!
//! High-level modules
//! - `app`: the demo itself, its per-frame state and input callbacks
//! - `camera`: first-person camera driven by arrow keys and the mouse
//! - `config`: demo constants and command line overrides
//! - `context`: window, surface, device and queue
//! - `data_structures`: vertex format, meshes and textures
//! - `flow`: the winit event loop that drives the demo
//! - `pipelines`: the lighting technique and pipeline helpers
//! - `resources`: helpers to load meshes and textures from disk
//! - `transform`: world/view/projection matrices
//!

pub mod app;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod resources;
pub mod transform;
