//! Render pipelines.
//!
//! - `basic` has the helpers every pipeline is built with
//! - `lighting` is the directional light + normal map technique the demo draws with

pub mod basic;
pub mod lighting;
