//! Paint model shared between UI and renderers.
//!
//! Scope is limited to the framebuffer clear color; node content is textured.

pub mod color;

pub use color::Color;
