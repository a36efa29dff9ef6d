//! trellis engine crate.
//!
//! Platform and GPU runtime used by the UI layer: winit window loop, wgpu
//! device and surface, input translation, frame timing, and the narrow
//! graphics backend the UI creates its resources through.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod gfx;
pub mod render;
pub mod paint;
pub mod scene;
