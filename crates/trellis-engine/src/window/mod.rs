//! Window + runtime loop.
//!
//! Owns the `winit` event loop and windows, and binds each window to its GPU
//! context.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
