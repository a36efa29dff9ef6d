//! Coordinate and transform types shared across the engine renderer and UI.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! The quad shader maps logical pixels to clip space through a projection
//! matrix built with [`Mat4::orthographic`].

mod mat4;
mod viewport;

pub use mat4::Mat4;
pub use viewport::Viewport;
