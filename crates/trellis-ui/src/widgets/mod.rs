//! Built-in nodes.

mod container;
mod image;

pub use container::{Container, InitReport, PaneKind};
pub use image::{ImageComponent, InitState};
