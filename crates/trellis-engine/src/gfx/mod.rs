//! Narrow graphics backend.
//!
//! The UI layer never touches wgpu directly. It asks a [`GraphicsBackend`] to
//! compile a shader program, upload a mesh, or upload a texture, and gets back
//! small opaque handles it can put into a draw list. [`WgpuBackend`] is the
//! production implementation; its GPU objects live in a [`GpuStore`] that the
//! quad renderer reads when replaying a frame.

mod backend;
mod error;
mod handle;
mod mesh;
mod mip;
mod shader;
mod store;
mod texture;

pub use backend::GraphicsBackend;
pub use error::GfxError;
pub use handle::{MeshHandle, ProgramHandle, TextureHandle};
pub use mesh::{MeshData, Vertex, UNIT_QUAD_INDICES, UNIT_QUAD_VERTICES};
pub use mip::{mip_chain, mip_level_count, MipLevel};
pub use shader::{ShaderSource, QUAD_SHADER};
pub use store::{GpuStore, WgpuBackend};
pub use texture::ImageData;

pub(crate) use store::{premul_alpha_blend, Mesh, ProjectionUniform, QuadInstance};
