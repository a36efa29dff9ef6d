use super::{GfxError, ImageData, MeshData, MeshHandle, ProgramHandle, ShaderSource, TextureHandle};

/// Resource creation contract between the UI layer and the GPU.
///
/// Every method either returns a valid (non-null) handle or an error; a
/// backend never hands out a null handle on success.
pub trait GraphicsBackend {
    /// Compiles and links a shader program.
    fn compile_program(&mut self, source: &ShaderSource<'_>) -> Result<ProgramHandle, GfxError>;

    /// Uploads vertex and index data.
    fn upload_mesh(&mut self, mesh: &MeshData<'_>) -> Result<MeshHandle, GfxError>;

    /// Uploads an RGBA8 image together with its full mip chain.
    fn upload_texture(&mut self, image: &ImageData<'_>) -> Result<TextureHandle, GfxError>;
}
