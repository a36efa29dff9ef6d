//! Test doubles for the graphics backend and image decoder.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use trellis_engine::gfx::{
    GfxError, GraphicsBackend, ImageData, MeshData, MeshHandle, ProgramHandle, ShaderSource,
    TextureHandle,
};

use crate::texture::{DecodedImage, ImageCrateDecoder, ImageDecoder};

/// In-memory backend that validates requests like the GPU one and records
/// what it was asked to create.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub programs: u32,
    /// `(vertex count, index count)` per upload.
    pub meshes: Vec<(usize, usize)>,
    /// `(width, height)` per upload.
    pub textures: Vec<(u32, u32)>,

    pub fail_programs: bool,
    /// Number of upcoming mesh uploads to reject.
    pub fail_meshes: u32,
    pub fail_textures: bool,
}

impl GraphicsBackend for RecordingBackend {
    fn compile_program(&mut self, source: &ShaderSource<'_>) -> Result<ProgramHandle, GfxError> {
        source.validate()?;
        if self.fail_programs {
            return Err(GfxError::Shader {
                label: source.label.to_string(),
                reason: "rejected by test backend".to_string(),
            });
        }
        self.programs += 1;
        Ok(ProgramHandle::from_raw(self.programs))
    }

    fn upload_mesh(&mut self, mesh: &MeshData<'_>) -> Result<MeshHandle, GfxError> {
        mesh.validate()?;
        if self.fail_meshes > 0 {
            self.fail_meshes -= 1;
            return Err(GfxError::InvalidMesh {
                reason: "rejected by test backend".to_string(),
            });
        }
        self.meshes.push((mesh.vertices.len(), mesh.indices.len()));
        Ok(MeshHandle::from_raw(self.meshes.len() as u32))
    }

    fn upload_texture(&mut self, image: &ImageData<'_>) -> Result<TextureHandle, GfxError> {
        image.validate(8192)?;
        if self.fail_textures {
            return Err(GfxError::InvalidTexture {
                reason: "rejected by test backend".to_string(),
            });
        }
        self.textures.push((image.width, image.height));
        Ok(TextureHandle::from_raw(self.textures.len() as u32))
    }
}

/// Real decoder that counts how often it runs.
#[derive(Debug, Default)]
pub(crate) struct CountingDecoder {
    calls: Rc<Cell<usize>>,
}

impl CountingDecoder {
    pub fn counter(&self) -> Rc<Cell<usize>> {
        self.calls.clone()
    }
}

impl ImageDecoder for CountingDecoder {
    fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<DecodedImage, String> {
        self.calls.set(self.calls.get() + 1);
        ImageCrateDecoder.decode(bytes, extension)
    }
}

/// Writes a solid `width`×`height` PNG into `dir`.
pub(crate) fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]))
        .save(&path)
        .unwrap();
    path
}
