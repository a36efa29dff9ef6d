//! Path-keyed texture cache.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component as PathComponent, Path, PathBuf};

use trellis_engine::gfx::{GraphicsBackend, ImageData, TextureHandle};

use crate::error::TextureError;

/// Decoded 8-bit RGBA pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Turns encoded image bytes into RGBA8.
///
/// `extension` is the lowercase file extension when the source has one; a
/// decoder may use it when the content alone does not identify the format.
pub trait ImageDecoder {
    fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<DecodedImage, String>;
}

/// [`ImageDecoder`] backed by the `image` crate.
///
/// Content sniffing first; if the format is not recognized, `png` and `gif`
/// extensions get a second attempt with that format forced.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<DecodedImage, String> {
        let decoded = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(image::ImageError::Unsupported(generic)) => {
                let format = match extension {
                    Some("png") => image::ImageFormat::Png,
                    Some("gif") => image::ImageFormat::Gif,
                    _ => return Err(generic.to_string()),
                };
                log::debug!("content sniffing failed, retrying as {format:?}");
                image::load_from_memory_with_format(bytes, format).map_err(|e| e.to_string())?
            }
            Err(e) => return Err(e.to_string()),
        };

        let rgba = decoded.into_rgba8();
        Ok(DecodedImage {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}

/// Maps normalized image paths to uploaded textures.
///
/// Each distinct path is read, decoded and uploaded at most once; later
/// lookups return the same handle. A failed load leaves the cache as it was.
pub struct TextureCache {
    entries: HashMap<PathBuf, TextureHandle>,
    decoder: Box<dyn ImageDecoder>,
}

impl TextureCache {
    pub fn new(decoder: Box<dyn ImageDecoder>) -> Self {
        Self {
            entries: HashMap::new(),
            decoder,
        }
    }

    pub fn get_or_load(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        path: impl AsRef<Path>,
    ) -> Result<TextureHandle, TextureError> {
        let key = normalize_path(path.as_ref());
        if let Some(&handle) = self.entries.get(&key) {
            return Ok(handle);
        }

        let bytes = match std::fs::read(&key) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TextureError::NotFound { path: key });
            }
            Err(source) => return Err(TextureError::Io { path: key, source }),
        };

        let extension = key
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let image = match self.decoder.decode(&bytes, extension.as_deref()) {
            Ok(image) => image,
            Err(reason) => return Err(TextureError::Decode { path: key, reason }),
        };

        let upload = backend.upload_texture(&ImageData {
            width: image.width,
            height: image.height,
            rgba: &image.rgba,
        });
        let handle = match upload {
            Ok(handle) => handle,
            Err(source) => return Err(TextureError::Upload { path: key, source }),
        };

        log::debug!(
            "loaded {} ({}x{}) as texture {}",
            key.display(),
            image.width,
            image.height,
            handle.raw()
        );
        self.entries.insert(key, handle);
        Ok(handle)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(&normalize_path(path.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new(Box::new(ImageCrateDecoder))
    }
}

/// Lexical normalization: drops `.` segments and folds `name/..` pairs.
///
/// The filesystem is not consulted, so symlinks are not resolved. Leading
/// `..` segments of a relative path are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for part in path.components() {
        match part {
            PathComponent::CurDir => {}
            PathComponent::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(PathComponent::Normal(_)));
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
