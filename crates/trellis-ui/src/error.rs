use std::fmt;
use std::path::PathBuf;

use trellis_engine::gfx::GfxError;

/// Rejected change to the node tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureError {
    /// A root pane may only sit at the top of a window.
    RootAsChild,
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::RootAsChild => write!(f, "a root pane cannot be added as a child"),
        }
    }
}

impl std::error::Error for StructureError {}

/// Failure to produce a texture for an image path.
#[derive(Debug)]
pub enum TextureError {
    NotFound { path: PathBuf },
    Io { path: PathBuf, source: std::io::Error },
    Decode { path: PathBuf, reason: String },
    Upload { path: PathBuf, source: GfxError },
}

impl TextureError {
    pub fn path(&self) -> &PathBuf {
        match self {
            TextureError::NotFound { path }
            | TextureError::Io { path, .. }
            | TextureError::Decode { path, .. }
            | TextureError::Upload { path, .. } => path,
        }
    }
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::NotFound { path } => write!(f, "image not found: {}", path.display()),
            TextureError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            TextureError::Decode { path, reason } => {
                write!(f, "failed to decode {}: {reason}", path.display())
            }
            TextureError::Upload { path, source } => {
                write!(f, "failed to upload {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io { source, .. } => Some(source),
            TextureError::Upload { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure while preparing a node or the shared resources for drawing.
#[derive(Debug)]
pub enum InitError {
    Graphics(GfxError),
    Texture(TextureError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Graphics(e) => write!(f, "graphics resources unavailable: {e}"),
            InitError::Texture(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::Graphics(e) => Some(e),
            InitError::Texture(e) => Some(e),
        }
    }
}

impl From<GfxError> for InitError {
    fn from(e: GfxError) -> Self {
        InitError::Graphics(e)
    }
}

impl From<TextureError> for InitError {
    fn from(e: TextureError) -> Self {
        InitError::Texture(e)
    }
}
