use std::fmt;

/// Failure to create a GPU resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GfxError {
    /// Shader source rejected before or during module creation.
    Shader { label: String, reason: String },
    /// Vertex/index data is unusable.
    InvalidMesh { reason: String },
    /// Texture dimensions or pixel buffer are unusable.
    InvalidTexture { reason: String },
}

impl fmt::Display for GfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GfxError::Shader { label, reason } => write!(f, "shader '{label}' failed: {reason}"),
            GfxError::InvalidMesh { reason } => write!(f, "invalid mesh: {reason}"),
            GfxError::InvalidTexture { reason } => write!(f, "invalid texture: {reason}"),
        }
    }
}

impl std::error::Error for GfxError {}
