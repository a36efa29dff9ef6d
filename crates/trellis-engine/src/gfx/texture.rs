use super::GfxError;

/// Borrowed RGBA8 pixels, rows top to bottom, no padding.
#[derive(Debug, Copy, Clone)]
pub struct ImageData<'a> {
    pub width: u32,
    pub height: u32,
    pub rgba: &'a [u8],
}

impl ImageData<'_> {
    /// Checks the request against `max_dimension` (the device's 2D texture
    /// limit) before anything is allocated on the GPU.
    pub fn validate(&self, max_dimension: u32) -> Result<(), GfxError> {
        let reason = if self.width == 0 || self.height == 0 {
            format!("zero-sized image {}x{}", self.width, self.height)
        } else if self.width > max_dimension || self.height > max_dimension {
            format!(
                "{}x{} exceeds the device limit of {max_dimension}",
                self.width, self.height
            )
        } else if self.rgba.len() as u64 != self.width as u64 * self.height as u64 * 4 {
            format!(
                "pixel buffer holds {} bytes, expected {} for {}x{} RGBA8",
                self.rgba.len(),
                self.width as u64 * self.height as u64 * 4,
                self.width,
                self.height
            )
        } else {
            return Ok(());
        };
        Err(GfxError::InvalidTexture { reason })
    }
}
