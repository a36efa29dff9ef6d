use super::GfxError;

/// WGSL program source plus its entry points.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderSource<'a> {
    pub label: &'a str,
    pub wgsl: &'a str,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
}

/// The one program every node draws with: unit quad, per-instance model
/// transform, shared projection, one sampled texture.
pub const QUAD_SHADER: ShaderSource<'static> = ShaderSource {
    label: "trellis quad shader",
    wgsl: include_str!("shaders/quad.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
};

impl ShaderSource<'_> {
    /// Cheap structural check run before the source reaches the device.
    ///
    /// Catches empty sources and missing entry points. Compile errors are
    /// reported by the backend's `compile_program`.
    pub fn validate(&self) -> Result<(), GfxError> {
        let fail = |reason: String| {
            Err(GfxError::Shader {
                label: self.label.to_string(),
                reason,
            })
        };

        if self.wgsl.trim().is_empty() {
            return fail("empty source".to_string());
        }
        for entry in [self.vertex_entry, self.fragment_entry] {
            if entry.is_empty() || !self.wgsl.contains(&format!("fn {entry}(")) {
                return fail(format!("entry point '{entry}' not found"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_quad_shader_passes_validation() {
        assert!(QUAD_SHADER.validate().is_ok());
    }

    #[test]
    fn missing_entry_point_is_reported() {
        let src = ShaderSource {
            fragment_entry: "fs_missing",
            ..QUAD_SHADER
        };
        match src.validate() {
            Err(GfxError::Shader { reason, .. }) => assert!(reason.contains("fs_missing")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_source_is_rejected() {
        let src = ShaderSource { wgsl: "  \n", ..QUAD_SHADER };
        assert!(src.validate().is_err());
    }
}
