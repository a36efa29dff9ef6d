use trellis_engine::gfx::{GfxError, GraphicsBackend, MeshData, MeshHandle, ProgramHandle, QUAD_SHADER};

use crate::texture::TextureCache;

/// The program and unit-quad mesh every node draws with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SharedGeometry {
    pub program: ProgramHandle,
    pub mesh: MeshHandle,
}

/// Owner of the shared program and unit quad.
///
/// Created empty; [`acquire`](Self::acquire) compiles and uploads on first
/// use and returns the cached handles afterwards.
#[derive(Debug, Default)]
pub struct GraphicsResources {
    shared: Option<SharedGeometry>,
    // Kept on its own so a failed mesh upload does not recompile on retry.
    program: Option<ProgramHandle>,
}

impl GraphicsResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, backend: &mut dyn GraphicsBackend) -> Result<SharedGeometry, GfxError> {
        if let Some(shared) = self.shared {
            return Ok(shared);
        }

        let program = match self.program {
            Some(program) => program,
            None => *self.program.insert(backend.compile_program(&QUAD_SHADER)?),
        };
        let mesh = backend.upload_mesh(&MeshData::unit_quad())?;
        log::debug!("shared geometry ready: program {}, mesh {}", program.raw(), mesh.raw());

        let shared = SharedGeometry { program, mesh };
        self.shared = Some(shared);
        Ok(shared)
    }

    pub fn shared(&self) -> Option<SharedGeometry> {
        self.shared
    }
}

/// Everything a node may need while initializing.
#[derive(Default)]
pub struct Resources {
    pub graphics: GraphicsResources,
    pub textures: TextureCache,
}

impl Resources {
    pub fn new(textures: TextureCache) -> Self {
        Self {
            graphics: GraphicsResources::new(),
            textures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingBackend;

    #[test]
    fn acquire_is_idempotent() {
        let mut backend = RecordingBackend::default();
        let mut graphics = GraphicsResources::new();
        assert!(graphics.shared().is_none());

        let first = graphics.acquire(&mut backend).unwrap();
        let second = graphics.acquire(&mut backend).unwrap();

        assert_eq!(first, second);
        assert!(first.program.is_valid() && first.mesh.is_valid());
        assert_eq!(backend.programs, 1);
        assert_eq!(backend.meshes, vec![(4, 6)]);
        assert_eq!(graphics.shared(), Some(first));
    }

    #[test]
    fn failed_compile_leaves_nothing_cached() {
        let mut backend = RecordingBackend { fail_programs: true, ..Default::default() };
        let mut graphics = GraphicsResources::new();

        assert!(graphics.acquire(&mut backend).is_err());
        assert!(graphics.shared().is_none());
        assert!(backend.meshes.is_empty());
    }

    #[test]
    fn retry_after_mesh_failure_reuses_the_program() {
        let mut backend = RecordingBackend { fail_meshes: 1, ..Default::default() };
        let mut graphics = GraphicsResources::new();

        assert!(graphics.acquire(&mut backend).is_err());
        assert!(graphics.shared().is_none());

        let shared = graphics.acquire(&mut backend).unwrap();
        assert_eq!(backend.programs, 1);
        assert_eq!(shared.program, ProgramHandle::from_raw(1));
        assert_eq!(backend.meshes, vec![(4, 6)]);
    }
}
