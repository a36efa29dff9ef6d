use std::path::{Path, PathBuf};

use trellis_engine::gfx::TextureHandle;
use trellis_engine::scene::QuadDraw;

use crate::component::{BaseComponent, Component, DrawCtx, InitCtx, Initialize};
use crate::error::InitError;

/// Whether a node has run its one-time initialization.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum InitState {
    #[default]
    Uninitialized,
    Initialized,
}

/// Textured quad showing an image file.
///
/// The texture is resolved through the shared cache during initialization;
/// until then (or if that failed under a skip policy) the node draws nothing.
#[derive(Debug, Clone)]
pub struct ImageComponent {
    base: BaseComponent,
    path: PathBuf,
    texture: Option<TextureHandle>,
    state: InitState,
}

impl ImageComponent {
    pub fn new(x: f32, y: f32, width: f32, height: f32, path: impl Into<PathBuf>) -> Self {
        Self {
            base: BaseComponent::new(x, y, width, height),
            path: path.into(),
            texture: None,
            state: InitState::Uninitialized,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn state(&self) -> InitState {
        self.state
    }
}

impl Initialize for ImageComponent {
    fn initialize(&mut self, ctx: &mut InitCtx<'_>) -> Result<(), InitError> {
        if self.state == InitState::Initialized {
            return Ok(());
        }

        let handle = ctx.resources.textures.get_or_load(&mut *ctx.backend, &self.path)?;
        self.texture = Some(handle);
        self.state = InitState::Initialized;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.state == InitState::Initialized
    }
}

impl Component for ImageComponent {
    fn base(&self) -> &BaseComponent {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseComponent {
        &mut self.base
    }

    fn draw(&self, ctx: &mut DrawCtx<'_>) {
        let (Some(texture), Some(geometry)) = (self.texture, ctx.geometry) else {
            return;
        };
        ctx.list.push(QuadDraw {
            program: geometry.program,
            mesh: geometry.mesh,
            texture,
            transform: self.base.transform(),
        });
    }

    fn initializer(&mut self) -> Option<&mut dyn Initialize> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use trellis_engine::scene::DrawList;

    use super::*;

    use crate::component::InitPolicy;
    use crate::context::RenderingContext;
    use crate::resources::Resources;
    use crate::test_support::{write_png, RecordingBackend};

    #[test]
    fn uninitialized_image_draws_nothing() {
        let image = ImageComponent::new(0.0, 0.0, 10.0, 10.0, "missing.png");
        let rendering = RenderingContext::new(100.0, 100.0);
        let mut list = DrawList::new();

        let mut ctx = DrawCtx { rendering: &rendering, geometry: None, list: &mut list };
        image.draw(&mut ctx);

        assert!(list.is_empty());
        assert_eq!(image.state(), InitState::Uninitialized);
    }

    #[test]
    fn second_initialize_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "img.png", 2, 2);

        let mut backend = RecordingBackend::default();
        let mut resources = Resources::default();
        let mut image = ImageComponent::new(0.0, 0.0, 10.0, 10.0, &png);

        {
            let mut ctx = InitCtx {
                backend: &mut backend,
                resources: &mut resources,
                policy: InitPolicy::Abort,
            };
            image.initialize(&mut ctx).unwrap();
            image.initialize(&mut ctx).unwrap();
        }

        assert!(image.is_initialized());
        assert!(image.texture().is_some_and(|t| t.is_valid()));
        assert_eq!(backend.textures.len(), 1);
    }

    #[test]
    fn failed_initialize_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RecordingBackend::default();
        let mut resources = Resources::default();
        let mut image = ImageComponent::new(0.0, 0.0, 10.0, 10.0, dir.path().join("gone.png"));

        let mut ctx = InitCtx {
            backend: &mut backend,
            resources: &mut resources,
            policy: InitPolicy::Abort,
        };
        assert!(image.initialize(&mut ctx).is_err());
        assert_eq!(image.state(), InitState::Uninitialized);
        assert!(image.texture().is_none());
    }
}
