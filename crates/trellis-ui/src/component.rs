use trellis_engine::coords::Mat4;
use trellis_engine::gfx::GraphicsBackend;
use trellis_engine::scene::DrawList;

use crate::context::RenderingContext;
use crate::controller::EventController;
use crate::error::InitError;
use crate::resources::{Resources, SharedGeometry};
use crate::widgets::Container;

// ── BaseComponent ─────────────────────────────────────────────────────────

/// Position and size of a node, in logical pixels, top-left origin.
///
/// Values are stored as given: negative or zero sizes produce a degenerate
/// transform and the node simply covers no area.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BaseComponent {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BaseComponent {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// `translate(x, y, 0) * scale(width, height, 1)`: maps the unit quad
    /// onto this node's rectangle.
    #[inline]
    pub fn transform(&self) -> Mat4 {
        Mat4::translation(self.x, self.y, 0.0) * Mat4::scale(self.width, self.height, 1.0)
    }
}

// ── contexts ──────────────────────────────────────────────────────────────

/// What to do when a node fails to initialize.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum InitPolicy {
    /// Stop at the first failure and report it.
    #[default]
    Abort,
    /// Log the failure, leave the node uninitialized (it draws nothing) and
    /// continue with the rest of the tree.
    Skip,
}

/// Passed to [`Initialize::initialize`].
pub struct InitCtx<'a> {
    pub backend: &'a mut dyn GraphicsBackend,
    pub resources: &'a mut Resources,
    pub policy: InitPolicy,
}

/// Passed to [`Component::draw`].
///
/// `geometry` is `None` until the shared resources are acquired; nodes draw
/// nothing in that case.
pub struct DrawCtx<'a> {
    pub rendering: &'a RenderingContext,
    pub geometry: Option<SharedGeometry>,
    pub list: &'a mut DrawList,
}

// ── traits ────────────────────────────────────────────────────────────────

/// Nodes that need GPU resources before their first draw.
pub trait Initialize {
    /// Runs at most once per node; calling it again after success is a no-op.
    fn initialize(&mut self, ctx: &mut InitCtx<'_>) -> Result<(), InitError>;

    fn is_initialized(&self) -> bool;
}

/// A node in the window's tree.
///
/// Only `base`, `base_mut` and `draw` are required. The remaining methods
/// are capability queries with empty defaults, so the tree never has to ask
/// what concrete type a node is.
pub trait Component {
    fn base(&self) -> &BaseComponent;

    fn base_mut(&mut self) -> &mut BaseComponent;

    /// Records this node (and, for composites, its children in order) into
    /// `ctx.list`. Must not change node state.
    fn draw(&self, ctx: &mut DrawCtx<'_>);

    fn set_position(&mut self, x: f32, y: f32) {
        let base = self.base_mut();
        base.x = x;
        base.y = y;
    }

    fn set_size(&mut self, width: f32, height: f32) {
        let base = self.base_mut();
        base.width = width;
        base.height = height;
    }

    /// Per-frame hook, after input and before draw.
    fn update(&mut self, _dt: f32) {}

    fn initializer(&mut self) -> Option<&mut dyn Initialize> {
        None
    }

    fn as_composite(&self) -> Option<&Container> {
        None
    }

    fn as_composite_mut(&mut self) -> Option<&mut Container> {
        None
    }

    /// Controller that should see raw input events, if any.
    fn input_sink(&self) -> Option<&EventController> {
        None
    }
}
