use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context as _;
use trellis_engine::core::{App as EngineApp, AppControl, FrameCtx};
use trellis_engine::device::GpuInit;
use trellis_engine::gfx::{GpuStore, GraphicsBackend};
use trellis_engine::input::InputEvent;
use trellis_engine::paint::Color;
use trellis_engine::render::QuadRenderer;
use trellis_engine::scene::DrawList;
use trellis_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::component::{Component, DrawCtx, InitCtx, InitPolicy};
use crate::context::RenderingContext;
use crate::error::{InitError, StructureError};
use crate::resources::Resources;
use crate::widgets::{Container, InitReport};

/// Window settings.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Initial size in logical pixels.
    pub width: u32,
    pub height: u32,
    pub clear_color: Color,
    pub init_policy: InitPolicy,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "trellis".to_string(),
            width: 800,
            height: 600,
            clear_color: Color::WHITE,
            init_policy: InitPolicy::Abort,
        }
    }
}

impl WindowConfig {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn init_policy(mut self, policy: InitPolicy) -> Self {
        self.init_policy = policy;
        self
    }
}

/// Owns the root pane, the shared resources and the per-frame state.
///
/// The phases are public so the frame loop can be driven without a GPU;
/// [`run_main_loop`](Self::run_main_loop) wires them to the engine runtime.
pub struct Window {
    config: WindowConfig,
    root: Container,
    resources: Resources,
    rendering: RenderingContext,
    draw_list: DrawList,
    initialized: bool,
}

impl Window {
    pub fn new(config: WindowConfig) -> Self {
        Self::with_resources(config, Resources::default())
    }

    pub fn with_resources(config: WindowConfig, resources: Resources) -> Self {
        let (w, h) = (config.width as f32, config.height as f32);
        Self {
            root: Container::root(w, h),
            rendering: RenderingContext::new(w, h),
            resources,
            draw_list: DrawList::new(),
            initialized: false,
            config,
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Container {
        &mut self.root
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn rendering(&self) -> &RenderingContext {
        &self.rendering
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn add_child(&mut self, child: impl Component + 'static) -> Result<(), StructureError> {
        self.root.add_child(child)
    }

    /// Rebuilds the rendering context for a new logical size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.rendering = RenderingContext::new(width, height);
        self.root.set_size(width, height);
        log::debug!("window resized to {width}x{height}");
    }

    /// Acquires the shared program and quad, then initializes the tree.
    ///
    /// Runs once; later calls return an empty report.
    pub fn initialize(&mut self, backend: &mut dyn GraphicsBackend) -> Result<InitReport, InitError> {
        if self.initialized {
            return Ok(InitReport::default());
        }

        self.resources.graphics.acquire(&mut *backend)?;

        let mut ctx = InitCtx {
            backend,
            resources: &mut self.resources,
            policy: self.config.init_policy,
        };
        let report = self.root.initialize_all(&mut ctx)?;

        log::info!(
            "initialized {} node(s), {} skipped, {} texture(s) cached",
            report.initialized,
            report.skipped,
            self.resources.textures.len()
        );
        self.initialized = true;
        Ok(report)
    }

    /// Offers `event` to every glass pane in tree order.
    pub fn dispatch_input(&mut self, event: &InputEvent) -> usize {
        self.root.dispatch(event)
    }

    pub fn update(&mut self, dt: f32) {
        self.root.update(dt);
    }

    /// Re-records the draw list from the tree.
    pub fn draw(&mut self) {
        self.draw_list.begin(self.rendering.projection());
        let mut ctx = DrawCtx {
            rendering: &self.rendering,
            geometry: self.resources.graphics.shared(),
            list: &mut self.draw_list,
        };
        self.root.draw(&mut ctx);
    }

    /// One frame minus the GPU work: input, update, draw.
    pub fn frame(&mut self, events: &[InputEvent], dt: f32) {
        for event in events {
            self.dispatch_input(event);
        }
        self.update(dt);
        self.draw();
    }

    /// Opens the window and runs until it is closed.
    ///
    /// Initialization happens on the first frame, before anything is drawn.
    /// If it fails the loop stops and the error is returned.
    pub fn run_main_loop(self) -> anyhow::Result<()> {
        let config = RuntimeConfig {
            title: self.config.title.clone(),
            initial_size: LogicalSize::new(self.config.width as f64, self.config.height as f64),
        };

        let failure = Rc::new(RefCell::new(None));
        let driver = FrameDriver {
            window: self,
            store: GpuStore::new(),
            renderer: QuadRenderer::new(),
            failure: failure.clone(),
        };

        log::info!("entering main loop");
        Runtime::run(config, GpuInit::default(), driver)?;

        if let Some(err) = failure.borrow_mut().take() {
            return Err(err).context("window initialization failed");
        }

        log::info!("main loop finished");
        Ok(())
    }
}

/// Adapts a [`Window`] to the engine's per-frame callback.
struct FrameDriver {
    window: Window,
    store: GpuStore,
    renderer: QuadRenderer,
    failure: Rc<RefCell<Option<InitError>>>,
}

impl EngineApp for FrameDriver {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if !self.window.is_initialized() {
            let mut backend = ctx.backend(&mut self.store);
            if let Err(e) = self.window.initialize(&mut backend) {
                log::error!("initialization failed: {e}");
                *self.failure.borrow_mut() = Some(e);
                return AppControl::Exit;
            }
        }

        let (w, h) = ctx.window.logical_size();
        let viewport = self.window.rendering().viewport();
        if (w, h) != (viewport.width, viewport.height) && w > 0.0 && h > 0.0 {
            self.window.resize(w, h);
        }

        self.window.frame(&ctx.input_frame.events, ctx.time.dt);

        let clear = self.window.config.clear_color;
        let (store, renderer, list) = (&mut self.store, &mut self.renderer, &self.window.draw_list);
        ctx.render(clear, |rctx, target| renderer.render(rctx, target, store, list))
    }

    fn on_exit(&mut self) {
        log::debug!("frame driver shutting down ({} texture(s))", self.store.texture_count());
    }
}
