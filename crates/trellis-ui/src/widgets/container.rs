use trellis_engine::input::InputEvent;

use crate::component::{BaseComponent, Component, DrawCtx, InitCtx, InitPolicy};
use crate::controller::EventController;
use crate::error::{InitError, StructureError};

/// Role of a [`Container`] in the window.
///
/// All kinds share one composite implementation; the kind only decides
/// where the pane may sit and whether it receives input.
#[derive(Debug, Clone)]
pub enum PaneKind {
    Plain,
    Layer,
    Content,
    /// Overlay whose controller sees every input event.
    Glass(EventController),
    /// Top of a window's tree. Never a child.
    Root,
}

/// Outcome of an initialization pass.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub initialized: usize,
    /// Nodes that were already initialized before this pass.
    pub already: usize,
    /// Failures tolerated under [`InitPolicy::Skip`].
    pub skipped: usize,
}

/// Ordered composite node.
///
/// Children are drawn, updated and initialized in insertion order; the
/// first child added is drawn first and ends up underneath later ones.
pub struct Container {
    base: BaseComponent,
    kind: PaneKind,
    children: Vec<Box<dyn Component>>,
}

impl Container {
    pub fn new(kind: PaneKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            base: BaseComponent::new(x, y, width, height),
            kind,
            children: Vec::new(),
        }
    }

    pub fn plain(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(PaneKind::Plain, x, y, width, height)
    }

    pub fn layer(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(PaneKind::Layer, x, y, width, height)
    }

    pub fn content(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(PaneKind::Content, x, y, width, height)
    }

    pub fn glass(controller: EventController, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(PaneKind::Glass(controller), x, y, width, height)
    }

    pub fn root(width: f32, height: f32) -> Self {
        Self::new(PaneKind::Root, 0.0, 0.0, width, height)
    }

    pub fn kind(&self) -> &PaneKind {
        &self.kind
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, PaneKind::Root)
    }

    pub fn controller(&self) -> Option<&EventController> {
        match &self.kind {
            PaneKind::Glass(c) => Some(c),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Box<dyn Component>] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Appends `child` after the existing children.
    pub fn add_child(&mut self, child: impl Component + 'static) -> Result<(), StructureError> {
        self.add_boxed(Box::new(child))
    }

    pub fn add_boxed(&mut self, child: Box<dyn Component>) -> Result<(), StructureError> {
        if child.as_composite().is_some_and(Container::is_root) {
            log::error!("rejected root pane as child of a {} pane", self.kind_name());
            return Err(StructureError::RootAsChild);
        }
        self.children.push(child);
        Ok(())
    }

    /// Depth-first initialization of every descendant that needs it.
    ///
    /// Composites are walked, never initialized themselves. Nodes that are
    /// already initialized are counted and left alone.
    pub fn initialize_all(&mut self, ctx: &mut InitCtx<'_>) -> Result<InitReport, InitError> {
        let mut report = InitReport::default();
        self.initialize_children(ctx, &mut report)?;
        Ok(report)
    }

    fn initialize_children(
        &mut self,
        ctx: &mut InitCtx<'_>,
        report: &mut InitReport,
    ) -> Result<(), InitError> {
        for child in &mut self.children {
            if let Some(composite) = child.as_composite_mut() {
                composite.initialize_children(ctx, report)?;
                continue;
            }

            let Some(node) = child.initializer() else { continue };
            if node.is_initialized() {
                report.already += 1;
                continue;
            }

            match node.initialize(ctx) {
                Ok(()) => report.initialized += 1,
                Err(e) if ctx.policy == InitPolicy::Skip => {
                    log::warn!("skipping node that failed to initialize: {e}");
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Offers `event` to this pane's controller and every controller below
    /// it, in tree order. Returns how many of them acted on it.
    pub fn dispatch(&self, event: &InputEvent) -> usize {
        let mut handled = usize::from(self.controller().is_some_and(|c| c.handle(event)));

        for child in &self.children {
            if let Some(composite) = child.as_composite() {
                handled += composite.dispatch(event);
            } else if let Some(sink) = child.input_sink() {
                handled += usize::from(sink.handle(event));
            }
        }
        handled
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            PaneKind::Plain => "plain",
            PaneKind::Layer => "layer",
            PaneKind::Content => "content",
            PaneKind::Glass(_) => "glass",
            PaneKind::Root => "root",
        }
    }
}

impl Component for Container {
    fn base(&self) -> &BaseComponent {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseComponent {
        &mut self.base
    }

    fn draw(&self, ctx: &mut DrawCtx<'_>) {
        for child in &self.children {
            child.draw(ctx);
        }
    }

    fn update(&mut self, dt: f32) {
        for child in &mut self.children {
            child.update(dt);
        }
    }

    fn as_composite(&self) -> Option<&Container> {
        Some(self)
    }

    fn as_composite_mut(&mut self) -> Option<&mut Container> {
        Some(self)
    }

    fn input_sink(&self) -> Option<&EventController> {
        self.controller()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use trellis_engine::gfx::{MeshHandle, ProgramHandle, TextureHandle};
    use trellis_engine::scene::DrawList;

    use super::*;

    use crate::context::RenderingContext;
    use crate::error::TextureError;
    use crate::model::Model;
    use crate::resources::{Resources, SharedGeometry};
    use crate::test_support::{write_png, RecordingBackend};
    use crate::widgets::ImageComponent;

    fn geometry() -> SharedGeometry {
        SharedGeometry {
            program: ProgramHandle::from_raw(1),
            mesh: MeshHandle::from_raw(1),
        }
    }

    /// Draws one quad whose texture id is `tag`, and counts updates.
    struct Probe {
        base: BaseComponent,
        tag: u32,
        updates: Rc<RefCell<Vec<u32>>>,
    }

    impl Probe {
        fn new(tag: u32, updates: &Rc<RefCell<Vec<u32>>>) -> Self {
            Self { base: BaseComponent::default(), tag, updates: updates.clone() }
        }
    }

    impl Component for Probe {
        fn base(&self) -> &BaseComponent {
            &self.base
        }

        fn base_mut(&mut self) -> &mut BaseComponent {
            &mut self.base
        }

        fn draw(&self, ctx: &mut DrawCtx<'_>) {
            let Some(g) = ctx.geometry else { return };
            ctx.list.push(trellis_engine::scene::QuadDraw {
                program: g.program,
                mesh: g.mesh,
                texture: TextureHandle::from_raw(self.tag),
                transform: self.base.transform(),
            });
        }

        fn update(&mut self, _dt: f32) {
            self.updates.borrow_mut().push(self.tag);
        }
    }

    fn drawn_tags(root: &Container) -> Vec<u32> {
        let rendering = RenderingContext::new(100.0, 100.0);
        let mut list = DrawList::new();
        list.begin(rendering.projection());
        let mut ctx = DrawCtx { rendering: &rendering, geometry: Some(geometry()), list: &mut list };
        root.draw(&mut ctx);
        list.items().iter().map(|d| d.texture.raw()).collect()
    }

    #[test]
    fn draw_and_update_follow_insertion_order() {
        let updates = Rc::new(RefCell::new(Vec::new()));

        let mut inner = Container::layer(0.0, 0.0, 10.0, 10.0);
        inner.add_child(Probe::new(2, &updates)).unwrap();
        inner.add_child(Probe::new(3, &updates)).unwrap();

        let mut root = Container::root(100.0, 100.0);
        root.add_child(Probe::new(1, &updates)).unwrap();
        root.add_child(inner).unwrap();
        root.add_child(Probe::new(4, &updates)).unwrap();

        assert_eq!(drawn_tags(&root), vec![1, 2, 3, 4]);

        root.update(0.016);
        assert_eq!(*updates.borrow(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn root_is_rejected_under_every_pane_kind() {
        let model = Rc::new(RefCell::new(Model::default()));
        let parents = [
            Container::plain(0.0, 0.0, 1.0, 1.0),
            Container::layer(0.0, 0.0, 1.0, 1.0),
            Container::content(0.0, 0.0, 1.0, 1.0),
            Container::glass(EventController::new(model), 0.0, 0.0, 1.0, 1.0),
            Container::root(1.0, 1.0),
        ];

        for mut parent in parents {
            assert_eq!(
                parent.add_child(Container::root(1.0, 1.0)),
                Err(StructureError::RootAsChild)
            );
            assert_eq!(parent.child_count(), 0);
        }
    }

    #[test]
    fn initialize_all_visits_each_leaf_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", 2, 2);
        let b = write_png(dir.path(), "b.png", 2, 2);

        let mut content = Container::content(0.0, 0.0, 100.0, 100.0);
        content.add_child(ImageComponent::new(0.0, 0.0, 1.0, 1.0, &a)).unwrap();
        content.add_child(ImageComponent::new(0.0, 0.0, 1.0, 1.0, &b)).unwrap();
        content.add_child(ImageComponent::new(0.0, 0.0, 1.0, 1.0, &a)).unwrap();

        let mut root = Container::root(100.0, 100.0);
        root.add_child(content).unwrap();

        let mut backend = RecordingBackend::default();
        let mut resources = Resources::default();
        let mut ctx = InitCtx {
            backend: &mut backend,
            resources: &mut resources,
            policy: InitPolicy::Abort,
        };

        let first = root.initialize_all(&mut ctx).unwrap();
        let second = root.initialize_all(&mut ctx).unwrap();

        assert_eq!(first, InitReport { initialized: 3, already: 0, skipped: 0 });
        assert_eq!(second, InitReport { initialized: 0, already: 3, skipped: 0 });
        assert_eq!(resources.textures.len(), 2);
        assert_eq!(backend.textures.len(), 2);
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_png(dir.path(), "good.png", 2, 2);

        let mut root = Container::root(100.0, 100.0);
        root.add_child(ImageComponent::new(0.0, 0.0, 1.0, 1.0, dir.path().join("missing.png")))
            .unwrap();
        root.add_child(ImageComponent::new(0.0, 0.0, 1.0, 1.0, &good)).unwrap();

        let mut backend = RecordingBackend::default();
        let mut resources = Resources::default();
        let mut ctx = InitCtx {
            backend: &mut backend,
            resources: &mut resources,
            policy: InitPolicy::Abort,
        };

        assert!(matches!(
            root.initialize_all(&mut ctx),
            Err(InitError::Texture(TextureError::NotFound { .. }))
        ));
        assert!(backend.textures.is_empty());
    }

    #[test]
    fn skip_policy_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_png(dir.path(), "good.png", 2, 2);

        let mut root = Container::root(100.0, 100.0);
        root.add_child(ImageComponent::new(0.0, 0.0, 1.0, 1.0, dir.path().join("missing.png")))
            .unwrap();
        root.add_child(ImageComponent::new(0.0, 0.0, 1.0, 1.0, &good)).unwrap();

        let mut backend = RecordingBackend::default();
        let mut resources = Resources::default();
        let mut ctx = InitCtx {
            backend: &mut backend,
            resources: &mut resources,
            policy: InitPolicy::Skip,
        };

        let report = root.initialize_all(&mut ctx).unwrap();
        assert_eq!(report, InitReport { initialized: 1, already: 0, skipped: 1 });
    }

    #[test]
    fn dispatch_reaches_nested_glass_panes() {
        let model = Rc::new(RefCell::new(Model::default()));

        let mut layer = Container::layer(0.0, 0.0, 10.0, 10.0);
        layer
            .add_child(Container::glass(EventController::new(model.clone()), 0.0, 0.0, 10.0, 10.0))
            .unwrap();

        let mut root = Container::root(10.0, 10.0);
        root.add_child(Container::content(0.0, 0.0, 10.0, 10.0)).unwrap();
        root.add_child(layer).unwrap();

        let space = InputEvent::Key {
            key: trellis_engine::input::Key::Space,
            state: trellis_engine::input::KeyState::Pressed,
            modifiers: Default::default(),
            repeat: false,
        };

        assert_eq!(root.dispatch(&space), 1);
        assert_eq!(model.borrow().text(), "Space Key Pressed");
    }
}
