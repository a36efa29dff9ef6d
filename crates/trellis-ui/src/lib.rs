//! trellis UI: a retained node tree drawn through `trellis-engine`.
//!
//! A [`Window`] owns a root pane. Panes ([`widgets::Container`]) hold
//! children in draw order; leaves such as [`widgets::ImageComponent`] record
//! textured quads. GPU resources are created once, before the first frame:
//! one shared program and unit quad, plus one texture per distinct image
//! path.
//!
//! ```rust,ignore
//! use trellis_ui::prelude::*;
//!
//! let model = Rc::new(RefCell::new(Model::default()));
//!
//! let mut content = Container::content(0.0, 0.0, 800.0, 600.0);
//! content.add_child(ImageComponent::new(50.0, 50.0, 100.0, 100.0, "output.png"))?;
//!
//! let mut window = Window::new(WindowConfig::default().title("My Game Engine"));
//! window.add_child(content)?;
//! window.add_child(Container::glass(EventController::new(model), 0.0, 0.0, 800.0, 600.0))?;
//! window.run_main_loop()?;
//! ```

pub mod component;
pub mod context;
pub mod controller;
pub mod error;
pub mod model;
pub mod resources;
pub mod texture;
pub mod widgets;
pub mod window;

#[cfg(test)]
mod test_support;

pub use window::{Window, WindowConfig};

/// Common imports for building a window.
pub mod prelude {
    pub use std::cell::RefCell;
    pub use std::rc::Rc;

    pub use crate::component::{BaseComponent, Component, DrawCtx, InitCtx, InitPolicy, Initialize};
    pub use crate::context::RenderingContext;
    pub use crate::controller::EventController;
    pub use crate::error::{InitError, StructureError, TextureError};
    pub use crate::model::{Model, Observer, Subscription, TextBinding, TextChange};
    pub use crate::resources::{GraphicsResources, Resources, SharedGeometry};
    pub use crate::texture::{ImageCrateDecoder, ImageDecoder, TextureCache};
    pub use crate::widgets::{Container, ImageComponent, InitReport, PaneKind};
    pub use crate::window::{Window, WindowConfig};

    pub use trellis_engine::paint::Color;
}
