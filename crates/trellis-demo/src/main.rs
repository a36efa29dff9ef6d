use trellis_engine::logging::{init_logging, LoggingConfig};
use trellis_ui::prelude::*;

/// Logs every text change the model publishes.
struct LogObserver;

impl Observer for LogObserver {
    fn text_changed(&self, text: &str) {
        log::info!("model text: {text}");
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = WindowConfig::default().title("My Game Engine").size(800, 600);
    let (w, h) = (config.width as f32, config.height as f32);

    let model = Rc::new(RefCell::new(Model::default()));
    let observer: Rc<dyn Observer> = Rc::new(LogObserver);
    model.borrow_mut().subscribe(&observer);

    let mut content = Container::content(0.0, 0.0, w, h);
    content.add_child(ImageComponent::new(50.0, 50.0, 100.0, 100.0, "output.png"))?;

    let glass = Container::glass(EventController::new(model.clone()), 0.0, 0.0, w, h);

    let mut window = Window::new(config);
    window.add_child(content)?;
    window.add_child(glass)?;

    window.run_main_loop()?;

    log::info!("final model text: {}", model.borrow().text());
    Ok(())
}
