use std::cell::RefCell;
use std::rc::Rc;

use trellis_engine::input::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};

use crate::model::Model;

pub const MOUSE_CLICKED_TEXT: &str = "Mouse Clicked";
pub const SPACE_PRESSED_TEXT: &str = "Space Key Pressed";

/// Turns raw input into model mutations.
///
/// A primary-button press sets the text to [`MOUSE_CLICKED_TEXT`]; a Space
/// press sets it to [`SPACE_PRESSED_TEXT`]. Everything else is ignored.
#[derive(Debug, Clone)]
pub struct EventController {
    model: Rc<RefCell<Model>>,
}

impl EventController {
    pub fn new(model: Rc<RefCell<Model>>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Rc<RefCell<Model>> {
        &self.model
    }

    /// `x`/`y` are logical pixels from the window's top-left corner.
    pub fn on_mouse_event(&self, button: MouseButton, state: MouseButtonState, x: f32, y: f32) -> bool {
        if !button.is_primary() || state != MouseButtonState::Pressed {
            return false;
        }
        log::debug!("primary press at ({x}, {y})");
        self.set_text(MOUSE_CLICKED_TEXT);
        true
    }

    pub fn on_key_event(&self, key: Key, state: KeyState) -> bool {
        if key != Key::Space || state != KeyState::Pressed {
            return false;
        }
        self.set_text(SPACE_PRESSED_TEXT);
        true
    }

    // The model borrow ends before observers run, so they can read it back.
    fn set_text(&self, text: &str) {
        let change = self.model.borrow_mut().stage_text(text);
        change.notify();
    }

    /// Routes an engine input event to the matching handler. Key repeats are
    /// not presses.
    pub fn handle(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerButton(b) => self.on_mouse_event(b.button, b.state, b.x, b.y),
            InputEvent::Key { key, state, repeat: false, .. } => self.on_key_event(*key, *state),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use trellis_engine::input::{Modifiers, PointerButtonEvent};

    use super::*;

    use crate::model::Observer;

    fn controller() -> (Rc<RefCell<Model>>, EventController) {
        let model = Rc::new(RefCell::new(Model::default()));
        let controller = EventController::new(model.clone());
        (model, controller)
    }

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat }
    }

    #[test]
    fn primary_press_sets_mouse_text() {
        let (model, c) = controller();
        assert!(c.on_mouse_event(MouseButton::Left, MouseButtonState::Pressed, 5.0, 5.0));
        assert_eq!(model.borrow().text(), MOUSE_CLICKED_TEXT);
    }

    #[test]
    fn release_and_other_buttons_are_ignored() {
        let (model, c) = controller();
        assert!(!c.on_mouse_event(MouseButton::Left, MouseButtonState::Released, 0.0, 0.0));
        assert!(!c.on_mouse_event(MouseButton::Right, MouseButtonState::Pressed, 0.0, 0.0));
        assert_eq!(model.borrow().text(), "Initial Text");
    }

    #[test]
    fn space_press_sets_key_text() {
        let (model, c) = controller();
        assert!(c.handle(&key(Key::Space, KeyState::Pressed, false)));
        assert_eq!(model.borrow().text(), SPACE_PRESSED_TEXT);
    }

    #[test]
    fn other_keys_releases_and_repeats_are_ignored() {
        let (model, c) = controller();
        assert!(!c.handle(&key(Key::Unknown(40), KeyState::Pressed, false)));
        assert!(!c.handle(&key(Key::Space, KeyState::Released, false)));
        assert!(!c.handle(&key(Key::Space, KeyState::Pressed, true)));
        assert!(!c.handle(&InputEvent::Focused(true)));
        assert_eq!(model.borrow().text(), "Initial Text");
    }

    /// Reads the shared model from inside the callback.
    struct ModelReader {
        model: Rc<RefCell<Model>>,
        seen: RefCell<Vec<String>>,
    }

    impl Observer for ModelReader {
        fn text_changed(&self, text: &str) {
            let current = self.model.borrow().text().to_string();
            assert_eq!(current, text);
            self.seen.borrow_mut().push(current);
        }
    }

    #[test]
    fn observers_can_read_the_model_while_notified() {
        let (model, c) = controller();
        let reader = Rc::new(ModelReader { model: model.clone(), seen: RefCell::default() });
        let observer: Rc<dyn Observer> = reader.clone();
        model.borrow_mut().subscribe(&observer);

        assert!(c.on_mouse_event(MouseButton::Left, MouseButtonState::Pressed, 1.0, 1.0));
        assert!(c.on_key_event(Key::Space, KeyState::Pressed));

        assert_eq!(*reader.seen.borrow(), vec![MOUSE_CLICKED_TEXT, SPACE_PRESSED_TEXT]);
    }

    #[test]
    fn handle_routes_pointer_buttons() {
        let (model, c) = controller();
        let press = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 60.0,
            y: 70.0,
            modifiers: Modifiers::default(),
        });
        assert!(c.handle(&press));
        assert_eq!(model.borrow().text(), MOUSE_CLICKED_TEXT);
    }
}
