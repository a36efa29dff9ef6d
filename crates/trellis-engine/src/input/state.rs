use super::frame::InputFrame;
use super::types::{InputEvent, Modifiers, PointerButtonEvent, PointerMoveEvent};

/// What the runtime remembers between window events.
///
/// winit's button and key events carry neither the pointer position nor
/// the modifiers, so translation fills them in from here.
#[derive(Debug, Default)]
pub(crate) struct InputState {
    pub modifiers: Modifiers,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputState {
    /// Applies `ev` to the held state and appends it to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => self.pointer_pos = Some((*x, *y)),
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Key { modifiers, .. } => self.modifiers = *modifiers,
            InputEvent::PointerButton(PointerButtonEvent { x, y, modifiers, .. }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
            }
            InputEvent::Focused(_) => {}
        }

        frame.events.push(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyState, MouseButton, MouseButtonState};

    #[test]
    fn pointer_tracks_moves_and_leaves() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerMoved(PointerMoveEvent { x: 12.0, y: 34.0 }));
        assert_eq!(state.pointer_pos, Some((12.0, 34.0)));

        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
        assert_eq!(frame.events.len(), 2);
    }

    #[test]
    fn events_keep_arrival_order() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let shift = Modifiers { shift: true, ..Modifiers::default() };

        let press = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 5.0,
            y: 6.0,
            modifiers: Modifiers::default(),
        });
        let space = InputEvent::Key {
            key: Key::Space,
            state: KeyState::Pressed,
            modifiers: shift,
            repeat: false,
        };
        state.apply_event(&mut frame, press.clone());
        state.apply_event(&mut frame, space.clone());

        assert_eq!(frame.events, vec![press, space]);
        assert_eq!(state.modifiers, shift);
        assert_eq!(state.pointer_pos, Some((5.0, 6.0)));

        frame.clear();
        assert!(frame.is_empty());
    }
}
