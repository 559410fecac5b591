use super::types::{InputEvent, Modifiers, PointerButtonEvent, PointerMoveEvent};

/// Input context a backend tracks between native events.
///
/// Some native events arrive without modifier or pointer information; the
/// tracked values fill those in during translation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Last known pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Modifier releases are not delivered to unfocused windows.
                    self.modifiers = Modifiers::default();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { modifiers, .. } => self.modifiers = *modifiers,

            InputEvent::PointerButton(PointerButtonEvent { x, y, modifiers, .. }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
            }

            InputEvent::MouseWheel { modifiers, .. } => self.modifiers = *modifiers,

            InputEvent::Text(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift() -> Modifiers {
        Modifiers { shift: true, ..Modifiers::default() }
    }

    #[test]
    fn pointer_position_follows_moves_and_clears_on_leave() {
        let mut state = InputState::default();
        state.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 4.0, y: 8.0 }));
        assert_eq!(state.pointer_pos, Some((4.0, 8.0)));

        state.apply_event(&InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn focus_loss_resets_modifiers() {
        let mut state = InputState::default();
        state.apply_event(&InputEvent::Focused(true));
        state.apply_event(&InputEvent::ModifiersChanged(shift()));
        assert!(state.modifiers.any());

        state.apply_event(&InputEvent::Focused(false));
        assert!(!state.focused);
        assert!(!state.modifiers.any());
    }
}
