//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard, wheel and click input to high-level actions like Interact, Cancel, etc.
//! Driving keys (WASD, arrows, Space) go directly to the VehicleController
//! unless a popup is open, in which case arrows and Space belong to the popup.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::objects::carousel::{hit_test, PopupHit};
use crate::objects::ObjectInput;

/// Actions triggered by special input (not driving)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Toggle the popup of the button the vehicle stands on (Enter)
    Interact,
    /// Hide the open popup (Escape while a popup is open)
    Cancel,
    /// Exit application (Escape otherwise)
    Exit,
    /// Previous carousel card (Up/Left, wheel up)
    NavigatePrev,
    /// Next carousel card (Down/Right, wheel down)
    NavigateNext,
    /// Select the centre card (Space)
    Select,
    /// Click on a visible carousel card, 0 = top
    ClickCard(usize),
    /// Click on the dimmed area around the popup
    ClickBlocker,
    /// Launch the rocket (K key)
    LaunchRocket,
    /// Put the vehicle back at its spawn (R key)
    ResetVehicle,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Toggle collider helpers (C key)
    ToggleColliders,
}

impl InputAction {
    /// What world objects receive for this action; `None` for app-level actions
    pub fn object_input(self) -> Option<ObjectInput> {
        match self {
            InputAction::Interact => Some(ObjectInput::Interact),
            InputAction::Cancel => Some(ObjectInput::Cancel),
            InputAction::NavigatePrev => Some(ObjectInput::Prev),
            InputAction::NavigateNext => Some(ObjectInput::Next),
            InputAction::Select => Some(ObjectInput::Select),
            InputAction::ClickCard(slot) => Some(ObjectInput::CardClicked(slot)),
            InputAction::ClickBlocker => Some(ObjectInput::BlockerClicked),
            InputAction::LaunchRocket => Some(ObjectInput::Launch),
            InputAction::Exit
            | InputAction::ResetVehicle
            | InputAction::ToggleFullscreen
            | InputAction::ToggleColliders => None,
        }
    }
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `None` for driving keys while no popup is open
    pub fn map_keyboard(key: KeyCode, state: ElementState, popup_open: bool) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Enter | KeyCode::NumpadEnter => Some(InputAction::Interact),
            KeyCode::Escape => {
                if popup_open {
                    Some(InputAction::Cancel)
                } else {
                    Some(InputAction::Exit)
                }
            }
            KeyCode::ArrowUp | KeyCode::ArrowLeft if popup_open => Some(InputAction::NavigatePrev),
            KeyCode::ArrowDown | KeyCode::ArrowRight if popup_open => Some(InputAction::NavigateNext),
            KeyCode::Space if popup_open => Some(InputAction::Select),
            KeyCode::KeyK => Some(InputAction::LaunchRocket),
            KeyCode::KeyR => Some(InputAction::ResetVehicle),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::KeyC => Some(InputAction::ToggleColliders),
            _ => None,
        }
    }

    /// Map a click at window position `(x, y)` onto the open popup
    ///
    /// The popup is centred in a `width` by `height` window. Clicks between
    /// cards do nothing.
    pub fn map_click(x: f32, y: f32, width: f32, height: f32, popup_open: bool) -> Option<InputAction> {
        if !popup_open {
            return None;
        }
        match hit_test(x - width / 2.0, y - height / 2.0) {
            PopupHit::Card(slot) => Some(InputAction::ClickCard(slot)),
            PopupHit::Blocker => Some(InputAction::ClickBlocker),
            PopupHit::Popup => None,
        }
    }

    /// Map a wheel delta (positive = scrolled down) to navigation
    pub fn map_wheel(delta_y: f32, popup_open: bool) -> Option<InputAction> {
        if !popup_open || delta_y == 0.0 {
            return None;
        }
        if delta_y < 0.0 {
            Some(InputAction::NavigatePrev)
        } else {
            Some(InputAction::NavigateNext)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_with_popup_cancels() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Pressed, true);
        assert_eq!(action, Some(InputAction::Cancel));
    }

    #[test]
    fn test_escape_without_popup_exits() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Pressed, false);
        assert_eq!(action, Some(InputAction::Exit));
    }

    #[test]
    fn test_driving_keys_not_mapped() {
        for key in [
            KeyCode::KeyW,
            KeyCode::KeyA,
            KeyCode::KeyS,
            KeyCode::KeyD,
            KeyCode::ArrowUp,
            KeyCode::ArrowRight,
            KeyCode::Space,
        ] {
            let action = InputMapper::map_keyboard(key, ElementState::Pressed, false);
            assert_eq!(action, None, "Key {:?} should not be mapped", key);
        }
    }

    #[test]
    fn test_arrows_navigate_open_popup() {
        let map = |key| InputMapper::map_keyboard(key, ElementState::Pressed, true);
        assert_eq!(map(KeyCode::ArrowUp), Some(InputAction::NavigatePrev));
        assert_eq!(map(KeyCode::ArrowLeft), Some(InputAction::NavigatePrev));
        assert_eq!(map(KeyCode::ArrowDown), Some(InputAction::NavigateNext));
        assert_eq!(map(KeyCode::ArrowRight), Some(InputAction::NavigateNext));
        assert_eq!(map(KeyCode::Space), Some(InputAction::Select));
    }

    #[test]
    fn test_key_release_ignored() {
        let action = InputMapper::map_keyboard(KeyCode::Enter, ElementState::Released, false);
        assert_eq!(action, None);
    }

    #[test]
    fn test_wheel_only_while_open() {
        assert_eq!(InputMapper::map_wheel(-1.0, true), Some(InputAction::NavigatePrev));
        assert_eq!(InputMapper::map_wheel(3.0, true), Some(InputAction::NavigateNext));
        assert_eq!(InputMapper::map_wheel(3.0, false), None);
        assert_eq!(InputMapper::map_wheel(0.0, true), None);
    }

    #[test]
    fn test_click_on_cards() {
        let click = |x, y| InputMapper::map_click(x, y, 1280.0, 720.0, true);
        assert_eq!(click(640.0, 360.0), Some(InputAction::ClickCard(1)));
        assert_eq!(click(640.0, 150.0), Some(InputAction::ClickCard(0)));
        assert_eq!(click(700.0, 570.0), Some(InputAction::ClickCard(2)));
        assert_eq!(click(900.0, 360.0), None);
    }

    #[test]
    fn test_click_outside_popup() {
        assert_eq!(
            InputMapper::map_click(20.0, 20.0, 1280.0, 720.0, true),
            Some(InputAction::ClickBlocker)
        );
        assert_eq!(InputMapper::map_click(640.0, 360.0, 1280.0, 720.0, false), None);
    }

    #[test]
    fn test_special_keys() {
        let map = |key| InputMapper::map_keyboard(key, ElementState::Pressed, false);
        assert_eq!(map(KeyCode::Enter), Some(InputAction::Interact));
        assert_eq!(map(KeyCode::KeyK), Some(InputAction::LaunchRocket));
        assert_eq!(map(KeyCode::KeyR), Some(InputAction::ResetVehicle));
        assert_eq!(map(KeyCode::KeyF), Some(InputAction::ToggleFullscreen));
        assert_eq!(map(KeyCode::KeyC), Some(InputAction::ToggleColliders));
    }

    #[test]
    fn test_object_inputs() {
        assert_eq!(InputAction::Interact.object_input(), Some(ObjectInput::Interact));
        assert_eq!(InputAction::NavigatePrev.object_input(), Some(ObjectInput::Prev));
        assert_eq!(InputAction::LaunchRocket.object_input(), Some(ObjectInput::Launch));
        assert_eq!(InputAction::ClickCard(2).object_input(), Some(ObjectInput::CardClicked(2)));
        assert_eq!(InputAction::ClickBlocker.object_input(), Some(ObjectInput::BlockerClicked));
        assert_eq!(InputAction::Exit.object_input(), None);
        assert_eq!(InputAction::ToggleColliders.object_input(), None);
    }
}
