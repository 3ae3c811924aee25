//! Popup with a card carousel
//!
//! While visible the popup swallows game input and the vehicle cannot be
//! driven. Opening is left to the owner, which knows whether the vehicle is
//! close enough.

use super::carousel::{Carousel, CarouselAction};
use super::{ObjectInput, SceneEffect};

/// What the popup did with an input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupOutcome {
    /// Not for the popup
    Ignored,
    Handled,
    /// The centre card was chosen
    Selected(usize),
}

impl PopupOutcome {
    pub fn consumed(self) -> bool {
        self != PopupOutcome::Ignored
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    visible: bool,
    carousel: Carousel,
    selected: Option<usize>,
}

impl Popup {
    pub fn new(items: usize) -> Self {
        Self {
            visible: false,
            carousel: Carousel::new(items),
            selected: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// Last chosen item, shown with a check mark
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn show(&mut self, effects: &mut Vec<SceneEffect>) {
        if self.visible {
            return;
        }
        self.visible = true;
        effects.push(SceneEffect::InputBlocker(true));
        effects.push(SceneEffect::VehicleControls(false));
        log::debug!("Popup shown");
    }

    pub fn hide(&mut self, effects: &mut Vec<SceneEffect>) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.carousel.drag_end();
        effects.push(SceneEffect::InputBlocker(false));
        effects.push(SceneEffect::VehicleControls(true));
        log::debug!("Popup hidden");
    }

    pub fn toggle(&mut self, effects: &mut Vec<SceneEffect>) {
        if self.visible {
            self.hide(effects);
        } else {
            self.show(effects);
        }
    }

    /// Route carousel and dismiss input; everything but `Interact` and
    /// `Launch` is ignored while hidden
    pub fn handle_input(&mut self, input: ObjectInput, effects: &mut Vec<SceneEffect>) -> PopupOutcome {
        if !self.visible {
            return PopupOutcome::Ignored;
        }
        let action = match input {
            ObjectInput::Cancel | ObjectInput::BlockerClicked => {
                self.hide(effects);
                return PopupOutcome::Handled;
            }
            ObjectInput::Prev => {
                self.carousel.prev();
                CarouselAction::Moved
            }
            ObjectInput::Next => {
                self.carousel.next();
                CarouselAction::Moved
            }
            ObjectInput::Select => self.carousel.select(),
            ObjectInput::CardClicked(slot) => self.carousel.click(slot),
            ObjectInput::DragStart(y) => {
                self.carousel.drag_start(y);
                CarouselAction::None
            }
            ObjectInput::DragMove(y) => self.carousel.drag_move(y),
            ObjectInput::DragEnd => {
                self.carousel.drag_end();
                CarouselAction::None
            }
            ObjectInput::Wheel(delta) => self.carousel.wheel(delta),
            ObjectInput::Interact | ObjectInput::Launch => return PopupOutcome::Ignored,
        };

        match action {
            CarouselAction::Selected(item) => {
                self.selected = Some(item);
                PopupOutcome::Selected(item)
            }
            CarouselAction::Moved | CarouselAction::None => PopupOutcome::Handled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_and_hide_toggle_controls() {
        let mut popup = Popup::new(5);
        let mut effects = Vec::new();
        popup.show(&mut effects);
        assert!(popup.is_visible());
        assert_eq!(
            effects,
            vec![SceneEffect::InputBlocker(true), SceneEffect::VehicleControls(false)]
        );

        effects.clear();
        popup.show(&mut effects);
        assert!(effects.is_empty());

        popup.handle_input(ObjectInput::Cancel, &mut effects);
        assert!(!popup.is_visible());
        assert_eq!(
            effects,
            vec![SceneEffect::InputBlocker(false), SceneEffect::VehicleControls(true)]
        );
    }

    #[test]
    fn test_hidden_popup_ignores_navigation() {
        let mut popup = Popup::new(5);
        let mut effects = Vec::new();
        assert_eq!(popup.handle_input(ObjectInput::Next, &mut effects), PopupOutcome::Ignored);
        assert_eq!(popup.carousel().index(), 0);
    }

    #[test]
    fn test_select_marks_centre_card() {
        let mut popup = Popup::new(5);
        let mut effects = Vec::new();
        popup.show(&mut effects);
        popup.handle_input(ObjectInput::Next, &mut effects);
        assert_eq!(popup.handle_input(ObjectInput::Select, &mut effects), PopupOutcome::Selected(2));
        assert_eq!(popup.selected(), Some(2));
        assert_eq!(popup.handle_input(ObjectInput::CardClicked(1), &mut effects), PopupOutcome::Selected(2));
    }

    #[test]
    fn test_blocker_click_hides() {
        let mut popup = Popup::new(5);
        let mut effects = Vec::new();
        popup.toggle(&mut effects);
        assert!(popup.handle_input(ObjectInput::BlockerClicked, &mut effects).consumed());
        assert!(!popup.is_visible());
    }

    #[test]
    fn test_interact_left_to_owner() {
        let mut popup = Popup::new(5);
        let mut effects = Vec::new();
        popup.show(&mut effects);
        assert_eq!(popup.handle_input(ObjectInput::Interact, &mut effects), PopupOutcome::Ignored);
    }
}
