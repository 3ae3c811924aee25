//! Floor button that opens the landscape picker
//!
//! Unlike the green box, picking a landscape here only marks the card.

use drivescape_core::{ObjectTemplate, Tick, ZoneEvent, ZoneKey};

use super::backgrounds::{landscapes, Background};
use super::button::{ButtonStyle, HoverButton};
use super::popup::{Popup, PopupOutcome};
use super::{BuildContext, ObjectContext, ObjectInput, WorldObject};

pub struct PopupButton {
    name: String,
    button: HoverButton,
    popup: Popup,
    backgrounds: Vec<Background>,
}

impl PopupButton {
    pub fn new(template: &ObjectTemplate, ctx: &mut BuildContext<'_>) -> Self {
        let position = template.effective_placement(ctx.debug_enabled()).position;
        let button = HoverButton::new(ctx.world, ctx.areas, &template.name, position.xy(), ButtonStyle::LARGE);
        let backgrounds = landscapes();
        log::info!("Placed popup button '{}' at {:?}", template.name, position.xy());

        Self {
            name: template.name.clone(),
            button,
            popup: Popup::new(backgrounds.len()),
            backgrounds,
        }
    }

    pub fn button(&self) -> &HoverButton {
        &self.button
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    /// Id of the marked landscape
    pub fn selected_background(&self) -> Option<&'static str> {
        self.popup
            .selected()
            .and_then(|i| self.backgrounds.get(i))
            .map(|b| b.id)
    }
}

impl WorldObject for PopupButton {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: Tick, ctx: &mut ObjectContext<'_>) {
        self.button.update(ctx.world, tick);
    }

    fn on_zone(&mut self, zone: ZoneKey, event: ZoneEvent, _ctx: &mut ObjectContext<'_>) {
        self.button.on_zone(zone, event);
    }

    fn handle_input(&mut self, input: ObjectInput, ctx: &mut ObjectContext<'_>) -> bool {
        if input == ObjectInput::Interact {
            let near = ctx
                .vehicle_position()
                .is_some_and(|p| self.button.within_radius(p));
            if near {
                self.popup.toggle(ctx.effects);
            }
            return near;
        }

        let outcome = self.popup.handle_input(input, ctx.effects);
        if let PopupOutcome::Selected(_) = outcome {
            log::info!("Landscape {} marked", self.selected_background().unwrap_or("?"));
        }
        outcome.consumed()
    }

    fn popup_open(&self) -> bool {
        self.popup.is_visible()
    }
}
