//! Three-card carousel over a fixed list of items
//!
//! The window shows items `index`, `index + 1` and `index + 2`; the middle
//! card is the one that gets selected.

/// Cards shown at once
pub const VISIBLE_CARDS: usize = 3;

/// Vertical pointer travel, in pixels, that counts as a swipe
pub const DRAG_THRESHOLD: f32 = 20.0;

/// Layout of one visible card slot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardStyle {
    /// Vertical offset from the popup centre in pixels
    pub offset_y: f32,
    pub scale: f32,
    pub opacity: f32,
    pub z_order: u8,
}

const SLOT_STYLES: [CardStyle; VISIBLE_CARDS] = [
    CardStyle {
        offset_y: -180.0,
        scale: 0.8,
        opacity: 0.6,
        z_order: 2,
    },
    CardStyle {
        offset_y: 0.0,
        scale: 1.0,
        opacity: 1.0,
        z_order: 3,
    },
    CardStyle {
        offset_y: 180.0,
        scale: 0.8,
        opacity: 0.6,
        z_order: 1,
    },
];

/// Unscaled card size in pixels
pub const CARD_SIZE: (f32, f32) = (420.0, 300.0);

/// Popup box size in pixels, padding included
pub const POPUP_SIZE: (f32, f32) = (630.0, 510.0);

/// What a pointer lands on while the popup is open
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupHit {
    /// A card slot, 0 = top
    Card(usize),
    /// Inside the popup but between cards
    Popup,
    /// The blocker around the popup
    Blocker,
}

/// Hit-test a pointer at `(x, y)` pixels from the popup centre
///
/// Cards overlap; the one with the highest z-order wins. Cards are clipped
/// to the popup box.
pub fn hit_test(x: f32, y: f32) -> PopupHit {
    if x.abs() > POPUP_SIZE.0 / 2.0 || y.abs() > POPUP_SIZE.1 / 2.0 {
        return PopupHit::Blocker;
    }
    let mut slots: [usize; VISIBLE_CARDS] = [0, 1, 2];
    slots.sort_by_key(|&slot| std::cmp::Reverse(SLOT_STYLES[slot].z_order));
    slots
        .into_iter()
        .find(|&slot| {
            let style = SLOT_STYLES[slot];
            x.abs() <= CARD_SIZE.0 * style.scale / 2.0 && (y - style.offset_y).abs() <= CARD_SIZE.1 * style.scale / 2.0
        })
        .map_or(PopupHit::Popup, PopupHit::Card)
}

/// A visible card: which item sits in which slot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Card {
    pub item: usize,
    pub slot: usize,
    pub style: CardStyle,
}

/// Result of feeding input to the carousel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarouselAction {
    None,
    Moved,
    /// The centre card was chosen
    Selected(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Carousel {
    len: usize,
    index: usize,
    drag_start: Option<f32>,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            drag_start: None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First visible item
    pub fn index(&self) -> usize {
        self.index
    }

    fn last_start(&self) -> usize {
        self.len.saturating_sub(VISIBLE_CARDS)
    }

    /// Advance by one, wrapping to the start past the last full window
    pub fn next(&mut self) {
        if self.index >= self.last_start() {
            self.index = 0;
        } else {
            self.index += 1;
        }
    }

    /// Go back by one, wrapping to the last full window
    pub fn prev(&mut self) {
        if self.index == 0 {
            self.index = self.last_start();
        } else {
            self.index -= 1;
        }
    }

    /// Item on the centre card
    pub fn centre(&self) -> Option<usize> {
        let item = self.index + 1;
        (item < self.len).then_some(item)
    }

    pub fn cards(&self) -> Vec<Card> {
        (0..VISIBLE_CARDS)
            .map(|slot| (slot, self.index + slot))
            .filter(|&(_, item)| item < self.len)
            .map(|(slot, item)| Card {
                item,
                slot,
                style: SLOT_STYLES[slot],
            })
            .collect()
    }

    /// A click on a visible slot: centre selects, top goes back, bottom
    /// goes forward
    pub fn click(&mut self, slot: usize) -> CarouselAction {
        match slot {
            0 => {
                self.prev();
                CarouselAction::Moved
            }
            1 => self.centre().map_or(CarouselAction::None, CarouselAction::Selected),
            2 => {
                self.next();
                CarouselAction::Moved
            }
            _ => CarouselAction::None,
        }
    }

    pub fn select(&self) -> CarouselAction {
        self.centre().map_or(CarouselAction::None, CarouselAction::Selected)
    }

    pub fn drag_start(&mut self, y: f32) {
        self.drag_start = Some(y);
    }

    /// Pointer moved while pressed; a swipe past the threshold moves once
    /// and ends the drag
    pub fn drag_move(&mut self, y: f32) -> CarouselAction {
        let Some(start) = self.drag_start else {
            return CarouselAction::None;
        };
        let travel = y - start;
        if travel.abs() <= DRAG_THRESHOLD {
            return CarouselAction::None;
        }
        if travel > 0.0 {
            self.prev();
        } else {
            self.next();
        }
        self.drag_start = None;
        CarouselAction::Moved
    }

    pub fn drag_end(&mut self) {
        self.drag_start = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Wheel up goes back; anything else, including a zero delta, goes forward
    pub fn wheel(&mut self, delta_y: f32) -> CarouselAction {
        if delta_y < 0.0 {
            self.prev();
        } else {
            self.next();
        }
        CarouselAction::Moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps_after_last_window() {
        let mut carousel = Carousel::new(5);
        carousel.next();
        carousel.next();
        assert_eq!(carousel.index(), 2);
        carousel.next();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_prev_wraps_to_last_window() {
        let mut carousel = Carousel::new(5);
        carousel.prev();
        assert_eq!(carousel.index(), 2);
        carousel.prev();
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_short_list_stays_put() {
        let mut carousel = Carousel::new(2);
        carousel.next();
        assert_eq!(carousel.index(), 0);
        carousel.prev();
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.cards().len(), 2);

        let empty = Carousel::new(0);
        assert_eq!(empty.centre(), None);
        assert!(empty.cards().is_empty());
    }

    #[test]
    fn test_card_styles() {
        let mut carousel = Carousel::new(5);
        carousel.next();
        let cards = carousel.cards();
        assert_eq!(cards.iter().map(|c| c.item).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(cards[1].style.scale, 1.0);
        assert_eq!(cards[1].style.z_order, 3);
        assert_eq!(cards[0].style.offset_y, -180.0);
        assert_eq!(cards[2].style.opacity, 0.6);
    }

    #[test]
    fn test_click_slots() {
        let mut carousel = Carousel::new(5);
        assert_eq!(carousel.click(1), CarouselAction::Selected(1));
        assert_eq!(carousel.click(2), CarouselAction::Moved);
        assert_eq!(carousel.index(), 1);
        assert_eq!(carousel.click(0), CarouselAction::Moved);
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.click(7), CarouselAction::None);
    }

    #[test]
    fn test_drag_moves_once_past_threshold() {
        let mut carousel = Carousel::new(5);
        carousel.drag_start(100.0);
        assert_eq!(carousel.drag_move(115.0), CarouselAction::None);
        assert_eq!(carousel.drag_move(80.0), CarouselAction::None);
        // upward swipe goes forward
        assert_eq!(carousel.drag_move(70.0), CarouselAction::Moved);
        assert_eq!(carousel.index(), 1);
        assert!(!carousel.is_dragging());
        assert_eq!(carousel.drag_move(0.0), CarouselAction::None);

        carousel.drag_start(100.0);
        assert_eq!(carousel.drag_move(130.0), CarouselAction::Moved);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_hit_test_prefers_centre_card() {
        assert_eq!(hit_test(0.0, 0.0), PopupHit::Card(1));
        // overlap between top and centre card goes to the centre
        assert_eq!(hit_test(0.0, -140.0), PopupHit::Card(1));
        assert_eq!(hit_test(0.0, -200.0), PopupHit::Card(0));
        assert_eq!(hit_test(100.0, 200.0), PopupHit::Card(2));
    }

    #[test]
    fn test_hit_test_outside_cards() {
        assert_eq!(hit_test(250.0, 0.0), PopupHit::Popup);
        assert_eq!(hit_test(0.0, 290.0), PopupHit::Blocker);
        assert_eq!(hit_test(-400.0, 0.0), PopupHit::Blocker);
    }

    #[test]
    fn test_wheel_direction() {
        let mut carousel = Carousel::new(5);
        assert_eq!(carousel.wheel(-3.0), CarouselAction::Moved);
        assert_eq!(carousel.index(), 2);
        assert_eq!(carousel.wheel(3.0), CarouselAction::Moved);
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.wheel(0.0), CarouselAction::Moved);
        assert_eq!(carousel.index(), 1);
    }
}
