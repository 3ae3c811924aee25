//! Landscape backgrounds offered by the popups

use drivescape_math::Color;

/// One selectable landscape
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub id: &'static str,
    /// Flat colour shown until the image arrives
    pub placeholder: Color,
    pub image: String,
    /// Tried in order when `image` fails
    pub fallbacks: Vec<String>,
}

impl Background {
    /// Primary image followed by its fallbacks
    pub fn candidates(&self) -> Vec<String> {
        std::iter::once(self.image.clone())
            .chain(self.fallbacks.iter().cloned())
            .collect()
    }
}

const LANDSCAPES: [(&str, u32, &str); 5] = [
    ("mnzr1", 0xe1c78f, "1473580044384-7ba9967e16a0"),
    ("mnzr2", 0x87ceeb, "1520942702018-0862200e6873"),
    ("mnzr3", 0x228b22, "1448375240586-882707db888b"),
    ("mnzr4", 0x696969, "1464822759023-fed622ff2c3b"),
    ("mnzr5", 0x4682b4, "1480714378408-67cf0d13bc1b"),
];

fn photo_url(photo: &str) -> String {
    format!("https://images.unsplash.com/photo-{photo}?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80")
}

/// The five landscapes, in carousel order
pub fn landscapes() -> Vec<Background> {
    LANDSCAPES
        .iter()
        .map(|&(id, color, photo)| Background {
            id,
            placeholder: Color::from_hex(color),
            image: format!("/static/images/manzaralar/{id}.jpg"),
            fallbacks: vec![format!("/static/{id}.jpg"), photo_url(photo)],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_landscapes() {
        let all = landscapes();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].id, "mnzr1");
        assert_eq!(all[4].placeholder, Color::from_hex(0x4682b4));
    }

    #[test]
    fn test_candidate_order() {
        let candidates = landscapes()[2].candidates();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0], "/static/images/manzaralar/mnzr3.jpg");
        assert_eq!(candidates[1], "/static/mnzr3.jpg");
        assert!(candidates[2].starts_with("https://images.unsplash.com/photo-1448375240586"));
    }
}
