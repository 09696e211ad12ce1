//! Category colour palette and round-robin rotation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed category palette, in rotation order.
pub const PALETTE: [&str; 7] = [
    "#FFB9B3", "#FFD5B8", "#FFF9AA", "#ACECD5", "#7799CC", "#957DAD", "#E0BBE4",
];

static HEX_COLOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex colour regex"));

/// Returns the palette colour for a rotation index, wrapping after the last
/// entry.
pub fn colour_for_index(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Returns whether `value` is written as `#RRGGBB`.
pub fn is_hex_colour(value: &str) -> bool {
    HEX_COLOUR_RE.is_match(value)
}

/// Returns whether `value` names a palette entry. Hex digits compare
/// case-insensitively.
pub fn is_palette_colour(value: &str) -> bool {
    PALETTE
        .iter()
        .any(|entry| entry.eq_ignore_ascii_case(value))
}

/// Round-robin colour cursor for new categories.
///
/// The cursor is session state: it is derived from the live category count
/// rather than persisted, so a deletion followed by a creation can reuse a
/// colour that is still in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColourRotation {
    index: usize,
}

impl ColourRotation {
    /// Starts the rotation at the slot after `live_count` existing categories.
    pub fn from_live_count(live_count: usize) -> Self {
        Self {
            index: live_count % PALETTE.len(),
        }
    }

    /// Colour the next created category will receive.
    pub fn peek(&self) -> &'static str {
        colour_for_index(self.index)
    }

    /// Moves to the next slot. Call only after a creation committed.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % PALETTE.len();
    }

    /// Current zero-based slot in [`PALETTE`].
    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::{colour_for_index, is_hex_colour, is_palette_colour, ColourRotation, PALETTE};

    #[test]
    fn colour_for_index_wraps_after_seven() {
        assert_eq!(colour_for_index(0), "#FFB9B3");
        assert_eq!(colour_for_index(6), "#E0BBE4");
        assert_eq!(colour_for_index(7), "#FFB9B3");
        assert_eq!(colour_for_index(15), PALETTE[1]);
    }

    #[test]
    fn rotation_advances_and_wraps() {
        let mut rotation = ColourRotation::from_live_count(5);
        assert_eq!(rotation.peek(), PALETTE[5]);
        rotation.advance();
        assert_eq!(rotation.peek(), PALETTE[6]);
        rotation.advance();
        assert_eq!(rotation.index(), 0);
        assert_eq!(rotation.peek(), PALETTE[0]);
    }

    #[test]
    fn rotation_from_large_count_is_reduced_modulo_palette() {
        assert_eq!(ColourRotation::from_live_count(9).index(), 2);
    }

    #[test]
    fn palette_membership_rejects_foreign_colours() {
        assert!(is_palette_colour("#ffb9b3"));
        assert!(!is_palette_colour("#000000"));
    }

    #[test]
    fn hex_format_check() {
        assert!(is_hex_colour("#000000"));
        assert!(is_hex_colour("#e0bbe4"));
        assert!(!is_hex_colour("FFB9B3"));
        assert!(!is_hex_colour("#FFB9B"));
        assert!(!is_hex_colour("#GGGGGG"));
        assert!(!is_hex_colour(""));
    }
}
