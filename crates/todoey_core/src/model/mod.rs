//! Domain model for categories and their todo items.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never re-derived
//!   from content.
//! - A category colour is always one of [`palette::PALETTE`].
//! - An item belongs to exactly one category.

pub mod category;
pub mod item;
pub mod palette;
pub mod text;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Model-level invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Colour is not written as `#RRGGBB`.
    MalformedColour(String),
    /// Well-formed colour that is not part of the category palette.
    ColourNotInPalette(String),
    /// Item position must be non-negative.
    NegativePosition(i64),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedColour(colour) => {
                write!(f, "colour `{colour}` is not a #RRGGBB hex code")
            }
            Self::ColourNotInPalette(colour) => {
                write!(f, "colour `{colour}` is not in the category palette")
            }
            Self::NegativePosition(position) => {
                write!(f, "item position must be >= 0, got {position}")
            }
        }
    }
}

impl Error for ModelValidationError {}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clamps to `0` if the system clock reports a time before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
