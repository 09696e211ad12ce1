//! Category domain model.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another category.
//! - `colour` is a palette entry assigned at creation and never mutated.
//! - `name` is stored exactly as normalized at creation.

use crate::model::palette::{is_hex_colour, is_palette_colour};
use crate::model::text::capitalize_first_letter;
use crate::model::{now_epoch_ms, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable category identifier.
pub type CategoryId = Uuid;

/// A named, coloured grouping that owns an ordered list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub uuid: CategoryId,
    /// Display name, first letter capitalized.
    pub name: String,
    /// `#RRGGBB` palette colour.
    pub colour: String,
    /// Unix epoch milliseconds. Gives store default ordering.
    pub created_at: i64,
}

impl Category {
    /// Creates a category from raw user input with a generated id.
    ///
    /// The name is normalized with [`capitalize_first_letter`]; an empty name
    /// is kept as-is.
    pub fn new(raw_name: &str, colour: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: capitalize_first_letter(raw_name),
            colour: colour.into(),
            created_at: now_epoch_ms(),
        }
    }

    /// Checks model invariants before persistence and after read-back.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if !is_hex_colour(&self.colour) {
            return Err(ModelValidationError::MalformedColour(self.colour.clone()));
        }
        if !is_palette_colour(&self.colour) {
            return Err(ModelValidationError::ColourNotInPalette(
                self.colour.clone(),
            ));
        }
        Ok(())
    }
}
