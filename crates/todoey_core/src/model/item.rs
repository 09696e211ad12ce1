//! Item domain model.

use crate::model::category::CategoryId;
use crate::model::text::capitalize_first_letter;
use crate::model::{now_epoch_ms, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable item identifier.
pub type ItemId = Uuid;

/// A single task owned by one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub uuid: ItemId,
    /// Owning category (back-reference).
    pub category_uuid: CategoryId,
    pub title: String,
    pub done: bool,
    /// Unix epoch milliseconds, set once at creation.
    pub date_created: i64,
    /// Append index inside the owning category.
    pub position: i64,
}

impl Item {
    /// Creates a not-done item for `category_uuid` with a normalized title.
    ///
    /// `position` is assigned by the store on append.
    pub fn new(category_uuid: CategoryId, raw_title: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            category_uuid,
            title: capitalize_first_letter(raw_title),
            done: false,
            date_created: now_epoch_ms(),
            position: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.position < 0 {
            return Err(ModelValidationError::NegativePosition(self.position));
        }
        Ok(())
    }
}
