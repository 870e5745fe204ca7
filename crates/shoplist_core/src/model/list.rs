//! Shopping list model.
//!
//! # Invariants
//! - `created_at` is assigned by storage at insert time and never changes.
//! - `created_at` is UTC ISO-8601 with millisecond precision, so the text
//!   order equals the chronological order.

use super::{is_blank, EntityId, ValidationError};
use serde::{Deserialize, Serialize};

/// A named shopping list that owns zero or more positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: EntityId,
    pub label: String,
    pub created_at: String,
}

/// Create input for `POST /lists`. Legacy clients send `bezeichnung`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewList {
    #[serde(default, alias = "bezeichnung")]
    pub label: String,
}

impl NewList {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.label) {
            return Err(ValidationError::EmptyListLabel);
        }
        Ok(())
    }
}
