//! List position (line item) model.

use super::{is_blank, EntityId, ValidationError};
use serde::{Deserialize, Serialize};

/// One line item of a shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: EntityId,
    pub list_id: EntityId,
    pub article_name: String,
    /// Empty when the client never supplied a note.
    pub note: String,
    pub done: bool,
}

/// Create input for `POST /lists/{id}/positions`.
///
/// The owning list comes from the path, and `done` always starts `false`,
/// so neither is part of the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewPosition {
    #[serde(default, alias = "artikel_name")]
    pub article_name: String,
    #[serde(default, alias = "bemerkung")]
    pub note: Option<String>,
}

impl NewPosition {
    pub fn new(article_name: impl Into<String>) -> Self {
        Self {
            article_name: article_name.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.article_name) {
            return Err(ValidationError::EmptyPositionArticleName);
        }
        Ok(())
    }

    /// Note value to persist; absent notes are stored as the empty string.
    pub fn note_or_default(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}
