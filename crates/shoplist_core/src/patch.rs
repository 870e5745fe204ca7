//! Partial-update resolver for positions.
//!
//! # Responsibility
//! - Turn a sparse client record into an ordered list of field assignments.
//! - Keep column names static so SQL text never carries client values.
//!
//! # Invariants
//! - String fields apply only when present and non-empty. A whitespace-only
//!   `article_name` counts as empty, as it does on create.
//! - `done` applies whenever it is present, including `false`.
//! - Assignment order is fixed: `article_name`, `note`, `done`.
//! - A patch with no applicable field is rejected, never written.

use crate::model::{is_blank, ValidationError};
use serde::Deserialize;

/// Sparse update input for `PATCH /positions/{id}`.
///
/// An empty string is indistinguishable from an omitted field, so a note
/// cannot be cleared through this record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PositionPatch {
    #[serde(default, alias = "artikel_name")]
    pub article_name: Option<String>,
    #[serde(default, alias = "bemerkung")]
    pub note: Option<String>,
    #[serde(default, alias = "erledigt")]
    pub done: Option<bool>,
}

/// Updatable position columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionField {
    ArticleName,
    Note,
    Done,
}

impl PositionField {
    pub fn column(self) -> &'static str {
        match self {
            Self::ArticleName => "article_name",
            Self::Note => "note",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchValue {
    Text(String),
    Flag(bool),
}

/// One `(field, value)` pair of a resolved update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub field: PositionField,
    pub value: PatchValue,
}

impl PositionPatch {
    pub fn with_article_name(mut self, value: impl Into<String>) -> Self {
        self.article_name = Some(value.into());
        self
    }

    pub fn with_note(mut self, value: impl Into<String>) -> Self {
        self.note = Some(value.into());
        self
    }

    pub fn with_done(mut self, value: bool) -> Self {
        self.done = Some(value);
        self
    }

    /// Resolves the patch into the assignments that must be written.
    ///
    /// # Errors
    /// - `ValidationError::EmptyPatch` when nothing is eligible.
    pub fn resolve(&self) -> Result<Vec<FieldAssignment>, ValidationError> {
        let mut assignments = Vec::with_capacity(3);

        if let Some(name) = self.article_name.as_deref().filter(|name| !is_blank(name)) {
            assignments.push(FieldAssignment {
                field: PositionField::ArticleName,
                value: PatchValue::Text(name.to_string()),
            });
        }
        if let Some(note) = self.note.as_deref().filter(|note| !note.is_empty()) {
            assignments.push(FieldAssignment {
                field: PositionField::Note,
                value: PatchValue::Text(note.to_string()),
            });
        }
        if let Some(done) = self.done {
            assignments.push(FieldAssignment {
                field: PositionField::Done,
                value: PatchValue::Flag(done),
            });
        }

        if assignments.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        Ok(assignments)
    }
}

/// Builds `SET` clause text with positional placeholders `?1..?n`.
///
/// The id placeholder is `?{n+1}`, returned alongside the clause.
pub fn set_clause(assignments: &[FieldAssignment]) -> (String, usize) {
    let clause = assignments
        .iter()
        .enumerate()
        .map(|(idx, assignment)| format!("{} = ?{}", assignment.field.column(), idx + 1))
        .collect::<Vec<_>>()
        .join(", ");
    (clause, assignments.len() + 1)
}
