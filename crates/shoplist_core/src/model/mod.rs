//! Domain model for the article catalog, shopping lists and their positions.
//!
//! # Responsibility
//! - Define canonical records returned by repositories.
//! - Define create inputs together with their validation rules.
//!
//! # Invariants
//! - Ids are assigned by storage and never reassigned.
//! - A position belongs to exactly one list for its whole lifetime.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article;
pub mod list;
pub mod position;

/// Store-assigned row id. Valid ids are strictly positive.
pub type EntityId = i64;

/// Entity families, used to label not-found outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Article,
    List,
    Position,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::List => "list",
            Self::Position => "position",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input validation failures raised before any SQL is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyArticleName,
    EmptyListLabel,
    EmptyPositionArticleName,
    /// A partial update carried no applicable field.
    EmptyPatch,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyArticleName => write!(f, "article name is required"),
            Self::EmptyListLabel => write!(f, "list label is required"),
            Self::EmptyPositionArticleName => write!(f, "position article_name is required"),
            Self::EmptyPatch => write!(f, "no update fields supplied"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
