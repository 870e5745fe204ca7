//! Catalog article model.

use super::{is_blank, EntityId, ValidationError};
use serde::{Deserialize, Serialize};

/// Reusable article name. Positions copy the name by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: EntityId,
    pub name: String,
}

/// Create input for `POST /articles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewArticle {
    #[serde(default)]
    pub name: String,
}

impl NewArticle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::EmptyArticleName);
        }
        Ok(())
    }
}
