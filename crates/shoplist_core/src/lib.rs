//! Core domain logic for the shopping list service.
//! This crate is the single source of truth for storage and business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod patch;
pub mod repo;

pub use db::{DbError, DbResult, Session, Store};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::{Article, NewArticle};
pub use model::list::{NewList, ShoppingList};
pub use model::position::{NewPosition, Position};
pub use model::{EntityId, EntityKind, ValidationError};
pub use patch::{FieldAssignment, PatchValue, PositionField, PositionPatch};
pub use repo::article_repo::{ArticleRepository, SqliteArticleRepository};
pub use repo::list_repo::{ListRepository, SqliteListRepository};
pub use repo::position_repo::{PositionRepository, SqlitePositionRepository};
pub use repo::{RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
