//! Shopping list repository.
//!
//! # Responsibility
//! - Provide list CRUD over the `lists` table.
//! - Own the compound list delete that removes dependent positions first.
//!
//! # Invariants
//! - Lists are returned most recent first (`created_at DESC, id DESC`).
//! - Positions of a list are deleted before the list row itself.
//! - The two deletes are independent statements; a crash between them can
//!   leave positions deleted while the list survives, never the reverse.

use crate::model::list::{NewList, ShoppingList};
use crate::model::{EntityId, EntityKind};
use crate::repo::{RepoError, RepoResult};
use log::warn;
use rusqlite::{Connection, OptionalExtension, Row};

const LIST_SELECT_SQL: &str = "SELECT id, label, created_at FROM lists";

/// Repository interface for shopping lists.
pub trait ListRepository {
    fn list_lists(&self) -> RepoResult<Vec<ShoppingList>>;
    fn get_list(&self, id: EntityId) -> RepoResult<ShoppingList>;
    /// Inserts a list and returns it with server-assigned id and timestamp.
    fn create_list(&self, input: &NewList) -> RepoResult<ShoppingList>;
    /// Deletes all positions of the list, then the list.
    fn delete_list(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn list_lists(&self) -> RepoResult<Vec<ShoppingList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }
        Ok(lists)
    }

    fn get_list(&self, id: EntityId) -> RepoResult<ShoppingList> {
        self.conn
            .query_row(
                &format!("{LIST_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_list_row,
            )
            .optional()?
            .ok_or_else(|| RepoError::not_found(EntityKind::List, id))
    }

    fn create_list(&self, input: &NewList) -> RepoResult<ShoppingList> {
        input.validate()?;

        self.conn
            .execute("INSERT INTO lists (label) VALUES (?1);", [&input.label])?;
        let id = self.conn.last_insert_rowid();

        // created_at is a column default, so the stored row is the only source.
        self.get_list(id).map_err(|err| match err {
            RepoError::NotFound { .. } => {
                RepoError::InvalidData(format!("created list {id} missing on read-back"))
            }
            other => other,
        })
    }

    fn delete_list(&self, id: EntityId) -> RepoResult<()> {
        if let Err(err) = self
            .conn
            .execute("DELETE FROM positions WHERE list_id = ?1;", [id])
        {
            warn!(
                "event=list_delete module=repo status=error step=positions list_id={} error={}",
                id, err
            );
        }

        let changed = self.conn.execute("DELETE FROM lists WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::List, id));
        }
        Ok(())
    }
}

fn parse_list_row(row: &Row<'_>) -> rusqlite::Result<ShoppingList> {
    Ok(ShoppingList {
        id: row.get("id")?,
        label: row.get("label")?,
        created_at: row.get("created_at")?,
    })
}
