//! List position repository.
//!
//! # Responsibility
//! - Provide position CRUD scoped to an owning list.
//! - Apply partial updates through parameterized `UPDATE` statements.
//!
//! # Invariants
//! - Positions of one list are ordered open first, then done, each by id.
//! - New positions always start with `done = false`.
//! - Updated and created rows are re-read from storage before returning.
//! - Read paths reject invalid persisted `done` values instead of masking them.

use crate::model::position::{NewPosition, Position};
use crate::model::{EntityId, EntityKind};
use crate::patch::{set_clause, PatchValue, PositionPatch};
use crate::repo::{bool_to_int, is_foreign_key_violation, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const POSITION_SELECT_SQL: &str = "SELECT
    id,
    list_id,
    article_name,
    note,
    done
FROM positions";

/// Repository interface for list positions.
pub trait PositionRepository {
    /// Lists positions of one list; an unknown list yields an empty vector.
    fn list_positions(&self, list_id: EntityId) -> RepoResult<Vec<Position>>;
    fn get_position(&self, id: EntityId) -> RepoResult<Position>;
    /// Creates a position under `list_id`; `NotFound(List)` if it is unknown.
    fn create_position(&self, list_id: EntityId, input: &NewPosition) -> RepoResult<Position>;
    /// Applies only the eligible fields of `patch` and returns the stored row.
    fn update_position(&self, id: EntityId, patch: &PositionPatch) -> RepoResult<Position>;
    fn delete_position(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed position repository.
pub struct SqlitePositionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePositionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn read_back(&self, id: EntityId, action: &str) -> RepoResult<Position> {
        self.get_position(id).map_err(|err| match err {
            RepoError::NotFound { .. } => {
                RepoError::InvalidData(format!("{action} position {id} missing on read-back"))
            }
            other => other,
        })
    }
}

impl PositionRepository for SqlitePositionRepository<'_> {
    fn list_positions(&self, list_id: EntityId) -> RepoResult<Vec<Position>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POSITION_SELECT_SQL}
             WHERE list_id = ?1
             ORDER BY done ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([list_id])?;
        let mut positions = Vec::new();
        while let Some(row) = rows.next()? {
            positions.push(parse_position_row(row)?);
        }
        Ok(positions)
    }

    fn get_position(&self, id: EntityId) -> RepoResult<Position> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POSITION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_position_row(row);
        }
        Err(RepoError::not_found(EntityKind::Position, id))
    }

    fn create_position(&self, list_id: EntityId, input: &NewPosition) -> RepoResult<Position> {
        input.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO positions (list_id, article_name, note, done)
             VALUES (?1, ?2, ?3, 0);",
            params![list_id, input.article_name.as_str(), input.note_or_default()],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(RepoError::not_found(EntityKind::List, list_id));
            }
            Err(err) => return Err(err.into()),
        }

        self.read_back(self.conn.last_insert_rowid(), "created")
    }

    fn update_position(&self, id: EntityId, patch: &PositionPatch) -> RepoResult<Position> {
        let assignments = patch.resolve()?;
        let (clause, id_slot) = set_clause(&assignments);

        let mut bind_values: Vec<Value> = assignments
            .into_iter()
            .map(|assignment| match assignment.value {
                PatchValue::Text(text) => Value::Text(text),
                PatchValue::Flag(flag) => Value::Integer(bool_to_int(flag)),
            })
            .collect();
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(
            &format!("UPDATE positions SET {clause} WHERE id = ?{id_slot};"),
            params_from_iter(bind_values),
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Position, id));
        }

        self.read_back(id, "updated")
    }

    fn delete_position(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM positions WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Position, id));
        }
        Ok(())
    }
}

fn parse_position_row(row: &Row<'_>) -> RepoResult<Position> {
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other}` in positions.done"
            )));
        }
    };

    Ok(Position {
        id: row.get("id")?,
        list_id: row.get("list_id")?,
        article_name: row.get("article_name")?,
        note: row.get("note")?,
        done,
    })
}
