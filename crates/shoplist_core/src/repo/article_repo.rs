//! Article catalog repository.
//!
//! # Invariants
//! - Article names are unique; a duplicate insert is a `Conflict`, never an
//!   overwrite.
//! - Deleting an article never touches positions (names are copied by value).

use crate::model::article::{Article, NewArticle};
use crate::model::{EntityId, EntityKind};
use crate::repo::{is_unique_violation, RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension, Row};

/// Repository interface for the article catalog.
pub trait ArticleRepository {
    /// Lists all articles ordered by name.
    fn list_articles(&self) -> RepoResult<Vec<Article>>;
    fn get_article(&self, id: EntityId) -> RepoResult<Article>;
    fn create_article(&self, input: &NewArticle) -> RepoResult<Article>;
    fn delete_article(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn list_articles(&self) -> RepoResult<Vec<Article>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM articles ORDER BY name ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }
        Ok(articles)
    }

    fn get_article(&self, id: EntityId) -> RepoResult<Article> {
        self.conn
            .query_row(
                "SELECT id, name FROM articles WHERE id = ?1;",
                [id],
                parse_article_row,
            )
            .optional()?
            .ok_or_else(|| RepoError::not_found(EntityKind::Article, id))
    }

    fn create_article(&self, input: &NewArticle) -> RepoResult<Article> {
        input.validate()?;

        match self
            .conn
            .execute("INSERT INTO articles (name) VALUES (?1);", [&input.name])
        {
            Ok(_) => Ok(Article {
                id: self.conn.last_insert_rowid(),
                name: input.name.clone(),
            }),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict(format!(
                "article already exists: {}",
                input.name
            ))),
            Err(err) => Err(err.into()),
        }
    }

    fn delete_article(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM articles WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Article, id));
        }
        Ok(())
    }
}

fn parse_article_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
