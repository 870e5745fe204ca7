//! Route dispatcher: one resolved route to one repository call.
//!
//! # Invariants
//! - Dispatch is a pure function of route, body and repositories.
//! - Bodies are only decoded for routes that take one.

use crate::response::{ApiError, Reply};
use crate::router::Route;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use shoplist_core::{
    ArticleRepository, ListRepository, NewArticle, NewList, NewPosition, PositionPatch,
    PositionRepository, SqliteArticleRepository, SqliteListRepository, SqlitePositionRepository,
};

/// Repository set a request is dispatched against.
pub struct Repositories<'a> {
    pub articles: &'a dyn ArticleRepository,
    pub lists: &'a dyn ListRepository,
    pub positions: &'a dyn PositionRepository,
}

/// Executes `route` and returns the success reply or the failure kind.
pub fn dispatch(route: Route, body: &[u8], repos: &Repositories<'_>) -> Result<Reply, ApiError> {
    match route {
        Route::ListArticles => Reply::ok(&repos.articles.list_articles()?),
        Route::CreateArticle => {
            let input: NewArticle = decode_body(body)?;
            Reply::created(&repos.articles.create_article(&input)?)
        }
        Route::GetArticle(id) => Reply::ok(&repos.articles.get_article(id)?),
        Route::DeleteArticle(id) => {
            repos.articles.delete_article(id)?;
            Ok(Reply::no_content())
        }
        Route::ListLists => Reply::ok(&repos.lists.list_lists()?),
        Route::CreateList => {
            let input: NewList = decode_body(body)?;
            Reply::created(&repos.lists.create_list(&input)?)
        }
        Route::GetList(id) => Reply::ok(&repos.lists.get_list(id)?),
        Route::DeleteList(id) => {
            repos.lists.delete_list(id)?;
            Ok(Reply::no_content())
        }
        Route::ListPositions(list_id) => Reply::ok(&repos.positions.list_positions(list_id)?),
        Route::CreatePosition(list_id) => {
            let input: NewPosition = decode_body(body)?;
            Reply::created(&repos.positions.create_position(list_id, &input)?)
        }
        Route::GetPosition(id) => Reply::ok(&repos.positions.get_position(id)?),
        Route::UpdatePosition(id) => {
            let patch: PositionPatch = decode_body(body)?;
            Reply::ok(&repos.positions.update_position(id, &patch)?)
        }
        Route::DeletePosition(id) => {
            repos.positions.delete_position(id)?;
            Ok(Reply::no_content())
        }
    }
}

/// Dispatches against the SQLite repositories of one borrowed connection.
pub fn dispatch_sqlite(route: Route, body: &[u8], conn: &Connection) -> Result<Reply, ApiError> {
    let articles = SqliteArticleRepository::new(conn);
    let lists = SqliteListRepository::new(conn);
    let positions = SqlitePositionRepository::new(conn);
    let repos = Repositories {
        articles: &articles,
        lists: &lists,
        positions: &positions,
    };
    dispatch(route, body, &repos)
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::BadBody(err.to_string()))
}
