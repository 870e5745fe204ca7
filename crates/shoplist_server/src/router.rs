//! Path router: method + path to exactly one repository operation.
//!
//! # Responsibility
//! - Match path segments against the resource patterns in one place.
//! - Parse item ids and reject malformed ones before any method check.
//!
//! # Invariants
//! - `/lists/{id}/positions` is matched before `/lists/{id}`, so the list
//!   item route never swallows nested requests. Segments after `positions`
//!   are ignored.
//! - Item paths accept one trailing slash.
//! - Ids are strictly positive; `0` is malformed, never "absent".
//! - A recognized path with an unsupported method is `MethodNotAllowed`.

use shoplist_core::EntityId;
use tiny_http::Method;

/// Resource addressed by a path, before the method is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    ArticleCollection,
    ArticleItem(EntityId),
    ListCollection,
    ListItem(EntityId),
    ListPositions(EntityId),
    PositionItem(EntityId),
}

/// One concrete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListArticles,
    CreateArticle,
    GetArticle(EntityId),
    DeleteArticle(EntityId),
    ListLists,
    CreateList,
    GetList(EntityId),
    DeleteList(EntityId),
    ListPositions(EntityId),
    CreatePosition(EntityId),
    GetPosition(EntityId),
    UpdatePosition(EntityId),
    DeletePosition(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    NoMatch,
    MalformedId,
    MalformedUrl,
    MethodNotAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Articles,
    Lists,
    Positions,
}

fn collection(segment: &str) -> Option<Collection> {
    match segment {
        "articles" | "artikel" => Some(Collection::Articles),
        "lists" | "listen" => Some(Collection::Lists),
        "positions" | "positionen" => Some(Collection::Positions),
        _ => None,
    }
}

/// Parses an item id segment. Empty, non-numeric, zero and negative
/// segments are rejected.
pub fn parse_id(segment: &str) -> Option<EntityId> {
    segment.parse::<EntityId>().ok().filter(|id| *id > 0)
}

fn item_id(segment: &str) -> Result<EntityId, RouteError> {
    parse_id(segment).ok_or(RouteError::MalformedId)
}

/// Splits the path part of a request URL into segments.
///
/// Only the leading separator is dropped, so `/articles/` yields an empty
/// id segment rather than the collection, and `/articles/5/` yields a
/// trailing empty segment after the id.
pub fn path_segments(url: &str) -> Vec<&str> {
    let path = url.split(['?', '#']).next().unwrap_or("");
    path.trim_start_matches('/').split('/').collect()
}

/// Resolves the resource a path addresses.
pub fn match_target(segments: &[&str]) -> Result<Target, RouteError> {
    let (head, rest) = match segments.split_first() {
        Some((head, rest)) => (collection(head).ok_or(RouteError::NoMatch)?, rest),
        None => return Err(RouteError::NoMatch),
    };

    match (head, rest) {
        (Collection::Lists, [id, child, ..])
            if collection(child) == Some(Collection::Positions) =>
        {
            Ok(Target::ListPositions(item_id(id)?))
        }
        // The list id is missing in front of the child collection.
        (Collection::Lists, [child] | [child, ""])
            if collection(child) == Some(Collection::Positions) =>
        {
            Err(RouteError::MalformedUrl)
        }
        (Collection::Articles, []) => Ok(Target::ArticleCollection),
        (Collection::Lists, []) => Ok(Target::ListCollection),
        (Collection::Articles, [id] | [id, ""]) => Ok(Target::ArticleItem(item_id(id)?)),
        (Collection::Lists, [id] | [id, ""]) => Ok(Target::ListItem(item_id(id)?)),
        (Collection::Positions, [id] | [id, ""]) => Ok(Target::PositionItem(item_id(id)?)),
        _ => Err(RouteError::NoMatch),
    }
}

/// Picks the operation for `method` on `target`.
pub fn route_for(target: Target, method: &Method) -> Result<Route, RouteError> {
    let route = match (target, method) {
        (Target::ArticleCollection, Method::Get) => Route::ListArticles,
        (Target::ArticleCollection, Method::Post) => Route::CreateArticle,
        (Target::ArticleItem(id), Method::Get) => Route::GetArticle(id),
        (Target::ArticleItem(id), Method::Delete) => Route::DeleteArticle(id),
        (Target::ListCollection, Method::Get) => Route::ListLists,
        (Target::ListCollection, Method::Post) => Route::CreateList,
        (Target::ListItem(id), Method::Get) => Route::GetList(id),
        (Target::ListItem(id), Method::Delete) => Route::DeleteList(id),
        (Target::ListPositions(id), Method::Get) => Route::ListPositions(id),
        (Target::ListPositions(id), Method::Post) => Route::CreatePosition(id),
        (Target::PositionItem(id), Method::Get) => Route::GetPosition(id),
        (Target::PositionItem(id), Method::Patch | Method::Put) => Route::UpdatePosition(id),
        (Target::PositionItem(id), Method::Delete) => Route::DeletePosition(id),
        _ => return Err(RouteError::MethodNotAllowed),
    };
    Ok(route)
}

/// Resolves a request line to one operation.
pub fn resolve(method: &Method, url: &str) -> Result<Route, RouteError> {
    let target = match_target(&path_segments(url))?;
    route_for(target, method)
}
