use shoplist_core::db::open_db_in_memory;
use shoplist_core::{
    EntityKind, ListRepository, NewList, NewPosition, PositionRepository, RepoError,
    SqliteListRepository, SqlitePositionRepository, ValidationError,
};
use std::collections::HashSet;

#[test]
fn create_assigns_id_and_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);

    let created = repo.create_list(&NewList::new("Weekend")).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.label, "Weekend");
    assert!(created.created_at.ends_with('Z'));
    assert_eq!(repo.get_list(created.id).unwrap(), created);
}

#[test]
fn ids_are_unique_and_timestamps_non_decreasing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);

    let created: Vec<_> = (0..5)
        .map(|idx| repo.create_list(&NewList::new(format!("list {idx}"))).unwrap())
        .collect();

    let ids: HashSet<_> = created.iter().map(|list| list.id).collect();
    assert_eq!(ids.len(), created.len());
    assert!(created.iter().all(|list| list.id > 0));
    for pair in created.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
}

#[test]
fn list_returns_most_recent_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);
    let older = repo.create_list(&NewList::new("older")).unwrap();
    let newer = repo.create_list(&NewList::new("newer")).unwrap();

    conn.execute(
        "UPDATE lists SET created_at = '2024-01-01T00:00:00.000Z' WHERE id = ?1;",
        [older.id],
    )
    .unwrap();

    let ids: Vec<_> = repo.list_lists().unwrap().into_iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[test]
fn empty_label_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);

    let err = repo.create_list(&NewList::new("")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyListLabel)
    ));
}

#[test]
fn legacy_label_key_is_accepted() {
    let input: NewList = serde_json::from_str(r#"{"bezeichnung":"Wocheneinkauf"}"#).unwrap();
    assert_eq!(input.label, "Wocheneinkauf");
}

#[test]
fn delete_removes_all_positions_of_the_list() {
    let conn = open_db_in_memory().unwrap();
    let lists = SqliteListRepository::new(&conn);
    let positions = SqlitePositionRepository::new(&conn);

    let doomed = lists.create_list(&NewList::new("doomed")).unwrap();
    let kept = lists.create_list(&NewList::new("kept")).unwrap();
    let doomed_ids: Vec<_> = ["Milk", "Eggs", "Bread"]
        .into_iter()
        .map(|name| {
            positions
                .create_position(doomed.id, &NewPosition::new(name))
                .unwrap()
                .id
        })
        .collect();
    let survivor = positions
        .create_position(kept.id, &NewPosition::new("Salt"))
        .unwrap();

    lists.delete_list(doomed.id).unwrap();

    for id in doomed_ids {
        assert!(matches!(
            positions.get_position(id).unwrap_err(),
            RepoError::NotFound {
                kind: EntityKind::Position,
                ..
            }
        ));
    }
    assert!(positions.list_positions(doomed.id).unwrap().is_empty());
    assert_eq!(positions.get_position(survivor.id).unwrap(), survivor);
    assert!(matches!(
        lists.get_list(doomed.id).unwrap_err(),
        RepoError::NotFound {
            kind: EntityKind::List,
            ..
        }
    ));
}

#[test]
fn delete_of_unknown_list_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);

    let err = repo.delete_list(77).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::List,
            id: 77
        }
    ));
}
