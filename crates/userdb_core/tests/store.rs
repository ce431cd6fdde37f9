//! End-to-end user operations against a file-backed store.

use tempfile::TempDir;
use userdb_core::{Store, StoreError, User, MAX_USERNAME_LEN};

fn open_temp() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("users.db")).unwrap();
    (dir, store)
}

fn names(store: &Store) -> Vec<(u64, String)> {
    store
        .users()
        .unwrap()
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect()
}

#[test]
fn create_list_and_rename() {
    let (_dir, store) = open_temp();

    let mut susy = User::new("susy");
    let mut john = User::new("john");
    assert_eq!(store.create_user(&mut susy).unwrap(), 1);
    assert_eq!(store.create_user(&mut john).unwrap(), 2);
    assert_eq!((susy.id, john.id), (1, 2));

    assert_eq!(
        names(&store),
        vec![(1, "susy".to_string()), (2, "john".to_string())]
    );

    store.set_username(2, "jimbo").unwrap();
    assert_eq!(
        store.user(2).unwrap(),
        Some(User {
            id: 2,
            username: "jimbo".into()
        })
    );
    assert_eq!(store.user(1).unwrap().unwrap().username, "susy");
}

#[test]
fn missing_user_reads_as_none() {
    let (_dir, store) = open_temp();
    assert_eq!(store.user(1).unwrap(), None);
    assert_eq!(store.user(0).unwrap(), None);
    assert!(store.users().unwrap().is_empty());
}

#[test]
fn rename_missing_user_is_not_found() {
    let (_dir, store) = open_temp();
    store.create_user(&mut User::new("susy")).unwrap();

    let err = store.set_username(99, "ghost").unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        StoreError::NotFound {
            collection: "Users",
            id: 99
        }
    ));
    assert_eq!(store.count_users().unwrap(), 1);
    assert_eq!(store.user(99).unwrap(), None);
}

#[test]
fn update_cannot_change_id() {
    let (_dir, store) = open_temp();
    store.create_user(&mut User::new("susy")).unwrap();

    let updated = store
        .update_user(1, |user| {
            user.id = 500;
            user.username = "sue".into();
        })
        .unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(store.user_ids().unwrap(), vec![1]);
    assert_eq!(store.user(1).unwrap().unwrap().username, "sue");
}

#[test]
fn delete_is_idempotent() {
    let (_dir, store) = open_temp();
    store.create_user(&mut User::new("susy")).unwrap();
    store.create_user(&mut User::new("john")).unwrap();

    store.delete_user(1).unwrap();
    store.delete_user(1).unwrap();
    store.delete_user(42).unwrap();

    assert_eq!(names(&store), vec![(2, "john".to_string())]);
}

#[test]
fn ids_are_never_reused() {
    let (_dir, store) = open_temp();
    for name in ["a", "b", "c"] {
        store.create_user(&mut User::new(name)).unwrap();
    }
    store.delete_user(3).unwrap();
    store.delete_user(2).unwrap();

    let mut d = User::new("d");
    assert_eq!(store.create_user(&mut d).unwrap(), 4);
    assert_eq!(store.user_ids().unwrap(), vec![1, 4]);
}

#[test]
fn incoming_id_is_ignored() {
    let (_dir, store) = open_temp();
    let mut user = User {
        id: 77,
        username: "susy".into(),
    };
    assert_eq!(store.create_user(&mut user).unwrap(), 1);
    assert_eq!(store.user(77).unwrap(), None);
}

#[test]
fn failed_create_rolls_back() {
    let (_dir, store) = open_temp();
    store.create_user(&mut User::new("susy")).unwrap();

    let mut too_long = User::new("x".repeat(MAX_USERNAME_LEN + 1));
    let err = store.create_user(&mut too_long).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Encode {
            collection: "Users",
            ..
        }
    ));
    assert_eq!(too_long.id, 0);
    assert_eq!(names(&store), vec![(1, "susy".to_string())]);
    assert_eq!(store.snapshot().unwrap().sequence::<User>().unwrap(), 1);

    let mut john = User::new("john");
    assert_eq!(store.create_user(&mut john).unwrap(), 2);
}

#[test]
fn failed_rename_keeps_old_value() {
    let (_dir, store) = open_temp();
    store.create_user(&mut User::new("susy")).unwrap();

    let err = store
        .set_username(1, "x".repeat(MAX_USERNAME_LEN + 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::Encode { .. }));
    assert_eq!(store.user(1).unwrap().unwrap().username, "susy");
}

#[test]
fn reverse_listing_and_pages() {
    let (_dir, store) = open_temp();
    for name in ["a", "b", "c", "d", "e"] {
        store.create_user(&mut User::new(name)).unwrap();
    }
    store.delete_user(3).unwrap();

    let rev: Vec<_> = store.users_rev().unwrap().into_iter().map(|u| u.id).collect();
    assert_eq!(rev, vec![5, 4, 2, 1]);

    let page: Vec<_> = store
        .users_after(0, 2)
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(page, vec![1, 2]);

    let page: Vec<_> = store
        .users_after(2, 2)
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(page, vec![4, 5]);

    assert!(store.users_after(5, 10).unwrap().is_empty());
    assert!(store.users_after(u64::MAX, 10).unwrap().is_empty());
    assert!(store.users_after(0, 0).unwrap().is_empty());
    assert_eq!(store.count_users().unwrap(), 4);
}

#[test]
fn collection_handle_matches_store_methods() {
    let (_dir, store) = open_temp();
    let users = store.collection::<User>();
    assert_eq!(users.name(), "Users");

    let mut susy = User::new("susy");
    let id = users.create(&mut susy).unwrap();
    assert_eq!(store.user(id).unwrap(), Some(susy.clone()));

    users.update(id, |u| u.username = "sue".into()).unwrap();
    assert_eq!(users.get(id).unwrap().unwrap().username, "sue");
    assert_eq!(users.list().unwrap(), store.users().unwrap());
    assert_eq!(users.count().unwrap(), 1);

    users.delete(id).unwrap();
    assert!(users.ids().unwrap().is_empty());
}

#[test]
fn unicode_usernames_survive() {
    let (_dir, store) = open_temp();
    let mut user = User::new("Zoë 🚀 ユーザー");
    let id = store.create_user(&mut user).unwrap();
    assert_eq!(store.user(id).unwrap().unwrap().username, "Zoë 🚀 ユーザー");

    let mut empty = User::new("");
    let id = store.create_user(&mut empty).unwrap();
    assert_eq!(store.user(id).unwrap().unwrap().username, "");
}
