mod common;

use std::{fs, sync::Arc};

use common::user;
use smm::{
    models::AccountType,
    session::Session,
    store::{FileStore, KeyValueStore, MemoryStore, TOKEN_KEY, USER_KEY},
};
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn test_file_store_survives_reopen() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("nested").join("store.json");

    let store = FileStore::open(&path).unwrap();
    store.set("twitter_code_verifier", "abc").unwrap();
    store.set("token", "t0k3n").unwrap();
    store.remove("token").unwrap();
    drop(store);

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("twitter_code_verifier").unwrap().as_deref(), Some("abc"));
    assert_eq!(reopened.get("token").unwrap(), None);
}

#[test]
fn test_file_store_rejects_corrupt_file() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("store.json");
    fs::write(&path, "not json").unwrap();

    assert!(FileStore::open(&path).is_err());
}

#[test]
fn test_file_store_treats_empty_file_as_empty() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("store.json");
    fs::write(&path, "").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get("token").unwrap(), None);
}

#[test]
fn test_session_persists_across_instances() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("store.json");

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).unwrap());
        let session = Session::new(store);
        session
            .start("abc", &user(1, "alice", AccountType::Admin))
            .unwrap();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).unwrap());
    let session = Session::new(store);
    assert!(session.is_logged_in());
    assert_eq!(session.token().as_deref(), Some("abc"));
    assert_eq!(
        session.current_user().map(|u| u.account_type),
        Some(AccountType::Admin)
    );
}

#[test]
fn test_unreadable_cached_user_is_ignored() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "abc").unwrap();
    store.set(USER_KEY, "{ broken").unwrap();

    let session = Session::new(store);

    assert!(session.is_logged_in());
    assert_eq!(session.current_user(), None);
}

#[test]
fn test_empty_token_is_logged_out() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "").unwrap();

    assert!(!Session::new(store).is_logged_in());
}

#[tokio::test]
async fn test_subscribers_see_login_update_and_logout() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let session = Session::new(store);
    let mut rx = session.subscribe();
    assert_eq!(*rx.borrow(), None);

    session
        .start("abc", &user(1, "alice", AccountType::Individual))
        .unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().map(|u| u.id), Some(1));

    let mut promoted = user(1, "alice", AccountType::Business);
    promoted.email = "alice@corp.example".to_string();
    session.update_user(&promoted).unwrap();
    rx.changed().await.unwrap();
    assert_eq!(
        rx.borrow_and_update().as_ref().map(|u| u.account_type),
        Some(AccountType::Business)
    );

    session.clear().unwrap();
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), None);
    assert!(!session.is_logged_in());
}
