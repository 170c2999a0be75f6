use organisa::auth::{AuthService, RegisterOutcome};
use organisa::kv::{self, KeyValueStore};

use crate::integration::support::open_store;

#[test]
fn register_twice_keeps_first_credential() {
    let dir = tempfile::TempDir::new().unwrap();
    let auth = AuthService::new(open_store(dir.path()));

    assert_eq!(auth.register("alice", "first").unwrap(), RegisterOutcome::Registered);
    assert_eq!(
        auth.register("alice", "second").unwrap(),
        RegisterOutcome::AlreadyExists
    );
    assert!(auth.credentials().authenticate("alice", "first").unwrap());
    assert!(!auth.credentials().authenticate("alice", "second").unwrap());
}

#[test]
fn login_requires_exact_match() {
    let dir = tempfile::TempDir::new().unwrap();
    let auth = AuthService::new(open_store(dir.path()));
    auth.register("alice", "secret").unwrap();

    assert!(auth.login("alice", "secret").unwrap().is_some());
    assert!(auth.login("alice", "Secret").unwrap().is_none());
    assert!(auth.login("bob", "secret").unwrap().is_none());
}

#[test]
fn session_is_restored_after_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    {
        let auth = AuthService::new(open_store(dir.path()));
        auth.register_and_login("alice", "pw").unwrap().unwrap();
    }

    let store = open_store(dir.path());
    assert_eq!(
        store.get(kv::CURRENT_USER_KEY).unwrap().as_deref(),
        Some("alice")
    );
    let auth = AuthService::new(store);
    let session = auth.current().unwrap().unwrap();
    assert_eq!(session.username(), "alice");

    auth.logout(session).unwrap();
    assert!(auth.current().unwrap().is_none());
}

#[test]
fn failed_login_keeps_existing_session() {
    let dir = tempfile::TempDir::new().unwrap();
    let auth = AuthService::new(open_store(dir.path()));
    auth.register_and_login("alice", "pw").unwrap();
    assert!(auth.login("alice", "wrong").unwrap().is_none());
    assert_eq!(auth.current().unwrap().unwrap().username(), "alice");
}
