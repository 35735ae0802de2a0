use habit_core::{
    AuthError, AuthService, CredentialRecord, KeyValueStore, MemoryStore, StorageKey, User,
};

fn stored_credentials(store: &MemoryStore) -> Vec<CredentialRecord> {
    let raw = store.get(StorageKey::USERS).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn register_establishes_session_and_stores_credentials() {
    let store = MemoryStore::new();
    let mut auth = AuthService::new(&store);

    let user = auth.register("u", "a@x.com", "secret").unwrap();
    assert_eq!(user.username, "u");
    assert_eq!(user.email, "a@x.com");
    assert!(!user.id.is_empty());
    assert_eq!(auth.current_session(), Some(&user));

    let records = stored_credentials(&store);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, user.id);
    assert_eq!(records[0].password, "secret");
}

#[test]
fn duplicate_email_fails_and_preserves_first_record() {
    let store = MemoryStore::new();
    let mut auth = AuthService::new(&store);
    auth.register("first", "a@x.com", "secret").unwrap();
    let before = stored_credentials(&store);
    auth.logout();

    let err = auth.register("second", "a@x.com", "other-pass").unwrap_err();
    assert!(matches!(err, AuthError::DuplicateEmail));
    assert_eq!(stored_credentials(&store), before);
    assert!(auth.current_session().is_none());

    let err = auth.register("third", "a@x.com", "secret").unwrap_err();
    assert!(matches!(err, AuthError::DuplicateEmail));
}

#[test]
fn login_matches_email_and_password_exactly() {
    let store = MemoryStore::new();
    let mut auth = AuthService::new(&store);
    let registered = auth.register("u", "a@x.com", "secret").unwrap();
    auth.logout();

    let user = auth.login("a@x.com", "secret").unwrap();
    assert_eq!(user, registered);
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password").is_none());

    auth.logout();
    let err = auth.login("a@x.com", "wrong!").unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    let err = auth.login("b@x.com", "secret").unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(!auth.is_authenticated());
}

#[test]
fn failed_login_keeps_existing_session() {
    let store = MemoryStore::new();
    let mut auth = AuthService::new(&store);
    let user = auth.register("u", "a@x.com", "secret").unwrap();

    auth.login("a@x.com", "nope-nope").unwrap_err();
    assert_eq!(auth.current_session(), Some(&user));
}

#[test]
fn logout_is_repeatable_and_clears_persisted_session() {
    let store = MemoryStore::new();
    let mut auth = AuthService::new(&store);
    auth.register("u", "a@x.com", "secret").unwrap();
    assert!(store.get(StorageKey::SESSION_USER).unwrap().is_some());

    auth.logout();
    auth.logout();
    assert!(auth.current_session().is_none());
    assert!(store.get(StorageKey::SESSION_USER).unwrap().is_none());
}

#[test]
fn restore_session_picks_up_persisted_user() {
    let store = MemoryStore::new();
    let user = {
        let mut auth = AuthService::new(&store);
        auth.register("u", "a@x.com", "secret").unwrap()
    };

    let mut restarted = AuthService::new(&store);
    assert!(restarted.current_session().is_none());
    assert_eq!(restarted.restore_session(), Some(user.clone()));
    assert_eq!(restarted.current_session(), Some(&user));
}

#[test]
fn restore_session_treats_malformed_record_as_signed_out() {
    let store = MemoryStore::new();
    store.set(StorageKey::SESSION_USER, "{\"id\": ").unwrap();

    let mut auth = AuthService::new(&store);
    assert_eq!(auth.restore_session(), None);
    assert!(auth.current_session().is_none());
    assert!(store.get(StorageKey::SESSION_USER).unwrap().is_none());
}

#[test]
fn restore_session_without_record_is_none() {
    let store = MemoryStore::new();
    let mut auth = AuthService::new(&store);
    assert_eq!(auth.restore_session(), None);
}

#[test]
fn malformed_users_document_reads_as_empty() {
    let store = MemoryStore::new();
    store.set(StorageKey::USERS, "not json").unwrap();
    let mut auth = AuthService::new(&store);

    let err = auth.login("a@x.com", "secret").unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let user: User = auth.register("u", "a@x.com", "secret").unwrap();
    let records: Vec<CredentialRecord> =
        serde_json::from_str(&store.get(StorageKey::USERS).unwrap().unwrap()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].to_user(), user);
}

#[test]
fn login_accepts_legacy_timestamp_ids() {
    let store = MemoryStore::new();
    store
        .set(
            StorageKey::USERS,
            r#"[{"id":"1712345678901","username":"old","email":"old@x.com","password":"secret"}]"#,
        )
        .unwrap();
    let mut auth = AuthService::new(&store);

    let user = auth.login("old@x.com", "secret").unwrap();
    assert_eq!(user.id, "1712345678901");
}
