//! Typed JSON document access on top of `KeyValueStore`.

use crate::store::{KeyValueStore, StoreError, StoreResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads a JSON array stored under `key`.
///
/// Missing keys and unparsable text both yield an empty collection.
pub fn load_collection<S, T>(store: &S, key: &str) -> StoreResult<Vec<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    Ok(load_document(store, key)?.unwrap_or_default())
}

/// Overwrites `key` with the JSON encoding of `items`.
pub fn save_collection<S, T>(store: &S, key: &str, items: &[T]) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    save_document(store, key, items)
}

/// Loads a single JSON value stored under `key`.
///
/// Returns `None` when the key is absent or its value is not JSON at all.
///
/// # Errors
/// - `IncompatibleDocument` when the value is JSON of the wrong shape; it may
///   still hold other users' records, so callers must not overwrite it.
pub fn load_document<S, T>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_data() => {
            warn!(
                "event=document_load module=repo status=error key={} error_code=incompatible_document error={}",
                key, err
            );
            Err(StoreError::IncompatibleDocument {
                key: key.to_string(),
                source: err,
            })
        }
        Err(err) => {
            warn!(
                "event=document_load module=repo status=degraded key={} error_code=malformed_document error={}",
                key, err
            );
            Ok(None)
        }
    }
}

/// Overwrites `key` with the JSON encoding of `value`.
pub fn save_document<S, T>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(StoreError::Encode)?;
    store.set(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::{load_collection, load_document, save_collection};
    use crate::model::user::User;
    use crate::store::{KeyValueStore, MemoryStore, StoreError};

    #[test]
    fn missing_key_loads_empty_collection() {
        let store = MemoryStore::new();
        let users: Vec<User> = load_collection(&store, "users").unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn unparsable_json_loads_as_empty() {
        let store = MemoryStore::new();
        store.set("users", "[{not json").unwrap();
        let users: Vec<User> = load_collection(&store, "users").unwrap();
        assert!(users.is_empty());

        store.set("user", "{\"id\":").unwrap();
        let session: Option<User> = load_document(&store, "user").unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn wrong_shape_json_is_an_error() {
        let store = MemoryStore::new();
        store.set("users", r#"[{"id":1}]"#).unwrap();
        let err = load_collection::<_, User>(&store, "users").unwrap_err();
        assert!(matches!(
            err,
            StoreError::IncompatibleDocument { ref key, .. } if key == "users"
        ));
    }

    #[test]
    fn saved_collection_is_a_json_array() {
        let store = MemoryStore::new();
        let user = User {
            id: "1".to_string(),
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
        };
        save_collection(&store, "users", &[user.clone()]).unwrap();

        let raw = store.get("users").unwrap().unwrap();
        assert!(raw.starts_with('['));
        let loaded: Vec<User> = load_collection(&store, "users").unwrap();
        assert_eq!(loaded, vec![user]);
    }
}
