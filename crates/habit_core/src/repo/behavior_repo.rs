//! Behavior repository: session-scoped CRUD over the `behaviors` document.
//!
//! # Responsibility
//! - Own the full behavior collection (with embedded items) in the store.
//! - Expose the current owner's behaviors as an in-memory read view.
//!
//! # Invariants
//! - Each mutation reads the full collection, computes the next collection,
//!   writes it back whole, then refreshes the in-memory view from the result.
//! - A failed mutation leaves both the store and the in-memory view unchanged.
//! - Behaviors owned by another user are invisible: deletes are no-ops and
//!   item mutations report `BehaviorNotFound`.
//! - A stored document of the wrong shape is never overwritten; mutations
//!   fail with `Store(IncompatibleDocument)` instead.
//! - Not safe for concurrent writers: two interleaved read-modify-write
//!   cycles are last-writer-wins.

use crate::model::behavior::{Behavior, BehaviorColor, BehaviorId, ImprovementItem, ItemId};
use crate::model::user::{User, UserId};
use crate::model::validation::ValidationError;
use crate::repo::document::{load_collection, save_collection};
use crate::store::{KeyValueStore, StorageKey, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BehaviorResult<T> = Result<T, BehaviorError>;

/// Failure of a behavior repository operation.
#[derive(Debug)]
pub enum BehaviorError {
    Validation(ValidationError),
    BehaviorNotFound(BehaviorId),
    ItemNotFound {
        behavior_id: BehaviorId,
        item_id: ItemId,
    },
    /// Mutation attempted without a bound session.
    NotAuthenticated,
    Store(StoreError),
}

impl BehaviorError {
    /// True for both missing behaviors and missing items.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BehaviorNotFound(_) | Self::ItemNotFound { .. })
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::BehaviorNotFound(_) => "behavior_not_found",
            Self::ItemNotFound { .. } => "item_not_found",
            Self::NotAuthenticated => "not_authenticated",
            Self::Store(_) => "store_failed",
        }
    }
}

impl Display for BehaviorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::BehaviorNotFound(id) => write!(f, "behavior not found: {id}"),
            Self::ItemNotFound {
                behavior_id,
                item_id,
            } => write!(f, "item {item_id} not found in behavior {behavior_id}"),
            Self::NotAuthenticated => write!(f, "no user is signed in"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BehaviorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for BehaviorError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for BehaviorError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Behavior collection bound to at most one owning user.
pub struct BehaviorRepository<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
    owner: Option<UserId>,
    behaviors: Vec<Behavior>,
}

impl<'s, S: KeyValueStore + ?Sized> BehaviorRepository<'s, S> {
    /// Creates an unbound repository; `list` is empty until a session is bound.
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            owner: None,
            behaviors: Vec::new(),
        }
    }

    /// Rebinds the repository to `user` and reloads, or clears when `None`.
    pub fn bind_session(&mut self, user: Option<&User>) -> BehaviorResult<()> {
        match user {
            Some(user) => {
                self.owner = Some(user.id.clone());
                self.behaviors.clear();
                self.list()?;
            }
            None => {
                self.owner = None;
                self.behaviors.clear();
            }
        }
        Ok(())
    }

    /// Id of the bound owner, if any.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Last loaded view of the owner's behaviors, in storage order.
    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Looks up one of the owner's behaviors in the in-memory view.
    pub fn get(&self, behavior_id: &str) -> Option<&Behavior> {
        self.behaviors
            .iter()
            .find(|behavior| behavior.id == behavior_id)
    }

    /// Reloads the owner's behaviors from the store, in storage order.
    ///
    /// Returns an empty list when no session is bound.
    pub fn list(&mut self) -> BehaviorResult<Vec<Behavior>> {
        let Some(owner) = self.owner.clone() else {
            self.behaviors.clear();
            return Ok(Vec::new());
        };

        let all = self.load_all()?;
        self.behaviors = owned_by(&all, &owner);
        Ok(self.behaviors.clone())
    }

    /// Creates a behavior for the bound owner and appends it to the store.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` when `title` is blank.
    /// - `NotAuthenticated` when no session is bound.
    pub fn create(
        &mut self,
        title: &str,
        description: &str,
        color: BehaviorColor,
    ) -> BehaviorResult<Behavior> {
        let result = self.try_create(title, description, color);
        log_outcome("behavior_create", &result, |behavior| {
            format!("behavior_id={}", behavior.id)
        });
        result
    }

    fn try_create(
        &mut self,
        title: &str,
        description: &str,
        color: BehaviorColor,
    ) -> BehaviorResult<Behavior> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        let owner = self.require_owner()?;

        let behavior = Behavior::new(owner.clone(), title, description, color);
        let mut all = self.load_all()?;
        all.push(behavior.clone());
        self.commit(all, &owner)?;
        Ok(behavior)
    }

    /// Removes the owner's behavior with `behavior_id` and all its items.
    ///
    /// Unknown ids and behaviors owned by other users are a no-op.
    pub fn delete(&mut self, behavior_id: &str) -> BehaviorResult<()> {
        let result = self.try_delete(behavior_id);
        log_outcome("behavior_delete", &result, |removed| {
            format!("behavior_id={behavior_id} removed={removed}")
        });
        result.map(|_| ())
    }

    fn try_delete(&mut self, behavior_id: &str) -> BehaviorResult<bool> {
        let owner = self.require_owner()?;
        let mut all = self.load_all()?;
        let before = all.len();
        all.retain(|behavior| !(behavior.id == behavior_id && behavior.user_id == owner));
        let removed = all.len() != before;
        if removed {
            self.commit(all, &owner)?;
        } else {
            self.behaviors = owned_by(&all, &owner);
        }
        Ok(removed)
    }

    /// Appends a new incomplete item to the owner's behavior.
    ///
    /// # Errors
    /// - `Validation(EmptyItemText)` when `text` is blank.
    /// - `BehaviorNotFound` when the owner has no behavior with this id.
    pub fn add_item(&mut self, behavior_id: &str, text: &str) -> BehaviorResult<ImprovementItem> {
        let result = self.try_add_item(behavior_id, text);
        log_outcome("item_add", &result, |item| {
            format!("behavior_id={behavior_id} item_id={}", item.id)
        });
        result
    }

    fn try_add_item(&mut self, behavior_id: &str, text: &str) -> BehaviorResult<ImprovementItem> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyItemText.into());
        }
        let owner = self.require_owner()?;
        let mut all = self.load_all()?;
        let behavior = find_owned_mut(&mut all, behavior_id, &owner)?;

        let item = ImprovementItem::new(text);
        behavior.items.push(item.clone());
        self.commit(all, &owner)?;
        Ok(item)
    }

    /// Replaces an item's text and completion flag in one write.
    ///
    /// `id` and `created_at` are preserved.
    ///
    /// # Errors
    /// - `Validation(EmptyItemText)` when `text` is blank.
    /// - `BehaviorNotFound` / `ItemNotFound` when either id is unknown.
    pub fn update_item(
        &mut self,
        behavior_id: &str,
        item_id: &str,
        text: &str,
        completed: bool,
    ) -> BehaviorResult<()> {
        let result = self.try_update_item(behavior_id, item_id, text, completed);
        log_outcome("item_update", &result, |_| {
            format!("behavior_id={behavior_id} item_id={item_id} completed={completed}")
        });
        result
    }

    fn try_update_item(
        &mut self,
        behavior_id: &str,
        item_id: &str,
        text: &str,
        completed: bool,
    ) -> BehaviorResult<()> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyItemText.into());
        }
        let owner = self.require_owner()?;
        let mut all = self.load_all()?;
        let behavior = find_owned_mut(&mut all, behavior_id, &owner)?;
        let item = behavior
            .item_mut(item_id)
            .ok_or_else(|| BehaviorError::ItemNotFound {
                behavior_id: behavior_id.to_string(),
                item_id: item_id.to_string(),
            })?;

        item.text = text.to_string();
        item.completed = completed;
        self.commit(all, &owner)
    }

    /// Removes an item from the owner's behavior; absent ids are a no-op.
    pub fn delete_item(&mut self, behavior_id: &str, item_id: &str) -> BehaviorResult<()> {
        let result = self.try_delete_item(behavior_id, item_id);
        log_outcome("item_delete", &result, |removed| {
            format!("behavior_id={behavior_id} item_id={item_id} removed={removed}")
        });
        result.map(|_| ())
    }

    fn try_delete_item(&mut self, behavior_id: &str, item_id: &str) -> BehaviorResult<bool> {
        let owner = self.require_owner()?;
        let mut all = self.load_all()?;

        let removed = match all
            .iter_mut()
            .find(|behavior| behavior.id == behavior_id && behavior.user_id == owner)
        {
            Some(behavior) => {
                let before = behavior.items.len();
                behavior.items.retain(|item| item.id != item_id);
                behavior.items.len() != before
            }
            None => false,
        };

        if removed {
            self.commit(all, &owner)?;
        } else {
            self.behaviors = owned_by(&all, &owner);
        }
        Ok(removed)
    }

    fn require_owner(&self) -> BehaviorResult<UserId> {
        self.owner.clone().ok_or(BehaviorError::NotAuthenticated)
    }

    fn load_all(&self) -> BehaviorResult<Vec<Behavior>> {
        Ok(load_collection(self.store, StorageKey::BEHAVIORS)?)
    }

    fn commit(&mut self, all: Vec<Behavior>, owner: &str) -> BehaviorResult<()> {
        save_collection(self.store, StorageKey::BEHAVIORS, &all)?;
        self.behaviors = owned_by(&all, owner);
        Ok(())
    }
}

fn owned_by(all: &[Behavior], owner: &str) -> Vec<Behavior> {
    all.iter()
        .filter(|behavior| behavior.user_id == owner)
        .cloned()
        .collect()
}

fn find_owned_mut<'a>(
    all: &'a mut [Behavior],
    behavior_id: &str,
    owner: &str,
) -> BehaviorResult<&'a mut Behavior> {
    all.iter_mut()
        .find(|behavior| behavior.id == behavior_id && behavior.user_id == owner)
        .ok_or_else(|| BehaviorError::BehaviorNotFound(behavior_id.to_string()))
}

fn log_outcome<T>(
    event: &str,
    result: &BehaviorResult<T>,
    describe: impl FnOnce(&T) -> String,
) {
    match result {
        Ok(value) => info!(
            "event={event} module=repo status=ok {}",
            describe(value)
        ),
        Err(err) => error!(
            "event={event} module=repo status=error error_code={} error={}",
            err.code(),
            err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{BehaviorError, BehaviorRepository};
    use crate::model::behavior::BehaviorColor;
    use crate::model::user::User;
    use crate::model::validation::ValidationError;
    use crate::store::{KeyValueStore, MemoryStore, StorageKey};

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
        }
    }

    #[test]
    fn unbound_repository_lists_nothing_and_rejects_writes() {
        let store = MemoryStore::new();
        let mut repo = BehaviorRepository::new(&store);

        assert!(repo.list().unwrap().is_empty());
        let err = repo
            .create("Read", "", BehaviorColor::Blue)
            .unwrap_err();
        assert!(matches!(err, BehaviorError::NotAuthenticated));
        assert_eq!(store.get(StorageKey::BEHAVIORS).unwrap(), None);
    }

    #[test]
    fn validation_runs_before_session_check() {
        let store = MemoryStore::new();
        let mut repo = BehaviorRepository::new(&store);
        let err = repo.create("   ", "", BehaviorColor::Blue).unwrap_err();
        assert!(matches!(
            err,
            BehaviorError::Validation(ValidationError::EmptyTitle)
        ));
    }

    #[test]
    fn in_memory_view_tracks_mutations() {
        let store = MemoryStore::new();
        let mut repo = BehaviorRepository::new(&store);
        repo.bind_session(Some(&user("u1"))).unwrap();

        let behavior = repo.create("Sleep", "8h", BehaviorColor::Purple).unwrap();
        assert_eq!(repo.behaviors().len(), 1);
        assert_eq!(repo.get(&behavior.id), Some(&behavior));

        let item = repo.add_item(&behavior.id, "No screens").unwrap();
        assert_eq!(repo.get(&behavior.id).unwrap().items, vec![item]);

        repo.bind_session(None).unwrap();
        assert!(repo.behaviors().is_empty());
        assert_eq!(repo.owner(), None);
    }

    #[test]
    fn not_found_errors_are_classified() {
        let store = MemoryStore::new();
        let mut repo = BehaviorRepository::new(&store);
        repo.bind_session(Some(&user("u1"))).unwrap();

        let err = repo.add_item("missing", "text").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "behavior not found: missing");
    }
}
