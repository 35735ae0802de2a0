//! Application facade tying the session to the behavior repository.
//!
//! # Invariants
//! - After every session transition the repository is bound to the current
//!   session user, or unbound when signed out.

use crate::model::user::User;
use crate::repo::behavior_repo::{BehaviorRepository, BehaviorResult};
use crate::service::auth_service::{AuthResult, AuthService};
use crate::store::KeyValueStore;
use log::error;

/// Auth service plus behavior repository over one shared store.
pub struct Tracker<'s, S: KeyValueStore + ?Sized> {
    auth: AuthService<'s, S>,
    behaviors: BehaviorRepository<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> Tracker<'s, S> {
    /// Builds a signed-out tracker without touching the store.
    pub fn new(store: &'s S) -> Self {
        Self {
            auth: AuthService::new(store),
            behaviors: BehaviorRepository::new(store),
        }
    }

    /// Builds a tracker and restores any persisted session.
    pub fn start(store: &'s S) -> BehaviorResult<Self> {
        let mut tracker = Self::new(store);
        tracker.auth.restore_session();
        tracker.rebind()?;
        Ok(tracker)
    }

    pub fn auth(&self) -> &AuthService<'s, S> {
        &self.auth
    }

    pub fn behaviors(&self) -> &BehaviorRepository<'s, S> {
        &self.behaviors
    }

    /// Mutable access to the session-scoped behavior repository.
    pub fn behaviors_mut(&mut self) -> &mut BehaviorRepository<'s, S> {
        &mut self.behaviors
    }

    pub fn current_user(&self) -> Option<&User> {
        self.auth.current_session()
    }

    pub fn register(&mut self, username: &str, email: &str, password: &str) -> AuthResult<User> {
        let user = self.auth.register(username, email, password)?;
        self.rebind_after_auth();
        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<User> {
        let user = self.auth.login(email, password)?;
        self.rebind_after_auth();
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.auth.logout();
        self.rebind_after_auth();
    }

    fn rebind(&mut self) -> BehaviorResult<()> {
        self.behaviors.bind_session(self.auth.current_session())
    }

    // Sign-in already succeeded; a failed reload leaves an empty view that the
    // next `list` call refreshes.
    fn rebind_after_auth(&mut self) {
        if let Err(err) = self.rebind() {
            error!(
                "event=behavior_reload module=tracker status=error error_code=reload_failed error={}",
                err
            );
        }
    }
}
