//! Core domain logic for the habit tracker.
//! This crate is the single source of truth for session and behavior invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::behavior::{
    sort_items_for_display, top_behaviors, Behavior, BehaviorColor, BehaviorId, CompletionStats,
    ImprovementItem, ItemId, HOME_BEHAVIOR_LIMIT,
};
pub use model::user::{CredentialRecord, User, UserId};
pub use model::validation::ValidationError;
pub use repo::behavior_repo::{BehaviorError, BehaviorRepository, BehaviorResult};
pub use service::auth_service::{AuthError, AuthResult, AuthService};
pub use service::tracker::Tracker;
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StorageKey, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
