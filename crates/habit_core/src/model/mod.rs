//! Domain model for users, behaviors and improvement items.
//!
//! # Responsibility
//! - Define the canonical records persisted under the `users`, `user` and
//!   `behaviors` storage keys.
//! - Provide pure projections used by views (completion, ordering, previews).
//!
//! # Invariants
//! - Serialized field names are camelCase to match the stored JSON documents.
//! - Public `User` values never carry a password.

pub mod behavior;
pub mod ids;
pub mod user;
pub mod validation;
