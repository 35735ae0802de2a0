//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Decode/encode whole JSON documents stored under fixed keys.
//! - Own the behavior collection and its session-scoped view.
//!
//! # Invariants
//! - Every mutation is read-modify-write of the full document.
//! - Unparsable stored documents read as empty, never as errors.

pub mod behavior_repo;
pub mod document;
