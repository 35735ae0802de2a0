//! Use-case services consumed by view code.
//!
//! # Responsibility
//! - Expose auth and session-scoped behavior operations as plain methods.
//! - Keep view code decoupled from store and document details.

pub mod auth_service;
pub mod tracker;
