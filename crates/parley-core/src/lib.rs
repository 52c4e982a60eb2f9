//! Business logic and registry trait definitions for Parley.
//!
//! This crate defines the `ChatRegistry` port, its in-process implementation,
//! and the `MessageService` that performs every message-level operation on
//! behalf of one user. It depends only on `parley-types` -- never on
//! `parley-infra` or any IO crate.

pub mod chat;
