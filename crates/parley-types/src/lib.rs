//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley
//! direct-messaging core: Chat, Message, their identifiers, configuration,
//! and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
