//! Two-party chats: shared handles, the registry that owns them, and the
//! per-user message service.

pub mod handle;
pub mod memory;
pub mod registry;
pub mod service;
