//! In-process `ChatRegistry` implementation.
//!
//! Chats are kept in creation order alongside an index keyed by the
//! canonical participant pair, so lookups are O(1) and find-or-create is
//! atomic under the registry's write lock.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use parley_types::chat::Chat;
use tracing::{debug, info};

use crate::chat::handle::ChatHandle;
use crate::chat::registry::ChatRegistry;

#[derive(Debug, Default)]
struct RegistryInner {
    /// Every chat ever created, in creation order.
    chats: Vec<ChatHandle>,
    /// `Chat::pair_key` -> chat.
    by_pair: HashMap<String, ChatHandle>,
}

/// Registry holding all chats in memory.
///
/// Owned by the caller and shared with services through `Arc`; there is no
/// process-wide instance. Lock order is always registry, then chat.
#[derive(Debug, Default)]
pub struct InMemoryChatRegistry {
    inner: RwLock<RegistryInner>,
}

impl InMemoryChatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Total number of chats, soft-deleted ones included.
    pub fn len(&self) -> usize {
        self.read().chats.len()
    }

    /// Whether no chat has been created yet.
    pub fn is_empty(&self) -> bool {
        self.read().chats.is_empty()
    }
}

impl ChatRegistry for InMemoryChatRegistry {
    fn find_or_create_chat(&self, user_a: &str, user_b: &str) -> ChatHandle {
        let key = Chat::pair_key(user_a, user_b);
        if let Some(existing) = self.read().by_pair.get(&key) {
            return existing.clone();
        }

        let mut inner = self.write();
        // Another caller may have created it between the two locks.
        if let Some(existing) = inner.by_pair.get(&key) {
            return existing.clone();
        }

        let chat = Chat::new(user_a, user_b);
        info!(chat_id = %chat.id, %user_a, %user_b, "Chat created");
        let handle = ChatHandle::new(chat);
        inner.chats.push(handle.clone());
        inner.by_pair.insert(key, handle.clone());
        handle
    }

    fn find_chat(&self, user_a: &str, user_b: &str) -> Option<ChatHandle> {
        self.read()
            .by_pair
            .get(&Chat::pair_key(user_a, user_b))
            .cloned()
    }

    fn chats_for_user(&self, user_id: &str) -> Vec<ChatHandle> {
        self.read()
            .chats
            .iter()
            .filter(|handle| handle.read(|chat| !chat.is_deleted && chat.involves(user_id)))
            .cloned()
            .collect()
    }

    fn clear(&self) {
        let mut inner = self.write();
        debug!(count = inner.chats.len(), "Clearing chat registry");
        inner.chats.clear();
        inner.by_pair.clear();
    }
}
