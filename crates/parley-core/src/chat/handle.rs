//! Shared, lockable reference to a single chat.
//!
//! The registry hands out `ChatHandle`s instead of copies so that every
//! service observes and mutates the same chat. Each handle wraps the chat in
//! its own `Mutex`: appends, flag flips, and the scans that read those flags
//! all go through the same guard.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parley_types::chat::{Chat, ChatId};

/// Cloning produces another reference to the same chat (backed by `Arc<Mutex<...>>`).
#[derive(Debug, Clone)]
pub struct ChatHandle {
    inner: Arc<Mutex<Chat>>,
}

impl ChatHandle {
    /// Wrap a freshly created chat.
    pub fn new(chat: Chat) -> Self {
        Self {
            inner: Arc::new(Mutex::new(chat)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Chat> {
        // A panic inside a closure leaves plain data behind; keep serving it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the chat while holding its guard.
    pub fn read<T>(&self, f: impl FnOnce(&Chat) -> T) -> T {
        f(&*self.lock())
    }

    /// Run `f` against the chat mutably while holding its guard.
    pub fn update<T>(&self, f: impl FnOnce(&mut Chat) -> T) -> T {
        f(&mut *self.lock())
    }

    /// Owned copy of the chat as it is right now.
    pub fn snapshot(&self) -> Chat {
        self.read(Chat::clone)
    }

    pub fn id(&self) -> ChatId {
        self.read(|chat| chat.id)
    }

    /// Whether both handles point at the same chat.
    pub fn same_chat(&self, other: &ChatHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
