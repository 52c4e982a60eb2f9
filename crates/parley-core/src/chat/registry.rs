//! ChatRegistry trait definition.
//!
//! The registry exclusively owns every chat for the lifetime of the process
//! (or until `clear`). Lookups are keyed on the unordered participant pair,
//! so `(a, b)` and `(b, a)` always resolve to the same chat.

use crate::chat::handle::ChatHandle;

/// Registry of all two-party chats.
///
/// All operations are total: an absent chat is reported as `None` or an
/// empty list, never as an error. Implementations must be safe to share
/// across threads (`Arc<R>`) and must never create two chats for one pair.
pub trait ChatRegistry: Send + Sync {
    /// Return the chat between `user_a` and `user_b`, creating it with
    /// `(user_id1 = user_a, user_id2 = user_b)` when none exists.
    fn find_or_create_chat(&self, user_a: &str, user_b: &str) -> ChatHandle;

    /// Return the chat between `user_a` and `user_b`, if any. Soft-deleted
    /// chats are still returned.
    fn find_chat(&self, user_a: &str, user_b: &str) -> Option<ChatHandle>;

    /// Non-deleted chats that `user_id` participates in, in creation order.
    fn chats_for_user(&self, user_id: &str) -> Vec<ChatHandle>;

    /// Drop every chat. Used to isolate independent sessions.
    fn clear(&self);
}
