//! Message service bound to one logged-in user.
//!
//! `MessageService` performs every message-level operation (send, fetch with
//! read-marking, soft delete, unread counting) on behalf of `current_user_id`,
//! delegating chat lookup to a shared [`ChatRegistry`].
//!
//! Absent chats and messages are silent no-ops or empty results. The only
//! failure is [`ChatError::ChatNotFound`] from
//! [`MessageService::get_messages_or_fail`].

use std::sync::Arc;

use parley_types::chat::{Chat, Message, MessageId};
use parley_types::config::ParleyConfig;
use parley_types::error::ChatError;
use tracing::debug;

use crate::chat::handle::ChatHandle;
use crate::chat::registry::ChatRegistry;

/// Per-user view over a shared chat registry.
///
/// Holds no conversational state of its own: everything lives in the
/// registry, so several services (one per user) can share one `Arc<R>`.
pub struct MessageService<R: ChatRegistry> {
    registry: Arc<R>,
    current_user_id: String,
    config: ParleyConfig,
}

impl<R: ChatRegistry> MessageService<R> {
    /// Create a service for `current_user_id` with the default configuration.
    pub fn new(registry: Arc<R>, current_user_id: impl Into<String>) -> Self {
        Self::with_config(registry, current_user_id, ParleyConfig::default())
    }

    /// Create a service for `current_user_id` with an explicit configuration.
    pub fn with_config(
        registry: Arc<R>,
        current_user_id: impl Into<String>,
        config: ParleyConfig,
    ) -> Self {
        Self {
            registry,
            current_user_id: current_user_id.into(),
            config,
        }
    }

    pub fn current_user_id(&self) -> &str {
        &self.current_user_id
    }

    /// Access the shared registry.
    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    pub fn config(&self) -> &ParleyConfig {
        &self.config
    }

    fn append(&self, handle: &ChatHandle, text: String) -> Message {
        let message = Message::new(self.current_user_id.as_str(), text);
        handle.update(|chat| {
            debug!(
                chat_id = %chat.id,
                message_id = %message.id,
                sender = %self.current_user_id,
                "Message appended"
            );
            chat.messages.push(message.clone());
        });
        message
    }

    fn visible_chats(&self) -> Vec<ChatHandle> {
        self.registry.chats_for_user(&self.current_user_id)
    }

    // --- Sending ---

    /// Send `text` to `recipient_id`, creating the chat if needed.
    pub fn send_message(&self, recipient_id: &str, text: impl Into<String>) -> Message {
        let handle = self
            .registry
            .find_or_create_chat(&self.current_user_id, recipient_id);
        self.append(&handle, text.into())
    }

    /// Append `text` to an existing chat with `recipient_id`.
    ///
    /// Unlike [`send_message`](Self::send_message) this never creates a
    /// chat; returns `None` when there is none.
    pub fn create_message(&self, recipient_id: &str, text: impl Into<String>) -> Option<Message> {
        match self.registry.find_chat(&self.current_user_id, recipient_id) {
            Some(handle) => Some(self.append(&handle, text.into())),
            None => {
                debug!(
                    user_id = %self.current_user_id,
                    %recipient_id,
                    "No chat to append to, message dropped"
                );
                None
            }
        }
    }

    // --- Listing ---

    /// Non-deleted chats the current user takes part in.
    pub fn get_chats(&self) -> Vec<Chat> {
        self.visible_chats()
            .iter()
            .map(ChatHandle::snapshot)
            .collect()
    }

    /// Latest visible message text per chat, in [`get_chats`](Self::get_chats)
    /// order. Chats with no visible message report the configured placeholder.
    pub fn last_messages(&self) -> Vec<String> {
        self.visible_chats()
            .iter()
            .map(|handle| {
                handle.read(|chat| {
                    chat.last_message_text()
                        .unwrap_or(&self.config.no_messages_placeholder)
                        .to_string()
                })
            })
            .collect()
    }

    // --- Fetching ---

    /// Fetch the last `count` visible messages with `recipient_id`, or an
    /// empty list when no such chat exists.
    ///
    /// Returned messages sent by the other participant are marked read.
    pub fn get_messages_or_empty(&self, recipient_id: &str, count: usize) -> Vec<Message> {
        match self.registry.find_chat(&self.current_user_id, recipient_id) {
            Some(handle) => self.read_tail(&handle, count),
            None => {
                debug!(user_id = %self.current_user_id, %recipient_id, "No chat to fetch from");
                Vec::new()
            }
        }
    }

    /// Like [`get_messages_or_empty`](Self::get_messages_or_empty) but fails
    /// with [`ChatError::ChatNotFound`] when no chat with `recipient_id` exists.
    pub fn get_messages_or_fail(
        &self,
        recipient_id: &str,
        count: usize,
    ) -> Result<Vec<Message>, ChatError> {
        let handle = self
            .registry
            .find_chat(&self.current_user_id, recipient_id)
            .ok_or_else(|| ChatError::ChatNotFound {
                recipient_id: recipient_id.to_string(),
            })?;
        Ok(self.read_tail(&handle, count))
    }

    fn read_tail(&self, handle: &ChatHandle, count: usize) -> Vec<Message> {
        handle.update(|chat| {
            let visible: Vec<usize> = chat
                .messages
                .iter()
                .enumerate()
                .filter(|(_, m)| !m.is_deleted)
                .map(|(i, _)| i)
                .collect();
            let tail = &visible[visible.len().saturating_sub(count)..];

            let mut marked = 0usize;
            let fetched = tail
                .iter()
                .map(|&i| {
                    let message = &mut chat.messages[i];
                    if message.sender_id != self.current_user_id && !message.is_read {
                        message.is_read = true;
                        marked += 1;
                    }
                    message.clone()
                })
                .collect::<Vec<_>>();

            debug!(
                chat_id = %chat.id,
                user_id = %self.current_user_id,
                fetched = fetched.len(),
                marked_read = marked,
                "Messages fetched"
            );
            fetched
        })
    }

    // --- Deletion ---

    /// Soft-delete the message with `message_id`.
    ///
    /// Only chats returned by [`get_chats`](Self::get_chats) are searched, so
    /// a message inside a soft-deleted chat cannot be deleted by id.
    pub fn delete_message(&self, message_id: &MessageId) {
        for handle in self.visible_chats() {
            let found = handle.update(|chat| match chat.message_mut(message_id) {
                Some(message) => {
                    message.is_deleted = true;
                    true
                }
                None => false,
            });
            if found {
                debug!(%message_id, user_id = %self.current_user_id, "Message deleted");
                return;
            }
        }
        debug!(%message_id, user_id = %self.current_user_id, "No visible message to delete");
    }

    /// Soft-delete the chat with `recipient_id`, hiding it from listings.
    ///
    /// The chat stays reachable by participant pair: later sends and fetches
    /// keep operating on it.
    pub fn delete_chat(&self, recipient_id: &str) {
        match self.registry.find_chat(&self.current_user_id, recipient_id) {
            Some(handle) => handle.update(|chat| {
                chat.is_deleted = true;
                debug!(chat_id = %chat.id, user_id = %self.current_user_id, "Chat deleted");
            }),
            None => {
                debug!(user_id = %self.current_user_id, %recipient_id, "No chat to delete");
            }
        }
    }

    // --- Counters ---

    /// Number of visible chats holding at least one unread incoming message.
    pub fn unread_chats_count(&self) -> usize {
        self.visible_chats()
            .iter()
            .filter(|handle| handle.read(|chat| chat.has_unread_for(&self.current_user_id)))
            .count()
    }
}
