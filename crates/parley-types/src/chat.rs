//! Chat and message types for Parley.
//!
//! These types model two-party direct-message conversations: a `Chat` holds
//! an unordered participant pair and an append-only sequence of `Message`s.
//! Both carry a soft-delete marker; messages additionally track read state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

/// Separator used when building the canonical key of a participant pair.
///
/// ASCII unit separator: never expected inside a user identifier.
const PAIR_KEY_SEPARATOR: char = '\u{1f}';

/// Last timestamp handed out by [`next_timestamp`], in microseconds.
static LAST_STAMP_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Return a creation instant that is strictly later than every previous one
/// issued in this process.
///
/// Follows the wall clock when it moves forward; when it stalls or steps
/// backwards the stamp advances by one microsecond instead.
pub fn next_timestamp() -> DateTime<Utc> {
    let now = Utc::now().timestamp_micros();
    let (Ok(prev) | Err(prev)) =
        LAST_STAMP_MICROS.fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last.saturating_add(1)))
        });
    let stamp = now.max(prev.saturating_add(1));
    DateTime::from_timestamp_micros(stamp).unwrap_or_else(Utc::now)
}

/// Unique identifier for a chat, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub Uuid);

impl ChatId {
    /// Create a new ChatId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ChatId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a message, wrapping a UUID v7.
///
/// Never derived from message content: two identical texts get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Create a new MessageId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A single message within a chat.
///
/// `is_read` and `is_deleted` are the only fields that change after creation.
/// Messages are never physically removed; deletion only sets `is_deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Message {
    /// Create an unread, non-deleted message with a fresh id and timestamp.
    pub fn new(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender_id: sender_id.into(),
            text: text.into(),
            created_at: next_timestamp(),
            is_read: false,
            is_deleted: false,
        }
    }

    /// True when the message still counts as unread for `user_id`:
    /// not deleted, not yet read, and sent by someone else.
    pub fn is_unread_for(&self, user_id: &str) -> bool {
        !self.is_deleted && !self.is_read && self.sender_id != user_id
    }
}

/// A two-party conversation.
///
/// The participant pair is unordered: `(a, b)` and `(b, a)` name the same chat.
/// `messages` is append-only and kept in conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub user_id1: String,
    pub user_id2: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Chat {
    /// Create an empty, visible chat between two participants.
    pub fn new(user_id1: impl Into<String>, user_id2: impl Into<String>) -> Self {
        Self {
            id: ChatId::new(),
            user_id1: user_id1.into(),
            user_id2: user_id2.into(),
            messages: Vec::new(),
            is_deleted: false,
        }
    }

    /// Canonical key for an unordered participant pair.
    ///
    /// Identifiers are sorted lexicographically, so `pair_key(a, b) == pair_key(b, a)`.
    pub fn pair_key(user_a: &str, user_b: &str) -> String {
        let (first, second) = if user_a <= user_b {
            (user_a, user_b)
        } else {
            (user_b, user_a)
        };
        format!("{first}{PAIR_KEY_SEPARATOR}{second}")
    }

    /// Whether this chat is between `user_a` and `user_b`, in either order.
    pub fn has_participants(&self, user_a: &str, user_b: &str) -> bool {
        (self.user_id1 == user_a && self.user_id2 == user_b)
            || (self.user_id1 == user_b && self.user_id2 == user_a)
    }

    /// Whether `user_id` is one of the two participants.
    pub fn involves(&self, user_id: &str) -> bool {
        self.user_id1 == user_id || self.user_id2 == user_id
    }

    /// The other participant, or `None` if `user_id` is not in this chat.
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.user_id1 == user_id {
            Some(&self.user_id2)
        } else if self.user_id2 == user_id {
            Some(&self.user_id1)
        } else {
            None
        }
    }

    /// Non-deleted messages in conversation order.
    pub fn visible_messages(&self) -> impl DoubleEndedIterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_deleted)
    }

    /// Text of the most recent non-deleted message.
    pub fn last_message_text(&self) -> Option<&str> {
        self.visible_messages().next_back().map(|m| m.text.as_str())
    }

    /// Number of messages that are unread for `user_id`.
    pub fn unread_count_for(&self, user_id: &str) -> usize {
        self.messages.iter().filter(|m| m.is_unread_for(user_id)).count()
    }

    /// Whether at least one message is unread for `user_id`.
    pub fn has_unread_for(&self, user_id: &str) -> bool {
        self.messages.iter().any(|m| m.is_unread_for(user_id))
    }

    /// Look up a message by id, including deleted ones.
    pub fn message_mut(&mut self, message_id: &MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| &m.id == message_id)
    }
}
