use thiserror::Error;

/// Errors raised by message operations.
///
/// Absent chats and messages are otherwise treated as no-ops or empty
/// results; only an explicit fail-fast fetch reports them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("chat with user '{recipient_id}' not found")]
    ChatNotFound { recipient_id: String },
}
