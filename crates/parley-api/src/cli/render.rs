//! Shared output helpers: per-user chat summaries and tables.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use parley_types::chat::{Chat, Message};
use serde::Serialize;

/// A chat as seen by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSummary {
    pub id: String,
    pub with: String,
    pub messages: usize,
    pub unread: usize,
    pub last_message: Option<String>,
}

impl ChatSummary {
    pub fn from_chat(chat: &Chat, viewer: &str) -> Self {
        Self {
            id: chat.id.to_string(),
            with: chat.counterpart(viewer).unwrap_or_default().to_string(),
            messages: chat.visible_messages().count(),
            unread: chat.unread_count_for(viewer),
            last_message: chat.last_message_text().map(str::to_string),
        }
    }
}

pub fn summarize(chats: &[Chat], viewer: &str) -> Vec<ChatSummary> {
    chats.iter().map(|c| ChatSummary::from_chat(c, viewer)).collect()
}

pub fn print_chat_table(summaries: &[ChatSummary], placeholder: &str) {
    if summaries.is_empty() {
        println!("  {} No chats.", style("i").blue().bold());
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("With").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Unread").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
        Cell::new("Chat ID").fg(Color::White),
    ]);

    for summary in summaries {
        let unread = if summary.unread > 0 {
            Cell::new(summary.unread).fg(Color::Yellow)
        } else {
            Cell::new(summary.unread).fg(Color::DarkGrey)
        };
        let last = match &summary.last_message {
            Some(text) => Cell::new(text),
            None => Cell::new(placeholder).fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(&summary.with).fg(Color::Cyan),
            Cell::new(summary.messages),
            unread,
            last,
            Cell::new(&summary.id).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
}

pub fn print_messages(messages: &[Message], viewer: &str) {
    if messages.is_empty() {
        println!("  {} No messages.", style("i").blue().bold());
        return;
    }
    for message in messages {
        let marker = if message.sender_id == viewer {
            style("→").green()
        } else {
            style("←").cyan()
        };
        let read = if message.is_read { "read" } else { "unread" };
        println!(
            "  {marker} {} {}  {}",
            style(&message.sender_id).bold(),
            message.text,
            style(format!("[{read}] {}", message.id)).dim()
        );
    }
}
