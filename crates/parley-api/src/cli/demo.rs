//! The built-in demonstration conversation.
//!
//! Acting as one user: message two peers, list chats and their latest
//! messages, read one conversation, delete its newest message, report the
//! unread count, then delete the other conversation.

use anyhow::Result;
use console::style;
use serde::Serialize;

use crate::cli::render::{self, ChatSummary};
use crate::state::AppState;

const FIRST_PEER: &str = "user2";
const SECOND_PEER: &str = "user3";

/// Everything the demonstration observed, in order.
#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub user: String,
    pub chats: Vec<ChatSummary>,
    pub last_messages: Vec<String>,
    pub read_from_first_peer: Vec<String>,
    pub deleted_message_id: Option<String>,
    pub unread_chats: usize,
    pub chats_after_delete: usize,
}

/// Run the scenario against `state`'s registry and collect what it saw.
pub fn run_demo(state: &AppState, user: &str) -> DemoReport {
    let service = state.service_for(user);

    service.send_message(FIRST_PEER, "Hi!");
    service.send_message(FIRST_PEER, "How are you?");
    service.send_message(SECOND_PEER, "Hello!");

    let chats = render::summarize(&service.get_chats(), user);
    let last_messages = service.last_messages();

    let read_from_first_peer = service
        .get_messages_or_empty(FIRST_PEER, 2)
        .into_iter()
        .map(|m| m.text)
        .collect();

    let deleted_message_id = service
        .get_messages_or_empty(FIRST_PEER, 1)
        .first()
        .map(|m| m.id);
    if let Some(id) = &deleted_message_id {
        service.delete_message(id);
    }

    let unread_chats = service.unread_chats_count();

    service.delete_chat(SECOND_PEER);
    let chats_after_delete = service.get_chats().len();

    DemoReport {
        user: user.to_string(),
        chats,
        last_messages,
        read_from_first_peer,
        deleted_message_id: deleted_message_id.map(|id| id.to_string()),
        unread_chats,
        chats_after_delete,
    }
}

pub fn demo(state: &AppState, user: &str, json: bool) -> Result<()> {
    let report = run_demo(state, user);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("  {} Chats for {}", style("●").green(), style(&report.user).bold());
    render::print_chat_table(&report.chats, &state.config.no_messages_placeholder);
    println!();
    println!("  Last messages: {:?}", report.last_messages);
    println!("  Messages with {FIRST_PEER}: {:?}", report.read_from_first_peer);
    if let Some(id) = &report.deleted_message_id {
        println!("  Deleted message {}", style(id).dim());
    }
    println!("  Unread chats: {}", style(report.unread_chats).bold());
    println!(
        "  Chats after deleting the chat with {SECOND_PEER}: {}",
        style(report.chats_after_delete).bold()
    );
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::config::ParleyConfig;

    #[test]
    fn demo_report_matches_scenario() {
        let state = AppState::with_config(ParleyConfig::default());
        let report = run_demo(&state, "user1");

        assert_eq!(report.chats.len(), 2);
        assert_eq!(report.chats[0].with, FIRST_PEER);
        assert_eq!(report.last_messages, vec!["How are you?", "Hello!"]);
        assert_eq!(report.read_from_first_peer, vec!["Hi!", "How are you?"]);
        assert!(report.deleted_message_id.is_some());
        assert_eq!(report.unread_chats, 0);
        assert_eq!(report.chats_after_delete, 1);
    }

    #[test]
    fn demo_deletes_newest_message_with_first_peer() {
        let state = AppState::with_config(ParleyConfig::default());
        run_demo(&state, "user1");

        let texts: Vec<_> = state
            .service_for("user1")
            .get_messages_or_empty(FIRST_PEER, 10)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["Hi!"]);
    }
}
