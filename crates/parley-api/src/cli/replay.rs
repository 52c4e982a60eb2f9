//! Replay a JSON script of message operations.
//!
//! A script is a list of steps, each naming the acting user and an operation:
//!
//! ```json
//! {"steps": [
//!   {"as": "alice", "op": "send", "to": "bob", "text": "hi"},
//!   {"as": "bob", "op": "fetch", "with": "alice", "count": 10},
//!   {"as": "bob", "op": "delete_message", "id": "$last"},
//!   {"as": "alice", "op": "unread_count"}
//! ]}
//! ```
//!
//! `"$last"` refers to the newest message produced by an earlier send,
//! create, or fetch step.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;
use parley_types::chat::{Message, MessageId};
use serde::{Deserialize, Serialize};

use crate::cli::render::{self, ChatSummary};
use crate::state::AppState;

/// Token standing for the id of the most recent message seen by the replay.
pub const LAST_MESSAGE_TOKEN: &str = "$last";

#[derive(Debug, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    #[serde(rename = "as")]
    pub user: String,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Send {
        to: String,
        text: String,
    },
    Create {
        to: String,
        text: String,
    },
    Fetch {
        with: String,
        #[serde(default)]
        count: Option<usize>,
        /// Fail instead of returning nothing when the chat does not exist.
        #[serde(default)]
        strict: bool,
    },
    DeleteMessage {
        id: String,
    },
    DeleteChat {
        with: String,
    },
    Chats,
    LastMessages,
    UnreadCount,
}

/// What a single step produced.
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Message { message: Option<Message> },
    Messages { messages: Vec<Message> },
    Chats { chats: Vec<ChatSummary> },
    Texts { texts: Vec<String> },
    Count { count: usize },
    Done,
    Failed { error: String },
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub user: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

pub fn parse_script(content: &str) -> Result<Script> {
    serde_json::from_str(content).context("invalid replay script")
}

/// Execute every step against `state`'s registry.
///
/// A fail-fast fetch on a missing chat is reported as a `Failed` outcome and
/// the replay continues. Malformed ids abort the replay.
pub fn run_script(state: &AppState, script: &Script) -> Result<Vec<StepReport>> {
    let mut last_message: Option<MessageId> = None;
    let mut reports = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        let service = state.service_for(&step.user);
        let span = tracing::info_span!("replay_step", step = index + 1, user = %step.user);
        let _guard = span.enter();

        let outcome = match &step.action {
            Action::Send { to, text } => {
                let message = service.send_message(to, text.as_str());
                last_message = Some(message.id);
                Outcome::Message {
                    message: Some(message),
                }
            }
            Action::Create { to, text } => {
                let message = service.create_message(to, text.as_str());
                if let Some(m) = &message {
                    last_message = Some(m.id);
                }
                Outcome::Message { message }
            }
            Action::Fetch {
                with,
                count,
                strict,
            } => {
                let count = parley_infra::config::resolve_fetch_count(&state.config, *count);
                let fetched = if *strict {
                    service.get_messages_or_fail(with, count)
                } else {
                    Ok(service.get_messages_or_empty(with, count))
                };
                match fetched {
                    Ok(messages) => {
                        if let Some(m) = messages.last() {
                            last_message = Some(m.id);
                        }
                        Outcome::Messages { messages }
                    }
                    Err(err) => Outcome::Failed {
                        error: err.to_string(),
                    },
                }
            }
            Action::DeleteMessage { id } => {
                let id = resolve_message_id(id, last_message)
                    .with_context(|| format!("step {}", index + 1))?;
                service.delete_message(&id);
                Outcome::Done
            }
            Action::DeleteChat { with } => {
                service.delete_chat(with);
                Outcome::Done
            }
            Action::Chats => Outcome::Chats {
                chats: render::summarize(&service.get_chats(), &step.user),
            },
            Action::LastMessages => Outcome::Texts {
                texts: service.last_messages(),
            },
            Action::UnreadCount => Outcome::Count {
                count: service.unread_chats_count(),
            },
        };

        reports.push(StepReport {
            step: index + 1,
            user: step.user.clone(),
            outcome,
        });
    }

    Ok(reports)
}

fn resolve_message_id(raw: &str, last: Option<MessageId>) -> Result<MessageId> {
    if raw == LAST_MESSAGE_TOKEN {
        match last {
            Some(id) => Ok(id),
            None => bail!("'{LAST_MESSAGE_TOKEN}' used before any message was produced"),
        }
    } else {
        raw.parse()
            .with_context(|| format!("invalid message id '{raw}'"))
    }
}

pub async fn replay(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let script = parse_script(&content)?;
    let reports = run_script(state, &script)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!(
            "{} {}",
            style(format!("#{}", report.step)).dim(),
            style(&report.user).bold()
        );
        match &report.outcome {
            Outcome::Message { message: Some(m) } => {
                render::print_messages(std::slice::from_ref(m), &report.user)
            }
            Outcome::Message { message: None } => {
                println!("  {} no chat, nothing sent", style("i").blue().bold())
            }
            Outcome::Messages { messages } => render::print_messages(messages, &report.user),
            Outcome::Chats { chats } => {
                render::print_chat_table(chats, &state.config.no_messages_placeholder)
            }
            Outcome::Texts { texts } => println!("  {texts:?}"),
            Outcome::Count { count } => println!("  {}", style(count).bold()),
            Outcome::Done => println!("  {}", style("ok").green()),
            Outcome::Failed { error } => println!("  {} {error}", style("✗").red().bold()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::config::ParleyConfig;

    fn run(json: &str) -> Vec<StepReport> {
        let state = AppState::with_config(ParleyConfig::default());
        run_script(&state, &parse_script(json).unwrap()).unwrap()
    }

    #[test]
    fn replay_end_to_end_read_receipts() {
        let reports = run(
            r#"{"steps": [
                {"as": "A", "op": "send", "to": "B", "text": "Hello"},
                {"as": "A", "op": "fetch", "with": "B", "count": 1},
                {"as": "B", "op": "unread_count"},
                {"as": "B", "op": "fetch", "with": "A", "count": 1},
                {"as": "B", "op": "unread_count"},
                {"as": "A", "op": "unread_count"}
            ]}"#,
        );

        match &reports[1].outcome {
            Outcome::Messages { messages } => assert!(!messages[0].is_read),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(matches!(reports[2].outcome, Outcome::Count { count: 1 }));
        match &reports[3].outcome {
            Outcome::Messages { messages } => assert!(messages[0].is_read),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(matches!(reports[4].outcome, Outcome::Count { count: 0 }));
        assert!(matches!(reports[5].outcome, Outcome::Count { count: 0 }));
    }

    #[test]
    fn strict_fetch_failure_is_reported_and_replay_continues() {
        let reports = run(
            r#"{"steps": [
                {"as": "A", "op": "fetch", "with": "ghost", "strict": true},
                {"as": "A", "op": "fetch", "with": "ghost"},
                {"as": "A", "op": "chats"}
            ]}"#,
        );

        match &reports[0].outcome {
            Outcome::Failed { error } => assert!(error.contains("ghost")),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(matches!(&reports[1].outcome, Outcome::Messages { messages } if messages.is_empty()));
        assert!(matches!(&reports[2].outcome, Outcome::Chats { chats } if chats.is_empty()));
    }

    #[test]
    fn last_token_deletes_newest_message() {
        let reports = run(
            r#"{"steps": [
                {"as": "A", "op": "send", "to": "B", "text": "keep"},
                {"as": "A", "op": "send", "to": "B", "text": "drop"},
                {"as": "A", "op": "delete_message", "id": "$last"},
                {"as": "A", "op": "last_messages"}
            ]}"#,
        );

        match &reports[3].outcome {
            Outcome::Texts { texts } => assert_eq!(texts, &vec!["keep".to_string()]),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn create_without_chat_reports_no_message() {
        let reports = run(r#"{"steps": [{"as": "A", "op": "create", "to": "B", "text": "x"}]}"#);
        assert!(matches!(reports[0].outcome, Outcome::Message { message: None }));
    }

    #[test]
    fn last_token_before_any_message_is_an_error() {
        let state = AppState::with_config(ParleyConfig::default());
        let script =
            parse_script(r#"{"steps": [{"as": "A", "op": "delete_message", "id": "$last"}]}"#)
                .unwrap();
        assert!(run_script(&state, &script).is_err());
    }

    #[test]
    fn unknown_operation_is_rejected() {
        assert!(parse_script(r#"{"steps": [{"as": "A", "op": "shout"}]}"#).is_err());
    }

    #[test]
    fn fetch_without_count_uses_configured_default() {
        let state = AppState::with_config(ParleyConfig {
            default_fetch_count: 2,
            ..ParleyConfig::default()
        });
        let script = parse_script(
            r#"{"steps": [
                {"as": "A", "op": "send", "to": "B", "text": "1"},
                {"as": "A", "op": "send", "to": "B", "text": "2"},
                {"as": "A", "op": "send", "to": "B", "text": "3"},
                {"as": "A", "op": "fetch", "with": "B"}
            ]}"#,
        )
        .unwrap();
        let reports = run_script(&state, &script).unwrap();
        match &reports[3].outcome {
            Outcome::Messages { messages } => assert_eq!(messages.len(), 2),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn replay_reads_script_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("script.json");
        tokio::fs::write(
            &path,
            r#"{"steps": [{"as": "A", "op": "send", "to": "B", "text": "hi"}]}"#,
        )
        .await
        .unwrap();

        let state = AppState::with_config(ParleyConfig::default());
        replay(&state, &path, true).await.unwrap();
        assert_eq!(state.registry.len(), 1);
    }

    #[tokio::test]
    async fn replay_missing_file_is_an_error() {
        let state = AppState::with_config(ParleyConfig::default());
        assert!(replay(&state, Path::new("/nonexistent/script.json"), true).await.is_err());
    }
}
