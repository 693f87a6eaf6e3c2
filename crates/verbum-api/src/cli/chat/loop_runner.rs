//! Main chat loop orchestration.
//!
//! One `ChatSession` lives for the whole loop. Each line is either a slash
//! command or an utterance routed through [`Assistant`]; answers are printed
//! and, with speech enabled, read aloud before the next prompt.

use std::time::Instant;

use console::style;
use tracing::info;

use verbum_core::chat::ChatSession;
use verbum_core::intent::Assistant;
use verbum_types::chat::MessageRole;

use crate::cli::thinking_spinner;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

const PREVIEW_CHARS: usize = 100;

pub async fn run_chat_loop(state: &AppState, speak: bool) -> anyhow::Result<()> {
    let mut session = state.new_session();
    let speech = state.speech_for(speak);

    print_welcome_banner(
        state.connector.name(),
        &state.config.backend.model,
        &session.id().to_string(),
        session.is_degraded(),
    );

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::Reset => {
                    session.initialize();
                    println!("\n  {} Conversation cleared.\n", style("*").cyan().bold());
                }
                ChatCommand::History => print_history(&session),
                ChatCommand::Unknown(name) => println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                ),
            }
            continue;
        }

        let start = Instant::now();
        let spinner = thinking_spinner();
        let reply = Assistant::handle(&mut session, &text).await;
        spinner.finish_and_clear();

        println!();
        println!("  {} {}", style("Verbum >").cyan().bold(), reply.text);
        println!(
            "  {}",
            style(format!("{} · {}ms", reply.intent.label(), start.elapsed().as_millis())).dim()
        );
        println!();

        if let Some(speech) = &speech {
            speech.speak_or_warn(&reply.text).await;
        }
    }

    info!(
        session_id = %session.id(),
        turns = session.turn_count(),
        "Chat session finished"
    );
    Ok(())
}

fn print_history(session: &ChatSession) {
    println!();
    for msg in session.history() {
        let label = match msg.role() {
            MessageRole::User => style("You").green(),
            MessageRole::Assistant => style("Verbum").cyan(),
            MessageRole::System => style("System").dim(),
        };
        println!("  {} {}", label.bold(), preview(msg.content()));
    }
    println!();
}

/// First `PREVIEW_CHARS` characters of `content`, with an ellipsis if cut.
fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let cut: String = content.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        content.to_string()
    }
}
