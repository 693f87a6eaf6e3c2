//! One-shot question: route, answer, print, optionally speak.

use console::style;

use verbum_core::intent::{Assistant, Intent};

use crate::state::AppState;

use super::thinking_spinner;

pub async fn ask(
    state: &AppState,
    text: &str,
    speak: bool,
    json: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut session = state.new_session();

    let spinner = (!json && !quiet).then(thinking_spinner);
    let reply = Assistant::handle(&mut session, text).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        let out = serde_json::json!({
            "response": reply.text,
            "intent": reply.intent.label(),
            "degraded": session.is_degraded(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if quiet {
        println!("{}", reply.text);
    } else {
        println!();
        if session.is_degraded() && reply.intent == Intent::Scripture {
            println!("  {} {}", style("!").yellow().bold(), style("offline answer").dim());
        }
        println!("  {}", reply.text);
        println!();
    }

    if let Some(speech) = state.speech_for(speak) {
        speech.speak_or_warn(&reply.text).await;
    }
    Ok(())
}
