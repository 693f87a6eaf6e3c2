//! CLI command definitions for the `verbum` binary.
//!
//! Uses clap derive macros for argument parsing. Global flags control output
//! format, verbosity, configuration and offline mode.

pub mod ask;
pub mod chat;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// Bible questions by voice or text, with local answers for the small stuff.
#[derive(Parser)]
#[command(name = "verbum", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to $VERBUM_CONFIG, then ./verbum.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Answer from the canned fallback without contacting the backend.
    #[arg(long, global = true, env = "VERBUM_OFFLINE")]
    pub offline: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation.
    Chat {
        /// Read every answer aloud.
        #[arg(long)]
        speak: bool,
    },

    /// Ask a single question and print the answer.
    Ask {
        /// The question, e.g. `verbum ask who was Moses`.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Read the answer aloud.
        #[arg(long)]
        speak: bool,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to server.port, then $PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to server.host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Spinner shown while an answer is on its way.
pub fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["verbum", "--offline", "ask", "who", "was", "Moses"]).unwrap();
        assert!(cli.offline);
        match cli.command {
            Commands::Ask { text, speak } => {
                assert_eq!(text.join(" "), "who was Moses");
                assert!(!speak);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["verbum", "serve", "--port", "8080", "-vv", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), host: None }));
    }

    #[test]
    fn test_ask_requires_text() {
        assert!(Cli::try_parse_from(["verbum", "ask"]).is_err());
    }
}
