//! CLI module for handoff
//!
//! Provides command-line interface parsing and the console front-ends for the
//! `handoff` binary. Uses clap for argument parsing and owo-colors for colored
//! terminal output.

pub mod chat;
pub mod demo;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// handoff - a triage agent that routes requests to specialist agents
///
/// Requests go to a triage agent, which either answers directly or hands
/// the conversation to a French translation agent or a web search agent.
#[derive(Parser, Debug)]
#[command(
    name = "handoff",
    version,
    about = "Multi-agent assistant: triage, French translation and web search",
    long_about = "Routes each request through a triage agent that hands off to a French\n\
                  translation agent or a web search agent. Runs as a text chat, a scripted\n\
                  demo, or a voice loop.\n\n\
                  Requires OPENAI_API_KEY in the environment or a local .env file.",
    after_help = "EXAMPLES:\n    \
                  handoff                       # Interactive text chat\n    \
                  handoff demo --delay 1        # Run the demo queries\n    \
                  handoff voice --once          # One voice turn\n    \
                  handoff agents                # Show the agent setup"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to handoff.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive text session (default)
    ///
    /// Type a request per line; 'exit' or 'quit' ends the session.
    Chat,

    /// Run the fixed demo queries through the triage agent
    Demo {
        /// Seconds to wait between queries (defaults to the config value)
        #[arg(long)]
        delay: Option<u64>,
    },

    /// Voice session: speech in, speech out
    ///
    /// Uses the microphone when built with the audio-device feature,
    /// otherwise runs one turn on synthetic silence.
    Voice {
        /// Run a single turn even when a microphone is available
        #[arg(long)]
        once: bool,
    },

    /// Print the agents and their handoffs
    Agents,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, `chat` when none was given
    pub fn selected_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}
