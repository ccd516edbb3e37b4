//! # handoff - Triage Agent with Specialist Handoffs
//!
//! A small multi-agent assistant. Every request goes to a triage agent, which
//! either answers directly or hands the conversation to one of two
//! specialists: a French translation agent and a web search agent. The same
//! agents can be driven from a text chat, a scripted demo, or a voice loop
//! (speech-to-text, agents, text-to-speech).
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use handoff::{AgentSet, LLMClientFactory, Provider, Runner, SearchTool};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> handoff::Result<()> {
//!     let provider = Provider::OpenAI {
//!         api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
//!         api_base: "https://api.openai.com/v1".to_string(),
//!         model: "gpt-4o".to_string(),
//!     };
//!     let runner = Runner::new(Arc::new(LLMClientFactory::new(provider)));
//!     let agents = AgentSet::text(Arc::new(SearchTool::new()));
//!
//!     let result = runner.run(&agents.triage, "Translate 'good morning' to French").await?;
//!     println!("{}: {}", result.last_agent.name(), result.final_output);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `audio-device` | Microphone capture and speaker playback via cpal |
//!
//! ## Modules
//!
//! - [`agents`] - Agent descriptors, the agent set, and the run loop
//! - [`cli`] - Command-line parsing and console front-ends
//! - [`llm`] - LLM client abstraction and the OpenAI client
//! - [`tools`] - Tool trait, registry, and web search
//! - [`voice`] - Audio, STT/TTS, voice pipeline and turn loop
//! - [`types`] - Messages, tool types, and errors
//! - [`utils`] - Configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Agents, handoffs and the run loop.
pub mod agents;
/// Command-line interface and console output.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Built-in tools (web search).
pub mod tools;
/// Core types (messages, tool calls, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;
/// Voice pipeline and audio I/O.
pub mod voice;

// Re-export commonly used types
pub use agents::{Agent, AgentSet, RequestHandler, RunResult, Runner, TriageSession};
pub use llm::client::LLMClientFactoryTrait;
pub use llm::{LLMClient, LLMClientFactory, LLMResponse, Provider};
pub use tools::registry::ToolRegistry;
pub use tools::SearchTool;
pub use types::{AppError, Result};
pub use utils::config::HandoffConfig;
