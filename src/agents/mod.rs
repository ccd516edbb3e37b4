//! Agents and the run loop
//!
//! - [`agent`] - Agent descriptors and handoff tool naming
//! - [`catalog`] - The triage / French translation / web search setup
//! - [`runner`] - Model call loop with tool execution and handoffs
//! - [`session`] - Request handlers used by the text front-ends

pub mod agent;
pub mod catalog;
pub mod runner;
pub mod session;

pub use agent::{Agent, AgentBuilder};
pub use catalog::{AgentSet, Modality};
pub use runner::{RunItem, RunResult, Runner, DEFAULT_MAX_TURNS};
pub use session::{RequestHandler, TriageSession};
