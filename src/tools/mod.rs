//! Built-in Tools for Agent Capabilities
//!
//! Tools let an agent do more than generate text. The model decides when to
//! call one; the runner executes it and feeds the output back.
//!
//! # Module Structure
//!
//! - [`registry`](crate::tools::registry) - The [`Tool`] trait and per-agent registry
//! - [`search`](crate::tools::search) - Web search via the DuckDuckGo Instant Answer API
//!
//! # Web Search
//!
//! ```ignore
//! let tool = SearchTool::new();
//! let text = tool.search("latest developments in AI").await;
//! println!("{}", text);
//! ```

/// Tool trait and registry.
pub mod registry;
/// Web search tool using DuckDuckGo.
pub mod search;

pub use registry::{Tool, ToolRegistry};
pub use search::SearchTool;
