//! Agent descriptors
//!
//! An [`Agent`] is a named configuration bundle: instructions, tools, the
//! agents it may hand a conversation to, and an optional model override.
//! Agents are built once and shared behind `Arc`; the runner interprets them.

use crate::tools::registry::{Tool, ToolRegistry};
use crate::types::ToolDefinition;
use serde_json::json;
use std::sync::Arc;

/// Immutable agent configuration
pub struct Agent {
    name: String,
    instructions: String,
    handoff_description: Option<String>,
    tools: ToolRegistry,
    handoffs: Vec<Arc<Agent>>,
    model: Option<String>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("tools", &self.tools)
            .field(
                "handoffs",
                &self.handoffs.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Agent {
    /// Start building an agent with the given display name
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder {
            name: name.into(),
            instructions: String::new(),
            handoff_description: None,
            tools: ToolRegistry::new(),
            handoffs: Vec::new(),
            model: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn handoff_description(&self) -> Option<&str> {
        self.handoff_description.as_deref()
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn handoffs(&self) -> &[Arc<Agent>] {
        &self.handoffs
    }

    /// Model override; `None` means the runner's default model
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Name of the tool the model calls to hand a conversation to this agent
    pub fn handoff_tool_name(&self) -> String {
        format!("transfer_to_{}", function_style(&self.name))
    }

    /// Tool definition advertised to agents that can hand off to this one
    pub fn handoff_definition(&self) -> ToolDefinition {
        let description = match &self.handoff_description {
            Some(extra) => format!(
                "Handoff to the {} agent to handle the request. {}",
                self.name, extra
            ),
            None => format!("Handoff to the {} agent to handle the request. ", self.name),
        };

        ToolDefinition {
            name: self.handoff_tool_name(),
            description,
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": [],
                "additionalProperties": false
            }),
        }
    }

    /// Resolve a handoff tool name to its target
    pub fn find_handoff(&self, tool_name: &str) -> Option<&Arc<Agent>> {
        self.handoffs
            .iter()
            .find(|target| target.handoff_tool_name() == tool_name)
    }

    /// Function tools followed by one tool per handoff target
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions = self.tools.get_tool_definitions();
        definitions.extend(self.handoffs.iter().map(|target| target.handoff_definition()));
        definitions
    }
}

/// Builder for [`Agent`]
pub struct AgentBuilder {
    name: String,
    instructions: String,
    handoff_description: Option<String>,
    tools: ToolRegistry,
    handoffs: Vec<Arc<Agent>>,
    model: Option<String>,
}

impl AgentBuilder {
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn handoff_description(mut self, description: impl Into<String>) -> Self {
        self.handoff_description = Some(description.into());
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn handoff(mut self, target: Arc<Agent>) -> Self {
        self.handoffs.push(target);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn build(self) -> Arc<Agent> {
        Arc::new(Agent {
            name: self.name,
            instructions: self.instructions,
            handoff_description: self.handoff_description,
            tools: self.tools,
            handoffs: self.handoffs,
            model: self.model,
        })
    }
}

/// Lowercase, with every non-alphanumeric character replaced by `_`
fn function_style(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
