//! Agent run loop
//!
//! The runner drives one request through the agent graph: call the model,
//! execute requested tools, follow handoffs, and stop when the model answers
//! without calling anything.

use crate::agents::agent::Agent;
use crate::llm::LLMClientFactoryTrait;
use crate::types::{AppError, Message, Result, ToolCall};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

/// Model calls allowed per run before giving up
pub const DEFAULT_MAX_TURNS: usize = 10;

const MULTIPLE_HANDOFFS_MESSAGE: &str = "Multiple handoffs detected, ignoring this one.";

/// Something that happened during a run, in order
#[derive(Debug, Clone, PartialEq)]
pub enum RunItem {
    /// Text produced by an agent
    MessageOutput { agent: String, content: String },
    /// A tool (or handoff tool) the model asked for
    ToolCall {
        agent: String,
        name: String,
        arguments: Value,
    },
    /// Output returned to the model for a function tool
    ToolOutput {
        agent: String,
        name: String,
        output: String,
    },
    /// Control moved from one agent to another
    Handoff { from: String, to: String },
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub run_id: Uuid,
    pub final_output: String,
    /// The agent that produced the final output
    pub last_agent: Arc<Agent>,
    pub items: Vec<RunItem>,
    /// Input history plus every message generated during the run
    pub history: Vec<Message>,
    pub turns: usize,
}

impl RunResult {
    /// History to feed into the next run of the same conversation
    pub fn to_input_list(&self) -> Vec<Message> {
        self.history.clone()
    }

    /// `(from, to)` pairs for each handoff, in order
    pub fn handoffs(&self) -> Vec<(&str, &str)> {
        self.items
            .iter()
            .filter_map(|item| match item {
                RunItem::Handoff { from, to } => Some((from.as_str(), to.as_str())),
                _ => None,
            })
            .collect()
    }
}

/// Runs agents against the model
#[derive(Clone)]
pub struct Runner {
    llm_factory: Arc<dyn LLMClientFactoryTrait>,
    max_turns: usize,
}

impl Runner {
    pub fn new(llm_factory: Arc<dyn LLMClientFactoryTrait>) -> Self {
        Self {
            llm_factory,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Run a single user input through `agent`
    pub async fn run(&self, agent: &Arc<Agent>, input: &str) -> Result<RunResult> {
        self.run_with_history(agent, vec![Message::user(input)])
            .await
    }

    /// Continue a conversation starting from `agent`
    pub async fn run_with_history(
        &self,
        agent: &Arc<Agent>,
        history: Vec<Message>,
    ) -> Result<RunResult> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("agent_run", %run_id, starting_agent = %agent.name());

        self.run_loop(run_id, Arc::clone(agent), history)
            .instrument(span)
            .await
    }

    async fn run_loop(
        &self,
        run_id: Uuid,
        mut current: Arc<Agent>,
        mut history: Vec<Message>,
    ) -> Result<RunResult> {
        let mut items = Vec::new();
        let mut turns = 0;

        loop {
            turns += 1;
            if turns > self.max_turns {
                warn!(max_turns = self.max_turns, "Run exceeded max turns");
                return Err(AppError::MaxTurnsExceeded(self.max_turns));
            }

            let client = self.llm_factory.create_for_model(current.model()).await?;

            let mut messages = Vec::with_capacity(history.len() + 1);
            messages.push(Message::system(current.instructions()));
            messages.extend(history.iter().cloned());
            let tools = current.tool_definitions();

            debug!(
                turn = turns,
                agent = %current.name(),
                model = %client.model_name(),
                "Calling model"
            );
            let response = client.generate_with_tools(&messages, &tools).await?;

            if response.tool_calls.is_empty() {
                items.push(RunItem::MessageOutput {
                    agent: current.name().to_string(),
                    content: response.content.clone(),
                });
                history.push(Message::assistant(response.content.clone()));
                info!(agent = %current.name(), turns, "Run complete");

                return Ok(RunResult {
                    run_id,
                    final_output: response.content,
                    last_agent: current,
                    items,
                    history,
                    turns,
                });
            }

            if !response.content.is_empty() {
                items.push(RunItem::MessageOutput {
                    agent: current.name().to_string(),
                    content: response.content.clone(),
                });
            }
            history.push(Message::assistant_with_tools(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            let mut next_agent: Option<Arc<Agent>> = None;
            for call in &response.tool_calls {
                items.push(RunItem::ToolCall {
                    agent: current.name().to_string(),
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                });

                if let Some(target) = current.find_handoff(&call.name) {
                    if next_agent.is_some() {
                        history.push(Message::tool(&call.id, MULTIPLE_HANDOFFS_MESSAGE));
                        continue;
                    }

                    info!(from = %current.name(), to = %target.name(), "Handoff");
                    items.push(RunItem::Handoff {
                        from: current.name().to_string(),
                        to: target.name().to_string(),
                    });
                    history.push(Message::tool(
                        &call.id,
                        json!({ "assistant": target.name() }).to_string(),
                    ));
                    next_agent = Some(Arc::clone(target));
                    continue;
                }

                let output = self.execute_tool(&current, call).await?;
                items.push(RunItem::ToolOutput {
                    agent: current.name().to_string(),
                    name: call.name.clone(),
                    output: output.clone(),
                });
                history.push(Message::tool(&call.id, output));
            }

            if let Some(next) = next_agent {
                current = next;
            }
        }
    }

    /// Execute a function tool, turning tool failures into model-visible text
    async fn execute_tool(&self, agent: &Agent, call: &ToolCall) -> Result<String> {
        if !agent.tools().has_tool(&call.name) {
            return Err(AppError::ModelBehavior(format!(
                "Tool {} not found in agent {}",
                call.name,
                agent.name()
            )));
        }

        debug!(tool = %call.name, "Executing tool");
        match agent.tools().execute(&call.name, call.arguments.clone()).await {
            Ok(Value::String(text)) => Ok(text),
            Ok(value) => Ok(value.to_string()),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool failed");
                Ok(format!(
                    "An error occurred while running the tool. Please try again. Error: {}",
                    e
                ))
            }
        }
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("max_turns", &self.max_turns)
            .finish_non_exhaustive()
    }
}
