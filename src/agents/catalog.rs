//! The three-agent setup: triage, French translation, web search
//!
//! Agents come in a text flavor (default model) and a voice flavor, whose
//! instructions ask for short spoken answers and which pin the voice model.

use crate::agents::agent::{Agent, AgentBuilder};
use crate::tools::registry::Tool;
use std::sync::Arc;

pub const TRIAGE_AGENT_NAME: &str = "Triage Agent";
pub const FRENCH_AGENT_NAME: &str = "French Translation Agent";
pub const WEB_SEARCH_AGENT_NAME: &str = "Web Search Agent";

const FRENCH_INSTRUCTIONS: &str = "You are a specialized French translation agent. Your primary responsibility is to:\n\
1. Accurately translate text between English and French while preserving tone and meaning\n\
2. Answer questions about French language, grammar, or culture\n\
3. Help users understand French idioms and expressions\n\
4. Always respond in a helpful, accurate manner\n\n\
When translating, make sure to preserve the tone, formality level, and cultural nuances.";

const WEB_SEARCH_INSTRUCTIONS: &str = "You are a specialized web search agent. Your primary responsibility is to:\n\
1. Find accurate, up-to-date information from the web based on user queries\n\
2. Summarize search results in a clear, concise manner\n\
3. Provide factual, objective information without bias\n\
4. Always cite your sources when providing information\n\n\
Make sure to conduct thorough searches and verify information when possible.";

const TRIAGE_INSTRUCTIONS: &str = "You are a triage agent responsible for routing user requests to the appropriate specialized agent.\n\n\
You have access to the following agents:\n\
1. FRENCH TRANSLATION AGENT: For translating text to/from French or answering questions about French language and culture\n\
2. WEB SEARCH AGENT: For finding factual information and current events on the web\n\n\
Your job is to:\n\
1. Analyze the user's request\n\
2. Determine which specialized agent is best suited to handle it\n\
3. Hand off the request to the appropriate agent\n\
4. If the request doesn't clearly fit either agent, use your best judgment\n\
5. For general questions not requiring specialized knowledge, you may answer directly\n\n\
Always prioritize giving the user the best experience by routing to the most appropriate agent.";

const SPECIALIST_VOICE_SUFFIX: &str = "Since you are communicating via voice, keep your responses concise and easy to understand when spoken.";

const TRIAGE_VOICE_SUFFIX: &str = "Since you are communicating via voice, keep your responses concise and conversational. Introduce yourself when first speaking.";

/// How the agents will talk to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modality {
    Text,
    /// Spoken replies, every agent pinned to the given model
    Voice { model: String },
}

impl Modality {
    fn instructions(&self, base: &str, voice_suffix: &str) -> String {
        match self {
            Modality::Text => base.to_string(),
            Modality::Voice { .. } => format!("{}\n\n{}", base, voice_suffix),
        }
    }

    fn model(&self) -> Option<&str> {
        match self {
            Modality::Text => None,
            Modality::Voice { model } => Some(model),
        }
    }
}

/// The wired agent graph; `triage` is the entry point
#[derive(Debug, Clone)]
pub struct AgentSet {
    pub triage: Arc<Agent>,
    pub french: Arc<Agent>,
    pub web_search: Arc<Agent>,
}

impl AgentSet {
    /// Build the agents for the given modality around a search tool
    pub fn build(modality: &Modality, search_tool: Arc<dyn Tool>) -> Self {
        let french = with_model(
            Agent::builder(FRENCH_AGENT_NAME)
                .instructions(modality.instructions(FRENCH_INSTRUCTIONS, SPECIALIST_VOICE_SUFFIX)),
            modality,
        )
        .build();

        let web_search = with_model(
            Agent::builder(WEB_SEARCH_AGENT_NAME)
                .instructions(
                    modality.instructions(WEB_SEARCH_INSTRUCTIONS, SPECIALIST_VOICE_SUFFIX),
                )
                .tool(search_tool),
            modality,
        )
        .build();

        let triage = with_model(
            Agent::builder(TRIAGE_AGENT_NAME)
                .instructions(modality.instructions(TRIAGE_INSTRUCTIONS, TRIAGE_VOICE_SUFFIX))
                .handoff(Arc::clone(&french))
                .handoff(Arc::clone(&web_search)),
            modality,
        )
        .build();

        tracing::debug!(?modality, "Built agent set");

        Self {
            triage,
            french,
            web_search,
        }
    }

    pub fn text(search_tool: Arc<dyn Tool>) -> Self {
        Self::build(&Modality::Text, search_tool)
    }

    pub fn voice(model: impl Into<String>, search_tool: Arc<dyn Tool>) -> Self {
        Self::build(
            &Modality::Voice {
                model: model.into(),
            },
            search_tool,
        )
    }

    /// Entry point first, then the specialists
    pub fn all(&self) -> [&Arc<Agent>; 3] {
        [&self.triage, &self.web_search, &self.french]
    }
}

fn with_model(builder: AgentBuilder, modality: &Modality) -> AgentBuilder {
    match modality.model() {
        Some(model) => builder.model(model),
        None => builder,
    }
}
