//! LLM Client abstractions and provider management
//!
//! Agents talk to the model through the [`LLMClient`] trait. The only
//! provider is OpenAI (and compatible endpoints), but the runner depends on
//! the [`LLMClientFactoryTrait`] seam so tests can swap in scripted clients.

use crate::types::{AppError, Message, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate with a system prompt and a single user prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate from a full conversation, offering the given tools
    async fn generate_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Response from an LLM generation request
#[derive(Debug, Clone, PartialEq)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Any tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason generation stopped (e.g., "stop", "tool_calls", "length")
    pub finish_reason: String,
}

impl LLMResponse {
    /// A plain text answer with no tool calls
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: vec![],
            finish_reason: "stop".to_string(),
        }
    }

    /// A response that only requests tool calls
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            tool_calls,
            finish_reason: "tool_calls".to_string(),
        }
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
    },
}

impl Provider {
    /// Create a client instance for this provider
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
            } => {
                if api_key.trim().is_empty() {
                    return Err(AppError::LLM("OpenAI API key is empty".to_string()));
                }
                Ok(Box::new(super::openai::OpenAIClient::new(
                    api_key.clone(),
                    api_base.clone(),
                    model.clone(),
                )))
            }
        }
    }

    /// Same provider, different model
    pub fn with_model(&self, model: &str) -> Provider {
        match self {
            Provider::OpenAI {
                api_key, api_base, ..
            } => Provider::OpenAI {
                api_key: api_key.clone(),
                api_base: api_base.clone(),
                model: model.to_string(),
            },
        }
    }

    /// Get the configured model
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } => model,
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
        }
    }
}

/// Factory seam used by the runner to obtain clients per agent model
#[async_trait]
pub trait LLMClientFactoryTrait: Send + Sync {
    /// Get a reference to the default provider
    fn default_provider(&self) -> &Provider;

    /// Create a client using the default provider
    async fn create_default(&self) -> Result<Box<dyn LLMClient>>;

    /// Create a client using a specific provider
    async fn create_with_provider(&self, provider: Provider) -> Result<Box<dyn LLMClient>>;

    /// Create a client for an agent's model override, or the default model
    async fn create_for_model(&self, model: Option<&str>) -> Result<Box<dyn LLMClient>> {
        match model {
            Some(model) => {
                self.create_with_provider(self.default_provider().with_model(model))
                    .await
            }
            None => self.create_default().await,
        }
    }
}

/// Configuration-based client factory
///
/// Provides a convenient way to create LLM clients with a default provider
/// while allowing per-agent model overrides.
pub struct LLMClientFactory {
    default_provider: Provider,
}

impl LLMClientFactory {
    /// Create a new factory with the specified default provider
    pub fn new(default_provider: Provider) -> Self {
        Self { default_provider }
    }
}

#[async_trait]
impl LLMClientFactoryTrait for LLMClientFactory {
    fn default_provider(&self) -> &Provider {
        &self.default_provider
    }

    async fn create_default(&self) -> Result<Box<dyn LLMClient>> {
        self.default_provider.create_client()
    }

    async fn create_with_provider(&self, provider: Provider) -> Result<Box<dyn LLMClient>> {
        provider.create_client()
    }
}
