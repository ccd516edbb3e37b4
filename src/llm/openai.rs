//! OpenAI Chat Completions client over plain HTTP
//!
//! Works against api.openai.com and any compatible endpoint that accepts
//! `POST {api_base}/chat/completions` with bearer authentication.

use crate::llm::client::{LLMClient, LLMResponse};
use crate::types::{AppError, Message, MessageRole, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct OpenAIClient {
    http_client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// Convert conversation messages to the wire format
    fn to_wire_messages(messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| match msg.role {
                MessageRole::Assistant if !msg.tool_calls.is_empty() => {
                    let tool_calls: Vec<Value> = msg
                        .tool_calls
                        .iter()
                        .map(|tc| {
                            json!({
                                "id": tc.id,
                                "type": "function",
                                "function": {
                                    "name": tc.name,
                                    "arguments": tc.arguments.to_string()
                                }
                            })
                        })
                        .collect();

                    let content = if msg.content.is_empty() {
                        Value::Null
                    } else {
                        Value::String(msg.content.clone())
                    };

                    json!({
                        "role": "assistant",
                        "content": content,
                        "tool_calls": tool_calls
                    })
                }
                MessageRole::Tool => json!({
                    "role": "tool",
                    "tool_call_id": msg.tool_call_id.clone().unwrap_or_default(),
                    "content": msg.content
                }),
                role => json!({
                    "role": role.as_str(),
                    "content": msg.content
                }),
            })
            .collect()
    }

    fn to_wire_tools(tools: &[ToolDefinition]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters
                    }
                })
            })
            .collect()
    }

    async fn post(&self, body: Value) -> Result<Value> {
        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "OpenAI API error ({}): {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::LLM(format!("Failed to parse response: {}", e)))
    }

    /// Parse a chat completion response body
    pub(crate) fn parse_response(json: &Value) -> Result<LLMResponse> {
        let choice = json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))?;

        let message = choice
            .get("message")
            .ok_or_else(|| AppError::LLM("No message in response".to_string()))?;

        let content = message
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let finish_reason = choice
            .get("finish_reason")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        let tool_calls = message
            .get("tool_calls")
            .and_then(|v| v.as_array())
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|call| {
                        let function = call.get("function")?;
                        let name = function.get("name")?.as_str()?.to_string();
                        let id = call
                            .get("id")
                            .and_then(|v| v.as_str())
                            .map(String::from)
                            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                        let arguments = function
                            .get("arguments")
                            .and_then(|v| v.as_str())
                            .and_then(|s| serde_json::from_str(s).ok())
                            .unwrap_or(json!({}));

                        Some(ToolCall {
                            id,
                            name,
                            arguments,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(LLMResponse {
            content,
            tool_calls,
            finish_reason,
        })
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let messages = [Message::system(system), Message::user(prompt)];
        let body = json!({
            "model": self.model,
            "messages": Self::to_wire_messages(&messages),
        });

        let response = Self::parse_response(&self.post(body).await?)?;
        Ok(response.content)
    }

    async fn generate_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let mut body = json!({
            "model": self.model,
            "messages": Self::to_wire_messages(messages),
        });

        if !tools.is_empty() {
            body["tools"] = json!(Self::to_wire_tools(tools));
            body["tool_choice"] = json!("auto");
        }

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Sending chat completion request"
        );

        Self::parse_response(&self.post(body).await?)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
