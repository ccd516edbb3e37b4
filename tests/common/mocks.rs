//! Mock implementations for testing.
//!
//! This module provides mock LLM clients, factories and voice models that can
//! be used across different test files without duplication.
#![allow(dead_code)]

use async_trait::async_trait;
use handoff::llm::client::{LLMClientFactoryTrait, Provider};
use handoff::llm::{LLMClient, LLMResponse};
use handoff::types::{AppError, Message, Result, ToolCall, ToolDefinition};
use handoff::voice::{AudioBuffer, AudioSource, SpeechToText, TextToSpeech};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

/// One `generate_with_tools` call as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
}

impl RecordedRequest {
    /// The system prompt (first message)
    pub fn system(&self) -> &str {
        self.messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<Result<LLMResponse>>,
    requests: Vec<RecordedRequest>,
}

/// Mock LLM client that plays back a script of responses.
///
/// Clients handed out by [`MockLLMFactory`] share one script, so a run that
/// spans several model calls (and several agents) consumes it in order. When
/// the script runs out the client answers with an error.
///
/// # Examples
///
/// ```ignore
/// let client = MockLLMClient::scripted(vec![
///     MockLLMClient::handoff("transfer_to_french_translation_agent"),
///     LLMResponse::text("Bonjour !"),
/// ]);
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    script: Arc<Mutex<Script>>,
    model: String,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response once.
    pub fn new(response: &str) -> Self {
        Self::scripted(vec![LLMResponse::text(response)])
    }

    /// Create a mock client that returns the responses in order.
    pub fn scripted(responses: Vec<LLMResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                responses: responses.into_iter().map(Ok).collect(),
                requests: Vec::new(),
            })),
            model: "mock-model".to_string(),
        }
    }

    /// Create a mock client whose every call fails.
    pub fn failing() -> Self {
        Self::scripted(vec![])
    }

    /// Queue a failure after the responses already scripted
    pub fn then_fail(self, message: &str) -> Self {
        self.script
            .lock()
            .responses
            .push_back(Err(AppError::LLM(message.to_string())));
        self
    }

    fn for_model(&self, model: &str) -> Self {
        Self {
            script: Arc::clone(&self.script),
            model: model.to_string(),
        }
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().requests.clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().responses.len()
    }

    /// A response calling one tool
    pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> LLMResponse {
        LLMResponse::tool_calls(vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }])
    }

    /// A response calling one handoff tool
    pub fn handoff(tool_name: &str) -> LLMResponse {
        Self::tool_call(&format!("call_{}", tool_name), tool_name, json!({}))
    }

    fn next(&self) -> Result<LLMResponse> {
        self.script
            .lock()
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(AppError::LLM("Mock LLM failure".to_string())))
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_system(&self, _system: &str, _prompt: &str) -> Result<String> {
        self.next().map(|r| r.content)
    }

    async fn generate_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        self.script.lock().requests.push(RecordedRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            tools: tools.to_vec(),
        });
        self.next()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Mock LLM factory for tests requiring complete isolation from external services.
///
/// This factory always returns clients sharing the script of the given
/// `MockLLMClient`, tagged with the requested model.
pub struct MockLLMFactory {
    provider: Provider,
    client: MockLLMClient,
}

impl MockLLMFactory {
    /// Create a new mock factory that returns the given mock client.
    pub fn new(client: MockLLMClient) -> Self {
        Self {
            provider: Provider::OpenAI {
                api_key: "test-key".to_string(),
                api_base: "http://localhost:0/v1".to_string(),
                model: "mock-model".to_string(),
            },
            client,
        }
    }
}

#[async_trait]
impl LLMClientFactoryTrait for MockLLMFactory {
    fn default_provider(&self) -> &Provider {
        &self.provider
    }

    async fn create_default(&self) -> Result<Box<dyn LLMClient>> {
        Ok(Box::new(self.client.for_model(self.provider.model())))
    }

    async fn create_with_provider(&self, provider: Provider) -> Result<Box<dyn LLMClient>> {
        Ok(Box::new(self.client.for_model(provider.model())))
    }
}

/// Speech models that transcribe to a fixed text and "speak" a fixed number
/// of samples per character.
pub struct MockSpeech {
    transcript: Option<String>,
    samples_per_char: usize,
    pub transcribed: Mutex<Vec<usize>>,
    pub spoken: Mutex<Vec<String>>,
}

impl MockSpeech {
    pub fn new(transcript: &str, samples_per_char: usize) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
            samples_per_char,
            transcribed: Mutex::new(Vec::new()),
            spoken: Mutex::new(Vec::new()),
        }
    }

    /// Transcription always fails
    pub fn deaf() -> Self {
        Self {
            transcript: None,
            samples_per_char: 0,
            transcribed: Mutex::new(Vec::new()),
            spoken: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SpeechToText for MockSpeech {
    async fn transcribe(&self, audio: &AudioBuffer) -> Result<String> {
        self.transcribed.lock().push(audio.len());
        self.transcript
            .clone()
            .ok_or_else(|| AppError::Voice("Transcription failed".to_string()))
    }
}

#[async_trait]
impl TextToSpeech for MockSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<i16>> {
        self.spoken.lock().push(text.to_string());
        Ok(vec![1; text.chars().count() * self.samples_per_char])
    }
}

/// Audio source that yields one second of silence for a fixed number of
/// turns. After that it either fires a shutdown signal and never returns, or
/// fails like a disconnected device.
pub struct TurnLimitedSource {
    turns: usize,
    captures: Arc<AtomicUsize>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TurnLimitedSource {
    /// Signals the returned receiver when asked for turn `turns + 1`
    pub fn interrupting(turns: usize) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let source = Self {
            turns,
            captures: Arc::new(AtomicUsize::new(0)),
            shutdown: Some(tx),
        };
        (source, rx)
    }

    /// Fails when asked for turn `turns + 1`
    pub fn failing(turns: usize) -> Self {
        Self {
            turns,
            captures: Arc::new(AtomicUsize::new(0)),
            shutdown: None,
        }
    }

    pub fn captures(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.captures)
    }
}

#[async_trait]
impl AudioSource for TurnLimitedSource {
    async fn capture(&mut self) -> Result<AudioBuffer> {
        let previous = self.captures.fetch_add(1, Ordering::SeqCst);
        if previous < self.turns {
            return Ok(AudioBuffer::silence(1));
        }
        match self.shutdown.take() {
            Some(tx) => {
                let _ = tx.send(());
                std::future::pending().await
            }
            None => Err(AppError::Audio("Input device disconnected".to_string())),
        }
    }

    fn describe(&self) -> String {
        format!("{} scripted turns", self.turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_plays_script_in_order() {
        let client = MockLLMClient::scripted(vec![
            LLMResponse::text("first"),
            LLMResponse::text("second"),
        ]);

        let first = client.generate_with_tools(&[], &[]).await.unwrap();
        let second = client.generate_with_tools(&[], &[]).await.unwrap();
        assert_eq!(first.content, "first");
        assert_eq!(second.content, "second");
        assert!(client.generate_with_tools(&[], &[]).await.is_err());
        assert_eq!(client.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_factory_shares_script() {
        let client = MockLLMClient::new("factory response");
        let factory = MockLLMFactory::new(client.clone());

        let llm = factory.create_for_model(Some("gpt-4o-mini")).await.unwrap();
        assert_eq!(llm.model_name(), "gpt-4o-mini");

        let result = llm.generate_with_tools(&[], &[]).await.unwrap();
        assert_eq!(result.content, "factory response");
        assert_eq!(client.remaining(), 0);
    }
}
