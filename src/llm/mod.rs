//! LLM Provider Clients and Abstractions
//!
//! This module provides the interface agents use to reach the model.
//!
//! # Architecture
//!
//! The module follows a factory pattern:
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`LLMClientFactoryTrait`] - Factory seam the runner depends on
//! - [`LLMClientFactory`] - Creates clients from a default [`Provider`],
//!   honoring per-agent model overrides
//!
//! # Example
//!
//! ```ignore
//! use handoff::llm::{LLMClientFactory, LLMClientFactoryTrait, Provider};
//!
//! let factory = LLMClientFactory::new(Provider::OpenAI {
//!     api_key: "sk-...".to_string(),
//!     api_base: "https://api.openai.com/v1".to_string(),
//!     model: "gpt-4o".to_string(),
//! });
//! let client = factory.create_for_model(Some("gpt-4o-mini")).await?;
//! let answer = client.generate_with_system("Be brief.", "What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider types.
pub mod client;
/// OpenAI-compatible Chat Completions client.
pub mod openai;

pub use client::{LLMClient, LLMClientFactory, LLMClientFactoryTrait, LLMResponse, Provider};
