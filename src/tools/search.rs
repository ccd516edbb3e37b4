//! Web search tool backed by the DuckDuckGo Instant Answer API
//!
//! The tool never fails on a bad request: network and parse errors are
//! reported to the model inline as `Error searching the web: ...`.

use crate::tools::registry::Tool;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Public Instant Answer endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://api.duckduckgo.com";

/// Number of related topics included in a result
pub const DEFAULT_MAX_TOPICS: usize = 5;

/// Web search tool
pub struct SearchTool {
    http_client: reqwest::Client,
    base_url: String,
    max_topics: usize,
}

impl SearchTool {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_SEARCH_URL)
    }

    /// Point the tool at a different (e.g. mock) endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            max_topics: DEFAULT_MAX_TOPICS,
        }
    }

    pub fn max_topics(mut self, max_topics: usize) -> Self {
        self.max_topics = max_topics;
        self
    }

    /// Run one search and render it as text
    pub async fn search(&self, query: &str) -> String {
        match self.fetch(query).await {
            Ok(data) => format_search_results(query, &data, self.max_topics),
            Err(e) => {
                tracing::warn!(query, error = %e, "Web search failed");
                format!("Error searching the web: {}", e)
            }
        }
    }

    async fn fetch(&self, query: &str) -> std::result::Result<Value, reqwest::Error> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await?;

        response.json::<Value>().await
    }
}

impl Default for SearchTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an Instant Answer body.
///
/// Topics past `max_topics` are dropped. Entries without a `Text` field (topic
/// groups) keep their slot and number but print nothing.
pub fn format_search_results(query: &str, data: &Value, max_topics: usize) -> String {
    let mut result = format!("Search results for: {}\n\n", query);

    if let Some(abstract_text) = data.get("Abstract").and_then(|v| v.as_str()) {
        if !abstract_text.is_empty() {
            result.push_str(&format!("Abstract: {}\n\n", abstract_text));
        }
    }

    if let Some(topics) = data.get("RelatedTopics").and_then(|v| v.as_array()) {
        if !topics.is_empty() {
            result.push_str("Related information:\n");
            for (i, topic) in topics.iter().take(max_topics).enumerate() {
                if let Some(text) = topic.get("Text").and_then(|v| v.as_str()) {
                    result.push_str(&format!("{}. {}\n", i + 1, text));
                }
            }
        }
    }

    result
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search_web"
    }

    fn description(&self) -> &str {
        "Search the web for information on a query."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::InvalidInput("Missing 'query' parameter".to_string()))?;

        Ok(Value::String(self.search(query).await))
    }
}
