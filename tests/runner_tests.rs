//! Integration tests for the agent run loop
//!
//! These tests drive the triage / French / web search agents with a scripted
//! model and verify:
//! - Direct answers from the triage agent
//! - Handoffs switching the active agent, its instructions and tools
//! - Function tool output fed back to the model
//! - Error paths (unknown tools, failing tools, max turns, model failures)

mod common;

use common::mocks::{MockLLMClient, MockLLMFactory};
use handoff::agents::{AgentSet, RequestHandler, RunItem, Runner, TriageSession};
use handoff::llm::LLMResponse;
use handoff::tools::SearchTool;
use handoff::types::{AppError, MessageRole, ToolCall};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TO_FRENCH: &str = "transfer_to_french_translation_agent";
const TO_WEB_SEARCH: &str = "transfer_to_web_search_agent";

fn offline_agents() -> AgentSet {
    AgentSet::text(Arc::new(SearchTool::with_base_url("http://127.0.0.1:9")))
}

fn runner(client: &MockLLMClient) -> Runner {
    Runner::new(Arc::new(MockLLMFactory::new(client.clone())))
}

#[tokio::test]
async fn test_triage_answers_directly() {
    let client = MockLLMClient::new("Hello! How can I help?");
    let agents = offline_agents();

    let result = runner(&client).run(&agents.triage, "Hi").await.unwrap();

    assert_eq!(result.final_output, "Hello! How can I help?");
    assert!(Arc::ptr_eq(&result.last_agent, &agents.triage));
    assert_eq!(result.turns, 1);
    assert!(result.handoffs().is_empty());

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system(), agents.triage.instructions());
    assert_eq!(requests[0].messages[1].content, "Hi");

    let mut tools = requests[0].tool_names();
    tools.sort();
    assert_eq!(tools, vec![TO_FRENCH, TO_WEB_SEARCH]);
}

#[tokio::test]
async fn test_handoff_to_french_agent() {
    let client = MockLLMClient::scripted(vec![
        MockLLMClient::handoff(TO_FRENCH),
        LLMResponse::text("Bonjour, comment allez-vous aujourd'hui ?"),
    ]);
    let agents = offline_agents();

    let result = runner(&client)
        .run(&agents.triage, "Translate 'Hello, how are you today?' to French")
        .await
        .unwrap();

    assert_eq!(result.final_output, "Bonjour, comment allez-vous aujourd'hui ?");
    assert!(Arc::ptr_eq(&result.last_agent, &agents.french));
    assert_eq!(
        result.handoffs(),
        vec![("Triage Agent", "French Translation Agent")]
    );

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].system(), agents.french.instructions());
    assert!(requests[1].tools.is_empty());

    // The handoff call is answered with the target's name
    let tool_reply = requests[1]
        .messages
        .iter()
        .find(|m| m.role == MessageRole::Tool)
        .unwrap();
    assert_eq!(tool_reply.tool_call_id.as_deref(), Some("call_transfer_to_french_translation_agent"));
    let payload: serde_json::Value = serde_json::from_str(&tool_reply.content).unwrap();
    assert_eq!(payload, json!({ "assistant": "French Translation Agent" }));
}

#[tokio::test]
async fn test_web_search_tool_output_is_fed_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "capital of France"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Abstract": "Paris is the capital and largest city of France.",
            "RelatedTopics": [{ "Text": "Paris - Wikipedia" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agents = AgentSet::text(Arc::new(SearchTool::with_base_url(server.uri())));
    let client = MockLLMClient::scripted(vec![
        MockLLMClient::handoff(TO_WEB_SEARCH),
        MockLLMClient::tool_call("call_search", "search_web", json!({ "query": "capital of France" })),
        LLMResponse::text("The capital of France is Paris."),
    ]);

    let result = runner(&client)
        .run(&agents.triage, "What is the capital city of France?")
        .await
        .unwrap();

    assert_eq!(result.final_output, "The capital of France is Paris.");
    assert!(Arc::ptr_eq(&result.last_agent, &agents.web_search));
    assert_eq!(result.turns, 3);

    let output = result
        .items
        .iter()
        .find_map(|item| match item {
            RunItem::ToolOutput { name, output, .. } if name == "search_web" => Some(output.clone()),
            _ => None,
        })
        .unwrap();
    assert!(output.contains("Abstract: Paris is the capital and largest city of France."));

    let requests = client.requests();
    assert_eq!(requests[1].tool_names(), vec!["search_web"]);
    let last = requests[2].messages.last().unwrap();
    assert_eq!(last.role, MessageRole::Tool);
    assert_eq!(last.content, output);
}

#[tokio::test]
async fn test_tool_error_is_reported_to_model() {
    let client = MockLLMClient::scripted(vec![
        MockLLMClient::handoff(TO_WEB_SEARCH),
        MockLLMClient::tool_call("call_bad", "search_web", json!({})),
        LLMResponse::text("Sorry, I could not search."),
    ]);
    let agents = offline_agents();

    let result = runner(&client).run(&agents.triage, "search").await.unwrap();
    assert_eq!(result.final_output, "Sorry, I could not search.");

    let requests = client.requests();
    let reply = requests[2].messages.last().unwrap();
    assert!(reply
        .content
        .starts_with("An error occurred while running the tool. Please try again. Error:"));
    assert!(reply.content.contains("Missing 'query' parameter"));
}

#[tokio::test]
async fn test_unknown_tool_is_model_behavior_error() {
    let client = MockLLMClient::scripted(vec![MockLLMClient::tool_call(
        "call_1",
        "search_web",
        json!({ "query": "rust" }),
    )]);
    let agents = offline_agents();

    // The triage agent has no function tools of its own
    let err = runner(&client).run(&agents.triage, "hi").await.unwrap_err();
    assert!(matches!(err, AppError::ModelBehavior(_)));
    assert!(err.to_string().contains("search_web"));
}

#[tokio::test]
async fn test_max_turns_exceeded() {
    let agents = offline_agents();
    let client = MockLLMClient::scripted(vec![
        MockLLMClient::handoff(TO_WEB_SEARCH),
        MockLLMClient::tool_call("c1", "search_web", json!({ "query": "a" })),
        MockLLMClient::tool_call("c2", "search_web", json!({ "query": "b" })),
        LLMResponse::text("never reached"),
    ]);

    let err = runner(&client)
        .with_max_turns(3)
        .run(&agents.triage, "loop")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MaxTurnsExceeded(3)));
    assert_eq!(client.requests().len(), 3);
    assert_eq!(client.remaining(), 1);
}

#[tokio::test]
async fn test_only_first_of_multiple_handoffs_is_taken() {
    let client = MockLLMClient::scripted(vec![
        LLMResponse::tool_calls(vec![
            ToolCall {
                id: "a".to_string(),
                name: TO_FRENCH.to_string(),
                arguments: json!({}),
            },
            ToolCall {
                id: "b".to_string(),
                name: TO_WEB_SEARCH.to_string(),
                arguments: json!({}),
            },
        ]),
        LLMResponse::text("Salut !"),
    ]);
    let agents = offline_agents();

    let result = runner(&client).run(&agents.triage, "hi").await.unwrap();
    assert!(Arc::ptr_eq(&result.last_agent, &agents.french));
    assert_eq!(result.handoffs().len(), 1);

    let requests = client.requests();
    let ignored = requests[1]
        .messages
        .iter()
        .find(|m| m.tool_call_id.as_deref() == Some("b"))
        .unwrap();
    assert_eq!(ignored.content, "Multiple handoffs detected, ignoring this one.");
}

#[tokio::test]
async fn test_model_failure_propagates() {
    let client = MockLLMClient::failing();
    let agents = offline_agents();

    let err = runner(&client).run(&agents.triage, "hi").await.unwrap_err();
    assert!(matches!(err, AppError::LLM(_)));
}

#[tokio::test]
async fn test_voice_agents_request_their_model() {
    let client = MockLLMClient::scripted(vec![
        MockLLMClient::handoff(TO_FRENCH),
        LLMResponse::text("Bonjour"),
    ]);
    let agents = AgentSet::voice("gpt-4o-mini", Arc::new(SearchTool::with_base_url("http://127.0.0.1:9")));

    runner(&client).run(&agents.triage, "hello").await.unwrap();

    assert!(client
        .requests()
        .iter()
        .all(|r| r.model == "gpt-4o-mini"));
}

#[tokio::test]
async fn test_history_carries_into_next_run() {
    let client = MockLLMClient::scripted(vec![
        LLMResponse::text("I am the triage agent."),
        LLMResponse::text("You asked who I am."),
    ]);
    let agents = offline_agents();
    let runner = runner(&client);

    let first = runner.run(&agents.triage, "Who are you?").await.unwrap();
    let mut history = first.to_input_list();
    history.push(handoff::types::Message::user("What did I ask?"));

    let second = runner
        .run_with_history(&first.last_agent, history)
        .await
        .unwrap();
    assert_eq!(second.final_output, "You asked who I am.");

    let requests = client.requests();
    // system + user + assistant + user
    assert_eq!(requests[1].messages.len(), 4);
    assert_eq!(requests[1].messages[2].content, "I am the triage agent.");
    assert_ne!(first.run_id, second.run_id);
}

#[tokio::test]
async fn test_triage_session_returns_final_output() {
    let client = MockLLMClient::scripted(vec![
        MockLLMClient::handoff(TO_FRENCH),
        LLMResponse::text("J'aime l'intelligence artificielle"),
    ]);
    let agents = offline_agents();
    let session = TriageSession::new(runner(&client), Arc::clone(&agents.triage));

    let reply = session
        .handle("How do you say 'I love artificial intelligence' in French?")
        .await
        .unwrap();
    assert_eq!(reply, "J'aime l'intelligence artificielle");
}
