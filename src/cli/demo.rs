//! Scripted demo over a fixed set of queries

use crate::agents::RequestHandler;
use crate::cli::output::Output;
use std::time::Duration;

pub const TEST_QUERIES: [&str; 5] = [
    "Translate 'Hello, how are you today?' to French",
    "What are the latest developments in AI technology?",
    "What is the capital city of France?",
    "How do you say 'I love artificial intelligence' in French?",
    "Who is the current CEO of OpenAI?",
];

/// Outcome of one demo query
#[derive(Debug, Clone, PartialEq)]
pub struct DemoOutcome {
    pub query: String,
    pub result: std::result::Result<String, String>,
}

/// Run `queries` in order through `handler`, pausing `delay` between them.
///
/// A failing query is reported and the demo moves on.
pub async fn run_demo(
    handler: &dyn RequestHandler,
    queries: &[&str],
    delay: Duration,
    output: &Output,
) -> Vec<DemoOutcome> {
    let mut outcomes = Vec::with_capacity(queries.len());

    for (i, query) in queries.iter().enumerate() {
        output.info(&format!("\nTest Query #{}: {}", i + 1, query));
        output.rule('-');
        output.info("Processing...");

        let result = match handler.handle(query).await {
            Ok(response) => {
                output.agent_response(&response);
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Demo query failed");
                output.error(&format!("An error occurred: {}", e));
                Err(e.to_string())
            }
        };
        outcomes.push(DemoOutcome {
            query: query.to_string(),
            result,
        });

        output.rule('=');
        if i + 1 < queries.len() {
            output.hint(&format!("Next query in {} seconds...", delay.as_secs()));
            tokio::time::sleep(delay).await;
        }
    }

    output.success("Demo completed. All test queries have been processed.");
    outcomes
}
