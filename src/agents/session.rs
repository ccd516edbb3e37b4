use crate::agents::agent::Agent;
use crate::agents::runner::Runner;
use crate::types::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns one line of user input into one reply
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, input: &str) -> Result<String>;
}

/// Text session: every input starts a fresh run at the triage agent
pub struct TriageSession {
    runner: Runner,
    entry: Arc<Agent>,
}

impl TriageSession {
    pub fn new(runner: Runner, entry: Arc<Agent>) -> Self {
        Self { runner, entry }
    }

    pub fn entry_agent(&self) -> &Arc<Agent> {
        &self.entry
    }
}

#[async_trait]
impl RequestHandler for TriageSession {
    async fn handle(&self, input: &str) -> Result<String> {
        let result = self.runner.run(&self.entry, input).await?;
        Ok(result.final_output)
    }
}
