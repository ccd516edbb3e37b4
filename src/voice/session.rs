//! Voice turn loop: listen, process, respond, repeat

use crate::cli::output::Output;
use crate::types::Result;
use crate::voice::audio::{AudioSink, AudioSource};
use crate::voice::pipeline::{AudioInput, LifecycleEvent, VoicePipeline, VoiceStreamEvent};
use futures::StreamExt;
use std::future::Future;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Listening,
    Processing,
    Responding,
    Idle,
}

/// What happened during one turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    pub samples_played: usize,
    pub lifecycle: Vec<LifecycleEvent>,
    pub errors: Vec<String>,
}

pub struct VoiceSession {
    pipeline: VoicePipeline,
    source: Box<dyn AudioSource>,
    sink: Box<dyn AudioSink>,
    output: Output,
    state: TurnState,
}

impl VoiceSession {
    pub fn new(
        pipeline: VoicePipeline,
        source: Box<dyn AudioSource>,
        sink: Box<dyn AudioSink>,
        output: Output,
    ) -> Self {
        Self {
            pipeline,
            source,
            sink,
            output,
            state: TurnState::Idle,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn pipeline(&self) -> &VoicePipeline {
        &self.pipeline
    }

    /// Capture one utterance and play the reply
    pub async fn run_turn(&mut self) -> Result<TurnReport> {
        self.state = TurnState::Listening;
        self.output
            .info(&format!("\nListening ({})...", self.source.describe()));
        let buffer = self.source.capture().await?;

        self.state = TurnState::Processing;
        self.output.info("Processing audio input...");
        let result = self.pipeline.run(AudioInput::new(buffer))?;

        self.state = TurnState::Responding;
        self.sink.start()?;
        self.output.info("Agent is responding...");

        let mut report = TurnReport::default();
        let mut events = result.into_stream();
        while let Some(event) = events.next().await {
            match event {
                VoiceStreamEvent::Audio(chunk) => {
                    self.sink.write(&chunk)?;
                    report.samples_played += chunk.len();
                }
                VoiceStreamEvent::Lifecycle(event) => {
                    self.print_lifecycle(event);
                    report.lifecycle.push(event);
                }
                VoiceStreamEvent::Error(message) => {
                    self.output.error(&format!("Error: {}", message));
                    report.errors.push(message);
                }
            }
        }
        self.sink.stop()?;

        self.state = TurnState::Idle;
        info!(
            samples = report.samples_played,
            errors = report.errors.len(),
            "Voice turn finished"
        );
        Ok(report)
    }

    /// Run turns until `shutdown` resolves; returns the number of completed turns
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<usize>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut turns = 0;

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!(turns, "Voice session interrupted");
                    break;
                }
                report = self.run_turn() => {
                    report?;
                    turns += 1;
                    self.output.hint("\nReady for next question. Press Ctrl+C to exit.");
                }
            }
        }

        self.sink.stop()?;
        self.state = TurnState::Idle;
        Ok(turns)
    }

    fn print_lifecycle(&self, event: LifecycleEvent) {
        self.output.hint(&format!("Lifecycle event: {}", event.as_str()));
        let message = match event {
            LifecycleEvent::TurnStarted => "Agent started speaking.",
            LifecycleEvent::TurnEnded => "Agent finished speaking.",
            LifecycleEvent::SessionEnded => "Session ended.",
        };
        self.output.info(message);
    }
}
