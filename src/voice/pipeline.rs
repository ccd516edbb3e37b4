//! Voice pipeline: transcription, agent workflow, speech synthesis
//!
//! One call to [`VoicePipeline::run`] processes one captured utterance and
//! returns a stream of events: lifecycle markers around the reply audio,
//! which is delivered in 100 ms chunks.

use crate::agents::{Agent, Runner};
use crate::types::{AppError, Message, Result};
use crate::utils::config::{VoiceConfig, DEFAULT_WORKFLOW_NAME, INTERACTIVE_WORKFLOW_NAME};
use crate::voice::audio::{AudioBuffer, SAMPLE_RATE};
use crate::voice::models::{SpeechToText, TextToSpeech};
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

/// Samples per audio event (100 ms)
pub const CHUNK_SAMPLES: usize = SAMPLE_RATE as usize / 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    TurnStarted,
    TurnEnded,
    SessionEnded,
}

impl LifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::TurnStarted => "turn_started",
            LifecycleEvent::TurnEnded => "turn_ended",
            LifecycleEvent::SessionEnded => "session_ended",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VoiceStreamEvent {
    Audio(Vec<i16>),
    Lifecycle(LifecycleEvent),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct VoicePipelineConfig {
    /// Name attached to the pipeline's tracing span
    pub workflow_name: String,
    /// Whether transcripts and replies may appear in logs
    pub include_sensitive_data: bool,
}

impl Default for VoicePipelineConfig {
    fn default() -> Self {
        Self::from(&VoiceConfig::default())
    }
}

impl From<&VoiceConfig> for VoicePipelineConfig {
    fn from(config: &VoiceConfig) -> Self {
        Self {
            workflow_name: config.workflow_name.clone(),
            include_sensitive_data: config.include_sensitive_data,
        }
    }
}

impl VoicePipelineConfig {
    /// Pipeline settings for a session; a continuous session left on the
    /// default workflow name is reported as the interactive workflow
    pub fn for_session(config: &VoiceConfig, continuous: bool) -> Self {
        let mut pipeline = Self::from(config);
        if continuous && config.workflow_name == DEFAULT_WORKFLOW_NAME {
            pipeline.workflow_name = INTERACTIVE_WORKFLOW_NAME.to_string();
        }
        pipeline
    }
}

/// Captured audio handed to the pipeline
#[derive(Debug, Clone)]
pub struct AudioInput {
    buffer: AudioBuffer,
}

impl AudioInput {
    pub fn new(buffer: AudioBuffer) -> Self {
        Self { buffer }
    }

    pub fn buffer(&self) -> &AudioBuffer {
        &self.buffer
    }
}

struct WorkflowState {
    current_agent: Arc<Agent>,
    history: Vec<Message>,
}

/// Runs each transcription through the agents, keeping the conversation
///
/// After a handoff the next turn starts at the agent that answered last.
pub struct SingleAgentVoiceWorkflow {
    runner: Runner,
    state: Mutex<WorkflowState>,
}

impl SingleAgentVoiceWorkflow {
    pub fn new(runner: Runner, agent: Arc<Agent>) -> Self {
        Self {
            runner,
            state: Mutex::new(WorkflowState {
                current_agent: agent,
                history: Vec::new(),
            }),
        }
    }

    pub fn current_agent(&self) -> Arc<Agent> {
        Arc::clone(&self.state.lock().current_agent)
    }

    pub fn history(&self) -> Vec<Message> {
        self.state.lock().history.clone()
    }

    /// Reply text for one transcription
    pub async fn run(&self, transcription: &str) -> Result<String> {
        let (agent, mut history) = {
            let state = self.state.lock();
            (Arc::clone(&state.current_agent), state.history.clone())
        };
        history.push(Message::user(transcription));

        let result = self.runner.run_with_history(&agent, history).await?;

        let mut state = self.state.lock();
        state.history = result.to_input_list();
        state.current_agent = Arc::clone(&result.last_agent);
        Ok(result.final_output)
    }
}

/// Event stream for one processed utterance
pub struct StreamedAudioResult {
    stream: BoxStream<'static, VoiceStreamEvent>,
}

impl StreamedAudioResult {
    pub fn into_stream(self) -> BoxStream<'static, VoiceStreamEvent> {
        self.stream
    }

    pub async fn collect(self) -> Vec<VoiceStreamEvent> {
        self.stream.collect().await
    }
}

pub struct VoicePipeline {
    workflow: Arc<SingleAgentVoiceWorkflow>,
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    config: VoicePipelineConfig,
}

impl VoicePipeline {
    pub fn new(
        workflow: SingleAgentVoiceWorkflow,
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
        config: VoicePipelineConfig,
    ) -> Self {
        Self {
            workflow: Arc::new(workflow),
            stt,
            tts,
            config,
        }
    }

    pub fn workflow(&self) -> &SingleAgentVoiceWorkflow {
        &self.workflow
    }

    pub fn config(&self) -> &VoicePipelineConfig {
        &self.config
    }

    /// Process one utterance. Failures inside the turn arrive as
    /// [`VoiceStreamEvent::Error`]; only an empty input fails up front.
    pub fn run(&self, input: AudioInput) -> Result<StreamedAudioResult> {
        if input.buffer.is_empty() {
            return Err(AppError::InvalidInput("Audio input is empty".to_string()));
        }

        let workflow = Arc::clone(&self.workflow);
        let stt = Arc::clone(&self.stt);
        let tts = Arc::clone(&self.tts);
        let config = self.config.clone();
        let span = tracing::info_span!(
            "voice_turn",
            workflow = %config.workflow_name,
            turn_id = %Uuid::new_v4()
        );

        let stream = async_stream::stream! {
            let reply = process_turn(&*stt, &workflow, &*tts, &config, &input.buffer)
                .instrument(span)
                .await;

            match reply {
                Ok(audio) => {
                    yield VoiceStreamEvent::Lifecycle(LifecycleEvent::TurnStarted);
                    for chunk in audio.chunks(CHUNK_SAMPLES) {
                        yield VoiceStreamEvent::Audio(chunk.to_vec());
                    }
                    yield VoiceStreamEvent::Lifecycle(LifecycleEvent::TurnEnded);
                }
                Err(e) => yield VoiceStreamEvent::Error(e.to_string()),
            }
            yield VoiceStreamEvent::Lifecycle(LifecycleEvent::SessionEnded);
        };

        Ok(StreamedAudioResult {
            stream: stream.boxed(),
        })
    }
}

async fn process_turn(
    stt: &dyn SpeechToText,
    workflow: &SingleAgentVoiceWorkflow,
    tts: &dyn TextToSpeech,
    config: &VoicePipelineConfig,
    buffer: &AudioBuffer,
) -> Result<Vec<i16>> {
    let transcript = stt.transcribe(buffer).await?;
    if config.include_sensitive_data {
        debug!(transcript = %transcript, "Transcribed input");
    } else {
        debug!(chars = transcript.len(), "Transcribed input");
    }

    let reply = workflow.run(&transcript).await?;
    if config.include_sensitive_data {
        debug!(reply = %reply, "Agent reply");
    }

    let audio = tts.synthesize(&reply).await?;
    info!(samples = audio.len(), "Synthesized reply");
    Ok(audio)
}
