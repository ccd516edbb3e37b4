//! Voice processing module
//!
//! Handles:
//! - Audio buffers, WAV encoding, capture and playback seams
//! - Speech-to-text (STT) and text-to-speech (TTS)
//! - The voice pipeline around the agent workflow
//! - The listen / process / respond turn loop

pub mod audio;
pub mod device;
pub mod models;
pub mod pipeline;
pub mod session;

pub use audio::{
    samples_to_wav, AudioBuffer, AudioSink, AudioSource, MemorySink, NullSink, SilenceSource,
    SAMPLE_RATE,
};
pub use device::{open_default_io, AudioIo};
pub use models::{OpenAIVoice, SpeechToText, TextToSpeech};
pub use pipeline::{
    AudioInput, LifecycleEvent, SingleAgentVoiceWorkflow, StreamedAudioResult, VoicePipeline,
    VoicePipelineConfig, VoiceStreamEvent,
};
pub use session::{TurnReport, TurnState, VoiceSession};
