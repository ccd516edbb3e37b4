//! Speech-to-text and text-to-speech models
//!
//! [`OpenAIVoice`] implements both against the OpenAI audio endpoints:
//! `POST {api_base}/audio/transcriptions` with a WAV upload, and
//! `POST {api_base}/audio/speech` returning raw 24 kHz 16-bit mono PCM.

use crate::types::{AppError, Result};
use crate::utils::config::VoiceConfig;
use crate::voice::audio::{pcm16_from_le_bytes, AudioBuffer};
use async_trait::async_trait;
use serde_json::{json, Value};

#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &AudioBuffer) -> Result<String>;
}

#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize `text` as mono 16-bit samples at the crate sample rate
    async fn synthesize(&self, text: &str) -> Result<Vec<i16>>;
}

/// OpenAI transcription + speech models
pub struct OpenAIVoice {
    http_client: reqwest::Client,
    api_key: String,
    api_base: String,
    stt_model: String,
    tts_model: String,
    voice: String,
}

impl OpenAIVoice {
    pub fn new(api_key: String, api_base: String, config: &VoiceConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            stt_model: config.stt_model.clone(),
            tts_model: config.tts_model.clone(),
            voice: config.voice.clone(),
        }
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(AppError::Voice(format!("{} failed ({}): {}", what, status, text)))
    }
}

#[async_trait]
impl SpeechToText for OpenAIVoice {
    async fn transcribe(&self, audio: &AudioBuffer) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(audio.to_wav())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| AppError::Voice(format!("Invalid upload: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.stt_model.clone())
            .part("file", part);

        let response = self
            .http_client
            .post(format!("{}/audio/transcriptions", self.api_base))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Voice(format!("Transcription request failed: {}", e)))?;

        let body: Value = Self::check(response, "Transcription")
            .await?
            .json()
            .await
            .map_err(|e| AppError::Voice(format!("Failed to parse transcription: {}", e)))?;

        body.get("text")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| AppError::Voice("Transcription response has no text".to_string()))
    }
}

#[async_trait]
impl TextToSpeech for OpenAIVoice {
    async fn synthesize(&self, text: &str) -> Result<Vec<i16>> {
        let response = self
            .http_client
            .post(format!("{}/audio/speech", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.tts_model,
                "voice": self.voice,
                "input": text,
                "response_format": "pcm"
            }))
            .send()
            .await
            .map_err(|e| AppError::Voice(format!("Speech request failed: {}", e)))?;

        let bytes = Self::check(response, "Speech synthesis")
            .await?
            .bytes()
            .await
            .map_err(|e| AppError::Voice(format!("Failed to read speech audio: {}", e)))?;

        Ok(pcm16_from_le_bytes(&bytes))
    }
}
