//! Audio buffers, WAV encoding and the source/sink seams
//!
//! All audio in the crate is 16-bit signed PCM, mono, at [`SAMPLE_RATE`].

use crate::types::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Sample rate used for capture, transcription uploads and playback
pub const SAMPLE_RATE: u32 = 24_000;

/// Mono
pub const CHANNELS: u16 = 1;

/// A block of captured or synthesized audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<i16>) -> Self {
        Self {
            samples,
            sample_rate: SAMPLE_RATE,
            channels: CHANNELS,
        }
    }

    /// `seconds` of digital silence
    pub fn silence(seconds: u32) -> Self {
        Self::new(vec![0; SAMPLE_RATE as usize * seconds as usize])
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() as u64 / u64::from(self.channels.max(1));
        Duration::from_millis(frames * 1000 / u64::from(self.sample_rate))
    }

    /// WAV file bytes for this buffer
    pub fn to_wav(&self) -> Vec<u8> {
        samples_to_wav(&self.samples, self.sample_rate, self.channels)
    }
}

/// Encode 16-bit PCM samples as a WAV file
pub fn samples_to_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let block_align = channels * bits_per_sample / 8;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_len = (samples.len() * 2) as u32;

    let mut wav = Vec::with_capacity(44 + samples.len() * 2);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

/// Decode raw little-endian 16-bit PCM; a trailing odd byte is dropped
pub fn pcm16_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Where a voice turn's input comes from
#[async_trait]
pub trait AudioSource: Send {
    /// Record one utterance
    async fn capture(&mut self) -> Result<AudioBuffer>;

    /// Human-readable description for the console
    fn describe(&self) -> String;
}

/// Where synthesized audio goes
///
/// Not `Send`: device streams are tied to the thread that opened them.
pub trait AudioSink {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, samples: &[i16]) -> Result<()>;

    /// Flush pending audio and release the output
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Produces a fixed stretch of silence every turn
#[derive(Debug, Clone)]
pub struct SilenceSource {
    seconds: u32,
}

impl SilenceSource {
    pub fn new(seconds: u32) -> Self {
        Self { seconds }
    }
}

#[async_trait]
impl AudioSource for SilenceSource {
    async fn capture(&mut self) -> Result<AudioBuffer> {
        Ok(AudioBuffer::silence(self.seconds))
    }

    fn describe(&self) -> String {
        format!("{} seconds of silence", self.seconds)
    }
}

/// Collects everything written to it
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    samples: Arc<Mutex<Vec<i16>>>,
    active: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the collected samples, usable after the sink is boxed
    pub fn handle(&self) -> Arc<Mutex<Vec<i16>>> {
        Arc::clone(&self.samples)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl AudioSink for MemorySink {
    fn start(&mut self) -> Result<()> {
        self.active = true;
        Ok(())
    }

    fn write(&mut self, samples: &[i16]) -> Result<()> {
        self.samples.lock().extend_from_slice(samples);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.active = false;
        Ok(())
    }
}

/// Discards audio
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn write(&mut self, _samples: &[i16]) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_length_and_sample_type() {
        let buffer = AudioBuffer::silence(3);
        assert_eq!(buffer.len(), SAMPLE_RATE as usize * 3);
        assert!(buffer.samples().iter().all(|&s| s == 0));

        let first: i16 = buffer.samples()[0];
        assert_eq!(std::mem::size_of_val(&first), 2);
    }

    #[test]
    fn test_duration() {
        assert_eq!(AudioBuffer::silence(3).duration(), Duration::from_secs(3));
        assert_eq!(AudioBuffer::new(vec![0; 2400]).duration(), Duration::from_millis(100));
    }

    #[test]
    fn test_wav_header() {
        let wav = samples_to_wav(&[1, -1], SAMPLE_RATE, CHANNELS);

        assert_eq!(wav.len(), 48);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 40);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(
            u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]),
            SAMPLE_RATE
        );
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(&wav[44..48], &[1, 0, 0xff, 0xff]);
    }

    #[test]
    fn test_pcm_decoding_drops_odd_byte() {
        let samples = pcm16_from_le_bytes(&[0x01, 0x00, 0xff, 0x7f, 0x09]);
        assert_eq!(samples, vec![1, i16::MAX]);
    }

    #[tokio::test]
    async fn test_silence_source() {
        let mut source = SilenceSource::new(3);
        let buffer = source.capture().await.unwrap();
        assert_eq!(buffer.len(), 72_000);
        assert_eq!(source.describe(), "3 seconds of silence");
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::new();
        let handle = sink.handle();

        sink.start().unwrap();
        assert!(sink.is_active());
        sink.write(&[1, 2]).unwrap();
        sink.write(&[3]).unwrap();
        sink.stop().unwrap();

        assert!(!sink.is_active());
        assert_eq!(*handle.lock(), vec![1, 2, 3]);
    }
}
