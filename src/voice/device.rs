//! Audio device selection
//!
//! With the `audio-device` feature the default input and output devices are
//! driven through cpal. Without it (or without a microphone) a voice session
//! runs one turn on synthetic silence and discards the reply audio.

use crate::types::Result;
use crate::utils::config::VoiceConfig;
use crate::voice::audio::{AudioSink, AudioSource, NullSink, SilenceSource};

#[cfg(feature = "audio-device")]
pub use self::cpal_io::{input_available, Microphone, Speaker};

/// Source/sink pair for a voice session
pub struct AudioIo {
    pub source: Box<dyn AudioSource>,
    pub sink: Box<dyn AudioSink>,
    /// Whether turns should repeat until interrupted
    pub continuous: bool,
}

/// Pick the best available audio I/O. `once` forces a single turn.
pub fn open_default_io(config: &VoiceConfig, once: bool) -> Result<AudioIo> {
    #[cfg(feature = "audio-device")]
    {
        if input_available() {
            tracing::info!("Using default input and output devices");
            return Ok(AudioIo {
                source: Box::new(Microphone::new(config.record_seconds)),
                sink: Box::new(Speaker::new()),
                continuous: !once,
            });
        }
        tracing::warn!("No input device found, falling back to silence");
    }

    #[cfg(not(feature = "audio-device"))]
    tracing::info!(
        once,
        "Built without audio-device support, using silence and discarding playback"
    );

    Ok(AudioIo {
        source: Box::new(SilenceSource::new(config.silence_seconds)),
        sink: Box::new(NullSink),
        continuous: false,
    })
}

#[cfg(any(feature = "audio-device", test))]
mod drain {
    use crate::voice::audio::SAMPLE_RATE;
    use std::time::{Duration, Instant};

    const DRAIN_MARGIN: Duration = Duration::from_millis(500);
    const DRAIN_POLL: Duration = Duration::from_millis(20);

    /// Time allowed for `queued` samples to play out
    pub fn drain_deadline(queued: usize) -> Duration {
        Duration::from_secs_f64(queued as f64 / f64::from(SAMPLE_RATE)) + DRAIN_MARGIN
    }

    /// Poll until `remaining` reports zero or `deadline` passes. Returns
    /// whether the queue drained.
    pub fn wait_for_drain(remaining: impl Fn() -> usize, deadline: Duration) -> bool {
        let start = Instant::now();
        loop {
            if remaining() == 0 {
                return true;
            }
            if start.elapsed() >= deadline {
                return false;
            }
            std::thread::sleep(DRAIN_POLL);
        }
    }

    /// Run blocking work without stalling other tasks on a multi-thread runtime
    pub fn block_off_runtime<T>(work: impl FnOnce() -> T) -> T {
        use tokio::runtime::{Handle, RuntimeFlavor};
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(work)
            }
            _ => work(),
        }
    }
}

#[cfg(any(feature = "audio-device", test))]
use self::drain::{block_off_runtime, drain_deadline, wait_for_drain};

#[cfg(feature = "audio-device")]
mod cpal_io {
    use super::{block_off_runtime, drain_deadline, wait_for_drain};
    use crate::types::{AppError, Result};
    use crate::voice::audio::{AudioBuffer, AudioSink, AudioSource, CHANNELS, SAMPLE_RATE};
    use async_trait::async_trait;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;

    fn stream_config() -> cpal::StreamConfig {
        cpal::StreamConfig {
            channels: CHANNELS,
            sample_rate: cpal::SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        }
    }

    pub fn input_available() -> bool {
        cpal::default_host().default_input_device().is_some()
    }

    /// Fixed-duration recording from the default input device
    pub struct Microphone {
        seconds: u32,
    }

    impl Microphone {
        pub fn new(seconds: u32) -> Self {
            Self { seconds }
        }
    }

    #[async_trait]
    impl AudioSource for Microphone {
        async fn capture(&mut self) -> Result<AudioBuffer> {
            let seconds = self.seconds;
            tokio::task::spawn_blocking(move || record(seconds))
                .await
                .map_err(|e| AppError::Audio(format!("Capture task failed: {}", e)))?
        }

        fn describe(&self) -> String {
            format!("microphone ({} second turns)", self.seconds)
        }
    }

    fn record(seconds: u32) -> Result<AudioBuffer> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| AppError::Audio("No default input device".to_string()))?;

        let expected = SAMPLE_RATE as usize * seconds as usize;
        let captured = Arc::new(Mutex::new(Vec::with_capacity(expected)));
        let writer = Arc::clone(&captured);

        let stream = device
            .build_input_stream(
                &stream_config(),
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    writer.lock().extend_from_slice(data);
                },
                |err| tracing::error!(error = %err, "Input stream error"),
                None,
            )
            .map_err(|e| AppError::Audio(format!("Failed to open input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| AppError::Audio(format!("Failed to start recording: {}", e)))?;
        std::thread::sleep(Duration::from_secs(u64::from(seconds)));
        drop(stream);

        let mut samples = std::mem::take(&mut *captured.lock());
        samples.truncate(expected);
        tracing::debug!(samples = samples.len(), "Recorded audio");
        Ok(AudioBuffer::new(samples))
    }

    /// Plays audio on the default output device
    pub struct Speaker {
        queue: Arc<Mutex<VecDeque<i16>>>,
        stream: Option<cpal::Stream>,
    }

    impl Speaker {
        pub fn new() -> Self {
            Self {
                queue: Arc::new(Mutex::new(VecDeque::new())),
                stream: None,
            }
        }
    }

    impl Default for Speaker {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioSink for Speaker {
        fn start(&mut self) -> Result<()> {
            if self.stream.is_some() {
                return Ok(());
            }

            let device = cpal::default_host()
                .default_output_device()
                .ok_or_else(|| AppError::Audio("No default output device".to_string()))?;

            let queue = Arc::clone(&self.queue);
            let stream = device
                .build_output_stream(
                    &stream_config(),
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                        let mut queue = queue.lock();
                        for sample in data.iter_mut() {
                            *sample = queue.pop_front().unwrap_or(0);
                        }
                    },
                    |err| tracing::error!(error = %err, "Output stream error"),
                    None,
                )
                .map_err(|e| AppError::Audio(format!("Failed to open output stream: {}", e)))?;

            stream
                .play()
                .map_err(|e| AppError::Audio(format!("Failed to start playback: {}", e)))?;
            self.stream = Some(stream);
            Ok(())
        }

        fn write(&mut self, samples: &[i16]) -> Result<()> {
            self.queue.lock().extend(samples.iter().copied());
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            if self.stream.is_none() {
                return Ok(());
            }

            // Let the callback drain what is queued before closing the device
            let deadline = drain_deadline(self.queue.lock().len());
            let queue = Arc::clone(&self.queue);
            let drained = block_off_runtime(|| wait_for_drain(|| queue.lock().len(), deadline));
            if !drained {
                let mut queue = self.queue.lock();
                tracing::warn!(
                    discarded = queue.len(),
                    ?deadline,
                    "Playback did not drain in time, discarding queued audio"
                );
                queue.clear();
            }
            self.stream = None;
            Ok(())
        }
    }
}
