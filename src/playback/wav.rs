//! WAV playback through the default output device.

use crate::error::{Result, VoxboxError};
use crate::playback::Player;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::Sender;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Plays the reply WAV file on the default cpal output device.
///
/// Blocks until the sample buffer is drained, then fires the finish
/// notification. The finish fires after failed attempts too, so the reply
/// flags always resolve.
pub struct WavPlayer {
    finish_tx: Sender<()>,
}

impl WavPlayer {
    pub fn new(finish_tx: Sender<()>) -> Self {
        Self { finish_tx }
    }

    fn play_inner(&self, path: &Path) -> Result<()> {
        let (samples, sample_rate) = read_wav_mono(path)?;
        if samples.is_empty() {
            tracing::debug!(path = %path.display(), "empty reply file, nothing to play");
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| playback_err(path, "no output device available"))?;
        let config = device
            .default_output_config()
            .map_err(|e| playback_err(path, &e.to_string()))?;
        let channels = config.channels() as usize;
        let device_rate = config.sample_rate().0;
        let config: cpal::StreamConfig = config.into();

        // Nearest-sample resample to the device rate; good enough for speech.
        let samples = resample(&samples, sample_rate, device_rate);
        let duration_ms = samples.len() as u64 * 1000 / u64::from(device_rate);

        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let cb_samples = Arc::clone(&samples);
        let cb_position = Arc::clone(&position);
        let cb_finished = Arc::clone(&finished);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let pos = cb_position.load(Ordering::Relaxed);
                        let sample = if pos < cb_samples.len() {
                            cb_position.store(pos + 1, Ordering::Relaxed);
                            cb_samples[pos]
                        } else {
                            cb_finished.store(true, Ordering::Release);
                            0.0
                        };
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                },
                |err| {
                    tracing::error!(error = %err, "output stream error");
                },
                None,
            )
            .map_err(|e| playback_err(path, &e.to_string()))?;

        stream.play().map_err(|e| playback_err(path, &e.to_string()))?;

        // Wait for the callback to drain the buffer, with a safety margin.
        let deadline = Instant::now() + Duration::from_millis(duration_ms + 500);
        while !finished.load(Ordering::Acquire) {
            if Instant::now() > deadline {
                tracing::warn!(path = %path.display(), "playback drain timed out");
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        drop(stream);

        tracing::debug!(path = %path.display(), duration_ms, "playback complete");
        Ok(())
    }
}

impl Player for WavPlayer {
    fn play(&self, path: &Path) -> Result<()> {
        let result = self.play_inner(path);
        // Finish fires on every attempt so the reply flags always resolve.
        let _ = self.finish_tx.send(());
        result
    }

    fn name(&self) -> &'static str {
        "wav"
    }
}

fn playback_err(path: &Path, message: &str) -> VoxboxError {
    VoxboxError::Playback {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Read a WAV file as mono f32 samples, averaging channels.
fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path).map_err(|e| playback_err(path, &e.to_string()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| playback_err(path, &e.to_string()))?,
        hound::SampleFormat::Int => {
            let max = f32::from(i16::MAX);
            reader
                .samples::<i16>()
                .map(|s| s.map(|v| f32::from(v) / max))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| playback_err(path, &e.to_string()))?
        }
    };

    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();
    Ok((mono, spec.sample_rate))
}

/// Nearest-sample rate conversion.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }
    let out_len = (samples.len() as u64 * u64::from(to_rate) / u64::from(from_rate)) as usize;
    (0..out_len)
        .map(|i| {
            let src = i as u64 * u64::from(from_rate) / u64::from(to_rate);
            samples[(src as usize).min(samples.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_identity_when_rates_match() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&samples, 16000, 16000), samples);
    }

    #[test]
    fn resample_doubles_length_for_double_rate() {
        let samples = vec![0.0, 1.0];
        let out = resample(&samples, 8000, 16000);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn missing_file_fires_finish_and_errors() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let player = WavPlayer::new(tx);
        let result = player.play(Path::new("/nonexistent/reply.wav"));
        assert!(result.is_err());
        assert_eq!(rx.try_iter().count(), 1);
    }
}
