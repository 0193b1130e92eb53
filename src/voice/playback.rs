//! Audio playback for synthesized speech
//!
//! One manager, three strategies chosen at configuration time: play on the
//! local output device, hand the artifact off for client-side rendering, or
//! do nothing (headless deployments). Every temporary resource a playback
//! cycle opens is released on all exit paths.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use super::AudioArtifact;
use crate::{Error, Result};

/// Sample rate for playback (matches the TTS output)
const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Poll interval while waiting for playback to drain
const COMPLETION_POLL: std::time::Duration = std::time::Duration::from_millis(100);

/// Where synthesized audio is rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStrategy {
    /// Play through the local output device
    #[default]
    LocalDevice,
    /// No server-side playback; the client renders the audio
    RemoteDelivery,
    /// No playback at all
    Disabled,
}

impl FromStr for PlaybackStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::LocalDevice),
            "remote" => Ok(Self::RemoteDelivery),
            "disabled" | "none" => Ok(Self::Disabled),
            other => Err(Error::Config(format!(
                "unknown playback strategy {other:?} (expected local, remote, or disabled)"
            ))),
        }
    }
}

/// User-adjustable playback settings
#[derive(Clone, Copy, Debug)]
pub struct PlaybackSettings {
    /// Volume, 0-100
    pub volume: u8,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self { volume: 50 }
    }
}

impl PlaybackSettings {
    /// Linear gain applied to samples in local mode
    #[must_use]
    pub fn gain(self) -> f32 {
        f32::from(self.volume.min(100)) / 100.0
    }
}

/// Renders one audio artifact per cycle
#[async_trait]
pub trait PlayAudio: Send {
    /// Play (or deliver) the artifact
    ///
    /// Taking `&mut self` keeps cycles strictly sequential; a second cycle
    /// cannot start until the first has finished its cleanup.
    ///
    /// # Errors
    ///
    /// Returns error if the output device is unavailable or playback fails.
    async fn play(&mut self, artifact: &AudioArtifact, settings: PlaybackSettings) -> Result<()>;
}

/// Temporary on-disk copy of an artifact, removed when dropped
///
/// Removal failure is logged and swallowed: unique names mean a leftover
/// file cannot collide with the next cycle.
struct TempAudioFile {
    path: PathBuf,
}

impl TempAudioFile {
    fn create(dir: &Path, artifact: &AudioArtifact) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(artifact.temp_file_name());
        std::fs::write(&path, &artifact.bytes)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove temp audio");
        }
    }
}

/// Plays synthesized audio according to the configured strategy
pub struct AudioPlayback {
    strategy: PlaybackStrategy,
    temp_dir: PathBuf,
    device_config: Option<StreamConfig>,
}

impl AudioPlayback {
    /// Create a playback manager; no device is opened until first use
    #[must_use]
    pub fn new(strategy: PlaybackStrategy, temp_dir: PathBuf) -> Self {
        Self {
            strategy,
            temp_dir,
            device_config: None,
        }
    }

    /// Open the default output device, once per manager lifetime
    ///
    /// Safe to call every turn; repeated calls after a success are no-ops.
    ///
    /// # Errors
    ///
    /// Returns error if no output device or suitable config is available.
    pub fn ensure_device_ready(&mut self) -> Result<()> {
        if self.device_config.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supported_config = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
            .or_else(|| {
                // Fallback: try stereo
                device.supported_output_configs().ok()?.find(|c| {
                    c.channels() == 2
                        && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                        && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
                })
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "audio output ready"
        );

        self.device_config = Some(config);
        Ok(())
    }

    fn play_local(&mut self, artifact: &AudioArtifact, settings: PlaybackSettings) -> Result<()> {
        // Guard lives for the whole cycle; the temp file is removed on
        // every exit path below, including errors.
        let temp = TempAudioFile::create(&self.temp_dir, artifact)?;
        tracing::debug!(path = %temp.path().display(), "artifact staged for playback");

        self.ensure_device_ready()?;
        let config = self
            .device_config
            .clone()
            .ok_or_else(|| Error::Audio("output device not initialized".to_string()))?;

        let gain = settings.gain();
        let samples: Vec<f32> = decode_mp3(&artifact.bytes)?
            .into_iter()
            .map(|s| s * gain)
            .collect();

        play_samples_blocking(&config, samples)
    }
}

#[async_trait]
impl PlayAudio for AudioPlayback {
    #[allow(clippy::unused_async)]
    async fn play(&mut self, artifact: &AudioArtifact, settings: PlaybackSettings) -> Result<()> {
        match self.strategy {
            PlaybackStrategy::LocalDevice => self.play_local(artifact, settings),
            PlaybackStrategy::RemoteDelivery => {
                // Volume is a client-side concern here; nothing to apply.
                tracing::info!(
                    bytes = artifact.bytes.len(),
                    "audio generated; playback happens on the client"
                );
                Ok(())
            }
            PlaybackStrategy::Disabled => {
                tracing::debug!("playback disabled, dropping artifact");
                Ok(())
            }
        }
    }
}

/// Play samples through the default device, blocking until they drain
fn play_samples_blocking(config: &StreamConfig, samples: Vec<f32>) -> Result<()> {
    if samples.is_empty() {
        return Ok(());
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Audio("no output device".to_string()))?;

    let channels = config.channels as usize;

    let samples = Arc::new(Mutex::new(samples));
    let position = Arc::new(Mutex::new(0usize));
    let finished = Arc::new(Mutex::new(false));
    let finished_clone = Arc::clone(&finished);

    let samples_clone = Arc::clone(&samples);
    let position_clone = Arc::clone(&position);

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let samples = samples_clone.lock().unwrap();
                let mut pos = position_clone.lock().unwrap();

                for frame in data.chunks_mut(channels) {
                    let sample = if *pos < samples.len() {
                        samples[*pos]
                    } else {
                        *finished_clone.lock().unwrap() = true;
                        0.0
                    };

                    for out in frame.iter_mut() {
                        *out = sample;
                    }

                    if *pos < samples.len() {
                        *pos += 1;
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "audio playback error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    // Wait for playback to finish, bounded by the audio duration
    let sample_count = samples.lock().unwrap().len();
    let duration_ms = (sample_count as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);

    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(duration_ms + 500);

    while !*finished.lock().unwrap() {
        if start.elapsed() > timeout {
            break;
        }
        std::thread::sleep(COMPLETION_POLL);
    }

    // Small delay to let the device flush
    std::thread::sleep(std::time::Duration::from_millis(100));

    drop(stream);
    tracing::debug!(samples = sample_count, "playback complete");

    Ok(())
}

/// Decode MP3 bytes to f32 samples
fn decode_mp3(mp3_data: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                // Downmix stereo to mono
                let frame_samples: Vec<f32> = if frame.channels == 2 {
                    frame
                        .data
                        .chunks(2)
                        .map(|chunk| {
                            let left = f32::from(chunk[0]) / 32768.0;
                            let right =
                                f32::from(chunk.get(1).copied().unwrap_or(chunk[0])) / 32768.0;
                            f32::midpoint(left, right)
                        })
                        .collect()
                } else {
                    frame.data.iter().map(|&s| f32::from(s) / 32768.0).collect()
                };

                samples.extend(frame_samples);
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> AudioArtifact {
        AudioArtifact::new(vec![1, 2, 3, 4])
    }

    #[test]
    fn temp_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact();

        let path = {
            let temp = TempAudioFile::create(dir.path(), &artifact).unwrap();
            assert!(temp.path().exists());
            temp.path().to_path_buf()
        };

        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn temp_file_removed_when_cycle_errors() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact();

        // A cycle that stages the file, then fails mid-playback
        let failing_cycle = || -> Result<()> {
            let _temp = TempAudioFile::create(dir.path(), &artifact)?;
            Err(Error::Audio("simulated playback failure".to_string()))
        };

        assert!(failing_cycle().is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn gain_scales_linearly_and_clamps() {
        assert!((PlaybackSettings { volume: 0 }.gain() - 0.0).abs() < f32::EPSILON);
        assert!((PlaybackSettings { volume: 50 }.gain() - 0.5).abs() < f32::EPSILON);
        assert!((PlaybackSettings { volume: 100 }.gain() - 1.0).abs() < f32::EPSILON);
        assert!((PlaybackSettings { volume: 255 }.gain() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn strategy_parses_known_values() {
        assert_eq!(
            "local".parse::<PlaybackStrategy>().unwrap(),
            PlaybackStrategy::LocalDevice
        );
        assert_eq!(
            "Remote".parse::<PlaybackStrategy>().unwrap(),
            PlaybackStrategy::RemoteDelivery
        );
        assert_eq!(
            "disabled".parse::<PlaybackStrategy>().unwrap(),
            PlaybackStrategy::Disabled
        );
        assert!("browser".parse::<PlaybackStrategy>().is_err());
    }

    #[tokio::test]
    async fn remote_and_disabled_modes_need_no_device_and_leave_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact();

        let mut remote =
            AudioPlayback::new(PlaybackStrategy::RemoteDelivery, dir.path().to_path_buf());
        remote
            .play(&artifact, PlaybackSettings::default())
            .await
            .unwrap();

        let mut disabled = AudioPlayback::new(PlaybackStrategy::Disabled, dir.path().to_path_buf());
        disabled
            .play(&artifact, PlaybackSettings { volume: 0 })
            .await
            .unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
