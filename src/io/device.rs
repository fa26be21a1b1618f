//! cpal-backed output: pulls mixed samples on the playback thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use serde::{Deserialize, Serialize};

use crate::engine::mixer::Mixer;
use crate::error::TactorError;
use crate::io::config::OutputConfig;
use crate::MAX_BLOCK_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub is_default: bool,
}

/// List available output devices.
pub fn list_output_devices() -> Result<Vec<DeviceInfo>, TactorError> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|d| d.name().ok());

    let devices = host
        .output_devices()
        .map_err(|e| TactorError::DeviceUnavailable(e.to_string()))?;

    let mut result = Vec::new();
    for device in devices {
        if let Ok(name) = device.name() {
            result.push(DeviceInfo {
                is_default: Some(&name) == default_name.as_ref(),
                name,
            });
        }
    }
    Ok(result)
}

fn output_device(name: Option<&str>) -> Result<cpal::Device, TactorError> {
    let host = cpal::default_host();
    match name {
        Some(wanted) => {
            let devices = host
                .output_devices()
                .map_err(|e| TactorError::DeviceUnavailable(e.to_string()))?;
            for device in devices {
                if let Ok(name) = device.name() {
                    if name == wanted {
                        return Ok(device);
                    }
                }
            }
            Err(TactorError::DeviceUnavailable(format!(
                "device '{wanted}' not found"
            )))
        }
        None => host
            .default_output_device()
            .ok_or_else(|| TactorError::DeviceUnavailable("no default output device".into())),
    }
}

fn supported_config(
    device: &cpal::Device,
    preferred: &OutputConfig,
) -> Result<cpal::StreamConfig, TactorError> {
    let supported = device
        .supported_output_configs()
        .map_err(|e| TactorError::DeviceUnavailable(e.to_string()))?;

    for config in supported {
        let min_rate = config.min_sample_rate().0;
        let max_rate = config.max_sample_rate().0;
        if preferred.sample_rate >= min_rate
            && preferred.sample_rate <= max_rate
            && config.channels() >= preferred.channels
        {
            return Ok(cpal::StreamConfig {
                channels: preferred.channels,
                sample_rate: cpal::SampleRate(preferred.sample_rate),
                buffer_size: cpal::BufferSize::Fixed(preferred.buffer_size),
            });
        }
    }

    // Fall back to the device default rather than failing outright.
    let default = device
        .default_output_config()
        .map_err(|e| TactorError::DeviceUnavailable(e.to_string()))?;
    let channels = default.channels().min(2);
    log::warn!(
        "requested output config ({} Hz, {} ch) unsupported; using device default ({} Hz, {} ch)",
        preferred.sample_rate,
        preferred.channels,
        default.sample_rate().0,
        channels
    );
    Ok(cpal::StreamConfig {
        channels,
        sample_rate: default.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    })
}

/// The output side of the engine: owns the cpal stream whose callback pulls
/// the mixer.
///
/// `cpal::Stream` is not `Send`, so a `HapticOutput` lives on the thread
/// that opened it; the `Mixer` handle is the cloneable, thread-safe surface
/// everything else talks to. Because `reinitialize` takes `&mut self`, it is
/// naturally serialized against other calls on this object; concurrent
/// `trigger` calls on mixer clones during a rebuild are dropped with a
/// warning (the accepting gate), never queued.
pub struct HapticOutput {
    stream: Option<cpal::Stream>,
    mixer: Mixer,
    config: OutputConfig,
    running: bool,
}

impl HapticOutput {
    /// Build the output stream and start playback.
    pub fn open(mixer: Mixer, config: OutputConfig) -> Result<Self, TactorError> {
        let stream = Self::build_stream(&mixer, &config)?;
        stream
            .play()
            .map_err(|e| TactorError::StreamControl(e.to_string()))?;

        log::info!(
            "output open: {} Hz, {} channels, buffer {}",
            config.sample_rate,
            config.channels,
            config.buffer_size
        );

        Ok(Self {
            stream: Some(stream),
            mixer,
            config,
            running: true,
        })
    }

    fn build_stream(mixer: &Mixer, config: &OutputConfig) -> Result<cpal::Stream, TactorError> {
        let device = output_device(config.device.as_deref())?;
        let stream_config = supported_config(&device, config)?;
        let channels = stream_config.channels as usize;

        // Keep the mixer rendering at the rate the stream will actually run
        // at, whether that came from the preferred config or the fallback.
        mixer.set_sample_rate(stream_config.sample_rate.0 as f32);

        let mixer_clone = mixer.clone();
        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // Pull the mix in mono, then duplicate each frame across
                    // all channels. Oversized requests render in chunks so
                    // the mono buffer never reallocates.
                    for frames in data.chunks_mut(channels * MAX_BLOCK_SIZE) {
                        let frame_count = frames.len() / channels;
                        mixer_clone.read(&mut mono[..frame_count]);
                        for (frame, &sample) in
                            frames.chunks_mut(channels).zip(mono.iter())
                        {
                            frame.fill(sample);
                        }
                    }
                },
                move |err| {
                    log::error!("output stream error: {err}");
                },
                None,
            )
            .map_err(|e| TactorError::StreamBuild(e.to_string()))?;

        Ok(stream)
    }

    /// The thread-safe handle callers use for `trigger`/`stop`.
    pub fn mixer(&self) -> Mixer {
        self.mixer.clone()
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running && self.stream.is_some()
    }

    /// Trigger through the output, restarting a stopped stream once.
    ///
    /// If the stream is not playing, one synchronous restart is attempted;
    /// if that fails the trigger is dropped and reported as a non-fatal
    /// warning - nothing propagates to the event source.
    pub fn trigger(
        &mut self,
        pattern: &crate::pattern::model::HapticPattern,
        name: Option<&str>,
    ) -> Result<crate::engine::effect::EffectId, TactorError> {
        if !self.is_running() {
            log::warn!("output not playing; attempting restart");
            if let Err(err) = self.start() {
                log::warn!("restart failed, trigger dropped: {err}");
                return Err(err);
            }
        }
        self.mixer.trigger_named(pattern, name)
    }

    /// Resume playback.
    pub fn start(&mut self) -> Result<(), TactorError> {
        match &self.stream {
            Some(stream) => {
                stream
                    .play()
                    .map_err(|e| TactorError::StreamControl(e.to_string()))?;
                self.running = true;
                Ok(())
            }
            None => {
                let stream = Self::build_stream(&self.mixer, &self.config)?;
                stream
                    .play()
                    .map_err(|e| TactorError::StreamControl(e.to_string()))?;
                self.stream = Some(stream);
                self.running = true;
                Ok(())
            }
        }
    }

    /// Pause playback; active effects keep their state but nothing pulls.
    pub fn stop(&mut self) -> Result<(), TactorError> {
        if let Some(stream) = &self.stream {
            stream
                .pause()
                .map_err(|e| TactorError::StreamControl(e.to_string()))?;
        }
        self.running = false;
        Ok(())
    }

    /// Tear down and rebuild the output with a new configuration.
    ///
    /// Stops every active effect, drops the old stream, and builds a fresh
    /// one before returning; the mixer adopts whatever rate the new stream
    /// negotiates. Triggers arriving on mixer clones while this runs are
    /// dropped with a warning.
    pub fn reinitialize(&mut self, config: OutputConfig) -> Result<(), TactorError> {
        log::info!(
            "reinitializing output: device={:?}, sample_rate={}, buffer={}",
            config.device,
            config.sample_rate,
            config.buffer_size
        );

        self.mixer.set_accepting(false);
        self.mixer.stop_all();
        self.stream = None; // drop the old stream before opening the device again
        self.running = false;

        let result = Self::build_stream(&self.mixer, &config).and_then(|stream| {
            stream
                .play()
                .map_err(|e| TactorError::StreamControl(e.to_string()))?;
            self.stream = Some(stream);
            self.config = config;
            self.running = true;
            Ok(())
        });

        // Re-open the gate even on failure so triggers degrade to the
        // "device unavailable" path instead of being dropped forever.
        self.mixer.set_accepting(true);

        match &result {
            Ok(()) => log::info!("output reinitialized"),
            Err(err) => log::warn!("reinitialize failed, playback silenced: {err}"),
        }
        result
    }
}
