use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Sample, SampleFormat, SizedSample, StreamConfig};
use rustfft::num_traits::ToPrimitive;
use thiserror::Error;

use crate::buffer::SampleRing;
use std::sync::{Arc, Mutex};

/// The one error the UI ever sees from this module: the host refused or
/// failed to hand over an input stream. Never propagates into rendering;
/// the caller surfaces it as a status message and stays inactive.
#[derive(Debug, Error)]
#[error("microphone access failed: {reason}")]
pub struct CaptureAccessError {
    reason: String,
}

impl CaptureAccessError {
    fn from_anyhow(err: anyhow::Error) -> Self {
        Self {
            reason: format!("{err:#}"),
        }
    }
}

/// A live input device: holds the cpal stream open for as long as the
/// session exists. Dropping it releases the device.
pub struct CaptureSession {
    _stream: cpal::Stream,
    label: String,
    sample_rate: u32,
}

impl CaptureSession {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Start/stop wrapper around an optional session. `is_active` is the
/// activity predicate the frame loop checks before reading the spectrum.
#[derive(Default)]
pub struct Capture {
    session: Option<CaptureSession>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    /// Opens the microphone and arms the sample ring. Any previous
    /// session is released first, so this doubles as restart.
    pub fn start(
        &mut self,
        shared: Arc<Mutex<SampleRing>>,
    ) -> std::result::Result<(), CaptureAccessError> {
        self.stop();
        match start_mic(shared) {
            Ok(session) => {
                self.session = Some(session);
                Ok(())
            }
            Err(e) => Err(CaptureAccessError::from_anyhow(e)),
        }
    }

    /// Releases the device. Safe to call any number of times, including
    /// when nothing was ever started.
    pub fn stop(&mut self) {
        self.session.take();
    }
}

pub fn pick_input_device() -> Result<Device> {
    let host = cpal::default_host();

    if let Ok(filter) = std::env::var("RONDO_DEVICE") {
        let filter = filter.to_lowercase();
        if let Ok(devices) = host.input_devices() {
            for dev in devices {
                if let Ok(name) = dev.name() {
                    if name.to_lowercase().contains(&filter) {
                        return Ok(dev);
                    }
                }
            }
        }
    }

    host.default_input_device()
        .context("no default input device")
}

pub fn best_config_for(device: &Device) -> Result<StreamConfig> {
    let mut cfg = device.default_input_config()?.config();
    cfg.sample_rate.0 = cfg.sample_rate.0.clamp(44_100, 48_000);
    Ok(cfg)
}

pub fn build_stream<T>(
    device: Device,
    cfg: StreamConfig,
    shared: Arc<Mutex<SampleRing>>,
) -> Result<cpal::Stream>
where
    T: Sample + SizedSample + ToPrimitive,
{
    let ch = cfg.channels as usize;
    let err_fn = |_| {};

    let stream = device.build_input_stream(
        &cfg,
        move |data: &[T], _| {
            // realtime thread: skip the frame rather than block
            if let Ok(mut ring) = shared.try_lock() {
                for frame in data.chunks_exact(ch) {
                    let mut acc = 0.0f32;
                    for &s in frame {
                        acc += s.to_f32().unwrap_or(0.0);
                    }
                    ring.push(acc / ch as f32);
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

fn start_mic(shared: Arc<Mutex<SampleRing>>) -> Result<CaptureSession> {
    let device = pick_input_device()?;
    let label = device.name().unwrap_or_else(|_| "mic".into());
    let cfg = best_config_for(&device)?;
    let sample_rate = cfg.sample_rate.0;

    let stream = match device.default_input_config()?.sample_format() {
        SampleFormat::F32 => build_stream::<f32>(device, cfg, shared)?,
        SampleFormat::I16 => build_stream::<i16>(device, cfg, shared)?,
        SampleFormat::U16 => build_stream::<u16>(device, cfg, shared)?,
        _ => anyhow::bail!("unsupported sample format"),
    };

    stream.play()?;

    Ok(CaptureSession {
        _stream: stream,
        label,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_is_a_no_op() {
        let mut capture = Capture::new();
        assert!(!capture.is_active());

        capture.stop();
        capture.stop();
        assert!(!capture.is_active());
        assert!(capture.session().is_none());
    }

    #[test]
    fn failed_start_leaves_capture_inactive() {
        let mut capture = Capture::new();
        let ring = Arc::new(Mutex::new(SampleRing::new(1024)));

        // headless hosts refuse the device; hosts with a mic grant it.
        // either way the activity flag must track the outcome exactly.
        match capture.start(ring) {
            Err(_) => {
                assert!(!capture.is_active());
                assert!(capture.session().is_none());
            }
            Ok(()) => {
                assert!(capture.is_active());
                capture.stop();
                assert!(!capture.is_active());
            }
        }
    }

    #[test]
    fn access_error_carries_the_reason() {
        let err = CaptureAccessError::from_anyhow(anyhow::anyhow!("denied"));
        assert!(err.to_string().contains("microphone access failed"));
        assert!(err.to_string().contains("denied"));
    }
}
