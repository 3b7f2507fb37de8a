use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use crate::audio_api::AudioCommand;

pub mod envelope;

mod engine;
mod frame;
mod voice;

use engine::Engine;
use frame::StereoFrame;

// The output device is built suspended and stays silent until the first
// user gesture activates it. Commands sent before then are dropped, not
// errors; that's the normal state between startup and the first press.
pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    active: Arc<AtomicBool>,
    stream: cpal::Stream,
}

impl AudioHandle {
    // Idempotent; safe to call on every gesture.
    pub fn activate(&self) {
        if !self.active.swap(true, Ordering::Relaxed) {
            if let Err(e) = self.stream.play() {
                eprintln!("harmonia: could not start output stream: {e}");
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub fn send(&self, cmd: AudioCommand) {
        if self.is_active() {
            let _ = self.tx.try_send(cmd);
        }
    }
}

pub fn start_audio() -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(1024);

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("no default output device")?;
    let config = device
        .default_output_config()
        .context("no default output config")?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    if channels != 2 {
        anyhow::bail!("only stereo output is supported right now");
    }

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let stream = build_output_stream_f32(&device, &config.into(), rx, sample_rate, channels)?;
            // Some backends refuse to pause; the active flag still keeps
            // the engine starved of commands until activation.
            let _ = stream.pause();
            Ok(AudioHandle {
                tx,
                active: Arc::new(AtomicBool::new(false)),
                stream,
            })
        }
        _ => anyhow::bail!("unsupported sample format (only f32 supported for now)"),
    }
}

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    sample_rate: u32,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let mut engine = Engine::new(sample_rate);

    let err_fn = |err| eprintln!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            let n_frames = data.len() / channels;
            let frames: &mut [StereoFrame] = unsafe {
                // interleaved stereo f32, checked at stream setup
                std::slice::from_raw_parts_mut(data.as_mut_ptr() as *mut StereoFrame, n_frames)
            };
            engine.render_block(frames);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
